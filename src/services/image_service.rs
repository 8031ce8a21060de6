use mongodb::bson::oid::ObjectId;

use crate::database::{ImageStore, UserStore};
use crate::models::{image_url, ImageFile, ImageMetadata, ImageSummary, StoredImage, UploadImageRequest};
use crate::utils::error::AppError;
use crate::utils::image_data::{decode_image_payload, DecodedImage};

const FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

fn parse_image_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("Invalid image ID format: {}", raw)))
}

fn summary(file: ImageFile) -> ImageSummary {
    ImageSummary {
        image_id: file.id.map(|id| id.to_hex()).unwrap_or_default(),
        filename: file.filename,
        content_type: file.metadata.content_type,
    }
}

async fn store_image<S>(
    db: &S,
    image: DecodedImage,
    filename: String,
    user_id: Option<String>,
    is_profile_picture: bool,
) -> Result<ImageSummary, AppError>
where
    S: ImageStore + ?Sized,
{
    let file = ImageFile {
        id: None,
        filename: filename.clone(),
        metadata: ImageMetadata {
            filename,
            content_type: image.content_type.clone(),
            user_id,
            is_profile_picture,
        },
        length: image.bytes.len() as i64,
    };

    let id = db.insert_image(&file, image.bytes).await?;

    log::info!("🖼️ Stored image {} ({} bytes, {})", id.to_hex(), file.length, file.metadata.content_type);

    Ok(summary(ImageFile { id: Some(id), ..file }))
}

/// Stores a profile picture for `email` and returns its URL
pub async fn store_profile_picture<S>(db: &S, email: &str, payload: &str) -> Result<String, AppError>
where
    S: ImageStore + ?Sized,
{
    let image = decode_image_payload(payload)?;
    let filename = format!("{}_profile.{}", email, image.extension());
    let stored = store_image(db, image, filename, Some(email.to_string()), true).await?;
    Ok(image_url(&stored.image_id))
}

/// Uploads an image, optionally making it the user's profile picture
pub async fn upload_image<S>(db: &S, request: &UploadImageRequest) -> Result<ImageSummary, AppError>
where
    S: UserStore + ImageStore + ?Sized,
{
    let image = decode_image_payload(&request.data)?;

    // Resolve the owner first so nothing is stored for an unknown user
    let owner = match (&request.user_id, request.is_profile_picture) {
        (Some(user_id), true) => {
            let id = ObjectId::parse_str(user_id)
                .map_err(|_| AppError::InvalidInput(format!("Invalid user ID: {}", user_id)))?;
            let user = db
                .find_user_by_id(&id)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
            Some(user)
        }
        _ => None,
    };

    let filename = request
        .filename
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("upload.{}", image.extension()));

    let stored = store_image(
        db,
        image,
        filename,
        request.user_id.clone(),
        request.is_profile_picture,
    )
    .await?;

    if let Some(user) = owner {
        db.set_profile_picture(&user.email, &image_url(&stored.image_id)).await?;
        log::info!("👤 Profile picture updated for {}", user.email);
    }

    Ok(stored)
}

pub async fn get_image<S>(db: &S, image_id: &str) -> Result<StoredImage, AppError>
where
    S: ImageStore + ?Sized,
{
    let id = parse_image_id(image_id)?;

    let file = db
        .find_image_file(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;
    let bytes = db
        .find_image_data(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Image data not found".to_string()))?;

    let content_type = if file.metadata.content_type.is_empty() {
        FALLBACK_CONTENT_TYPE.to_string()
    } else {
        file.metadata.content_type
    };

    Ok(StoredImage { content_type, bytes })
}

pub async fn list_user_images<S>(db: &S, user_id: &str) -> Result<Vec<ImageSummary>, AppError>
where
    S: ImageStore + ?Sized,
{
    let files = db.find_images_by_user(user_id).await?;
    Ok(files.into_iter().map(summary).collect())
}

pub async fn delete_image<S>(db: &S, image_id: &str) -> Result<(), AppError>
where
    S: ImageStore + ?Sized,
{
    let id = parse_image_id(image_id)?;
    if !db.delete_image(&id).await? {
        return Err(AppError::NotFound("Image not found".to_string()));
    }
    log::info!("🗑️ Image {} deleted", image_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::AccountType;
    use base64::{engine::general_purpose::STANDARD, Engine};

    fn upload(data: String, user_id: Option<String>, is_profile_picture: bool) -> UploadImageRequest {
        UploadImageRequest {
            filename: Some("cat.jpg".to_string()),
            data,
            user_id,
            is_profile_picture,
        }
    }

    #[tokio::test]
    async fn test_upload_get_list_delete() {
        let store = MemoryStore::new();
        let data = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"meow"));

        let stored = upload_image(&store, &upload(data, Some("u1".into()), false)).await.unwrap();
        assert_eq!(stored.filename, "cat.jpg");
        assert_eq!(stored.content_type, "image/jpeg");

        let image = get_image(&store, &stored.image_id).await.unwrap();
        assert_eq!(image.bytes, b"meow");
        assert_eq!(image.content_type, "image/jpeg");

        let listed = list_user_images(&store, "u1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].image_id, stored.image_id);

        delete_image(&store, &stored.image_id).await.unwrap();
        assert!(matches!(get_image(&store, &stored.image_id).await, Err(AppError::NotFound(_))));
        assert!(matches!(delete_image(&store, &stored.image_id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_upload_links_user() {
        let store = MemoryStore::new();
        store.add_user("Bob", AccountType::Student, Some("Alice"));
        let bob = store.find_user_by_email("bob@example.com").await.unwrap().unwrap();
        let bob_id = bob.id.unwrap().to_hex();

        let stored = upload_image(&store, &upload(STANDARD.encode(b"png"), Some(bob_id), true))
            .await
            .unwrap();

        let bob = store.find_user_by_email("bob@example.com").await.unwrap().unwrap();
        assert_eq!(bob.profile_pic, Some(image_url(&stored.image_id)));
    }

    #[tokio::test]
    async fn test_profile_upload_for_unknown_user_fails_before_storing() {
        let store = MemoryStore::new();
        let ghost = ObjectId::new().to_hex();

        let result = upload_image(&store, &upload(STANDARD.encode(b"png"), Some(ghost), true)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(store.image_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_image_id() {
        let store = MemoryStore::new();
        assert!(matches!(get_image(&store, "xyz").await, Err(AppError::InvalidInput(_))));
    }
}

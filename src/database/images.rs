use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, spec::BinarySubtype, Binary};

use super::{collect_documents, MongoDB, FS_CHUNKS, FS_FILES};
use crate::models::{ImageChunk, ImageFile};
use crate::utils::error::AppError;

/// Blob store for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn insert_image(&self, file: &ImageFile, bytes: Vec<u8>) -> Result<ObjectId, AppError>;

    async fn find_image_file(&self, id: &ObjectId) -> Result<Option<ImageFile>, AppError>;

    async fn find_image_data(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, AppError>;

    async fn find_images_by_user(&self, user_id: &str) -> Result<Vec<ImageFile>, AppError>;

    /// Removes metadata and chunks; returns false if no metadata existed
    async fn delete_image(&self, id: &ObjectId) -> Result<bool, AppError>;
}

#[async_trait]
impl ImageStore for MongoDB {
    async fn insert_image(&self, file: &ImageFile, bytes: Vec<u8>) -> Result<ObjectId, AppError> {
        let result = self.collection::<ImageFile>(FS_FILES).insert_one(file).await?;
        let file_id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("Inserted image has no ObjectId".to_string()))?;

        let chunk = ImageChunk {
            files_id: file_id,
            n: 0,
            data: Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            },
        };

        if let Err(e) = self.collection::<ImageChunk>(FS_CHUNKS).insert_one(&chunk).await {
            // Do not leave metadata pointing at missing data
            let _ = self
                .collection::<ImageFile>(FS_FILES)
                .delete_one(doc! { "_id": file_id })
                .await;
            return Err(e.into());
        }

        Ok(file_id)
    }

    async fn find_image_file(&self, id: &ObjectId) -> Result<Option<ImageFile>, AppError> {
        let file = self
            .collection::<ImageFile>(FS_FILES)
            .find_one(doc! { "_id": *id })
            .await?;
        Ok(file)
    }

    async fn find_image_data(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, AppError> {
        let chunk = self
            .collection::<ImageChunk>(FS_CHUNKS)
            .find_one(doc! { "files_id": *id })
            .await?;
        Ok(chunk.map(|c| c.data.bytes))
    }

    async fn find_images_by_user(&self, user_id: &str) -> Result<Vec<ImageFile>, AppError> {
        let cursor = self
            .collection::<ImageFile>(FS_FILES)
            .find(doc! { "metadata.user_id": user_id })
            .await?;
        Ok(collect_documents(cursor, FS_FILES).await)
    }

    async fn delete_image(&self, id: &ObjectId) -> Result<bool, AppError> {
        let deleted = self
            .collection::<ImageFile>(FS_FILES)
            .delete_one(doc! { "_id": *id })
            .await?;
        self.collection::<ImageChunk>(FS_CHUNKS)
            .delete_many(doc! { "files_id": *id })
            .await?;
        Ok(deleted.deleted_count > 0)
    }
}

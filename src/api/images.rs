use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{ImageSummary, UploadImageRequest};
use crate::services::image_service;
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/images/upload",
    tag = "Images",
    request_body = UploadImageRequest,
    responses(
        (status = 200, description = "Image stored", body = ImageSummary),
        (status = 400, description = "Invalid image data or user id"),
        (status = 404, description = "User not found")
    )
)]
pub async fn upload_image(
    db: web::Data<MongoDB>,
    body: web::Json<UploadImageRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!(
        "📤 POST /images/upload - user: {:?}, profile picture: {}",
        body.user_id,
        body.is_profile_picture
    );

    let summary = image_service::upload_image(db.get_ref(), &body).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Streams the raw bytes with the stored content type
#[utoipa::path(
    get,
    path = "/images/{image_id}",
    tag = "Images",
    params(("image_id" = String, Path, description = "Image ObjectId")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Malformed image id"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn get_image(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let image = image_service::get_image(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type(image.content_type)
        .body(image.bytes))
}

#[utoipa::path(
    get,
    path = "/images/user/{user_id}",
    tag = "Images",
    params(("user_id" = String, Path, description = "Owner id recorded at upload")),
    responses(
        (status = 200, description = "Images owned by the user", body = [ImageSummary])
    )
)]
pub async fn list_user_images(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let images = image_service::list_user_images(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(images))
}

#[utoipa::path(
    delete,
    path = "/images/{image_id}",
    tag = "Images",
    params(("image_id" = String, Path, description = "Image ObjectId")),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 400, description = "Malformed image id"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn delete_image(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let image_id = path.into_inner();
    image_service::delete_image(db.get_ref(), &image_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Image deleted",
        "image_id": image_id
    })))
}

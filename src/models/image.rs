use mongodb::bson::{oid::ObjectId, Binary};
use serde::{Deserialize, Serialize};

/// Metadata document in `fs.files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageFile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub filename: String,
    pub metadata: ImageMetadata,
    pub length: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub filename: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_profile_picture: bool,
}

/// Data document in `fs.chunks`; images are stored as a single chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageChunk {
    pub files_id: ObjectId,
    pub n: i32,
    pub data: Binary,
}

/// Image bytes ready to be streamed back
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ImageSummary {
    pub image_id: String,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UploadImageRequest {
    pub filename: Option<String>,
    /// Base64 image, optionally as a data URL
    pub data: String,
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_profile_picture: bool,
}

/// Image URL served by the images endpoint
pub fn image_url(image_id: &str) -> String {
    format!("/images/{}", image_id)
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CollectionUsage {
    pub count: i64,
    pub size: i64,
}

/// Snapshot of database usage, with the image blob collections broken out
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StorageMetrics {
    pub database_size: i64,
    pub storage_size: i64,
    pub indexes: i64,
    pub has_gridfs: bool,
    pub collections: Vec<String>,
    pub fs_files: CollectionUsage,
    pub fs_chunks: CollectionUsage,
}

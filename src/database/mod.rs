use futures::stream::StreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Collection, Cursor, Database, IndexModel};
use mongodb::options::IndexOptions;
use serde::de::DeserializeOwned;
use std::error::Error;

use crate::models::{CollectionUsage, StorageMetrics};
use crate::utils::error::AppError;

pub mod bucket_lists;
pub mod images;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use bucket_lists::{BucketListScan, BucketListStore};
pub use images::ImageStore;
pub use users::UserStore;

pub const USERS: &str = "users";
pub const BUCKET_LISTS: &str = "bucket_lists";
pub const FS_FILES: &str = "fs.files";
pub const FS_CHUNKS: &str = "fs.chunks";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = mongodb::Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the stores rely on
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS);

        // users(email) unique - login and acting-user lookups
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        // users(mentor_name) - group membership and points fan-out
        let mentor_index = IndexModel::builder()
            .keys(doc! { "mentor_name": 1 })
            .build();

        match users.create_index(mentor_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(mentor_name)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let full_name_index = IndexModel::builder()
            .keys(doc! { "fullName": 1 })
            .build();

        match users.create_index(full_name_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(fullName)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // bucket_lists(mentor_name) unique - at most one list per mentor group
        let bucket_lists = self.collection::<Document>(BUCKET_LISTS);

        let bucket_index = IndexModel::builder()
            .keys(doc! { "mentor_name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match bucket_lists.create_index(bucket_index).await {
            Ok(_) => log::info!("   ✅ Index created: bucket_lists(mentor_name) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create bucket_lists(mentor_name) index: {}", e),
        }

        let files = self.collection::<Document>(FS_FILES);

        let files_index = IndexModel::builder()
            .keys(doc! { "metadata.user_id": 1 })
            .build();

        match files.create_index(files_index).await {
            Ok(_) => log::info!("   ✅ Index created: fs.files(metadata.user_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Round trip to the server
    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Database size plus the image blob collections
    pub async fn storage_metrics(&self) -> Result<StorageMetrics, AppError> {
        let stats = self.db.run_command(doc! { "dbStats": 1 }).await?;
        let collections = self.db.list_collection_names().await?;

        let has_files = collections.iter().any(|c| c == FS_FILES);
        let has_chunks = collections.iter().any(|c| c == FS_CHUNKS);

        let fs_files = if has_files {
            self.collection_usage(FS_FILES).await?
        } else {
            CollectionUsage::default()
        };
        let fs_chunks = if has_chunks {
            self.collection_usage(FS_CHUNKS).await?
        } else {
            CollectionUsage::default()
        };

        Ok(StorageMetrics {
            database_size: number(&stats, "dataSize"),
            storage_size: number(&stats, "storageSize"),
            indexes: number(&stats, "indexes"),
            has_gridfs: has_files && has_chunks,
            collections,
            fs_files,
            fs_chunks,
        })
    }

    async fn collection_usage(&self, name: &str) -> Result<CollectionUsage, AppError> {
        let stats = self.db.run_command(doc! { "collStats": name }).await?;
        Ok(CollectionUsage {
            count: number(&stats, "count"),
            size: number(&stats, "size"),
        })
    }
}

/// Reads a numeric field that the server may return as int32, int64 or double
fn number(document: &Document, key: &str) -> i64 {
    match document.get(key) {
        Some(Bson::Int32(v)) => *v as i64,
        Some(Bson::Int64(v)) => *v,
        Some(Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}

/// Drains a cursor, skipping documents that fail to decode
pub(crate) async fn collect_documents<T>(cursor: Cursor<T>, collection: &str) -> Vec<T>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    drain_documents(cursor, collection).await.0
}

/// Like `collect_documents`, also returning how many documents were skipped
pub(crate) async fn drain_documents<T>(mut cursor: Cursor<T>, collection: &str) -> (Vec<T>, usize)
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let mut items = Vec::new();
    let mut skipped = 0;
    while let Some(result) = cursor.next().await {
        match result {
            Ok(item) => items.push(item),
            Err(e) => {
                skipped += 1;
                log::error!("❌ Skipping unreadable document in {}: {}", collection, e);
            }
        }
    }
    (items, skipped)
}

/// Scratch database for the `#[ignore]`d live tests
#[cfg(test)]
pub(crate) async fn connect_test_database() -> Result<MongoDB, Box<dyn Error>> {
    dotenv::dotenv().ok();

    let uri = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    MongoDB::new(&uri, "bootcamp_test").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_accepts_all_numeric_encodings() {
        let stats = doc! {
            "dataSize": 1024_i32,
            "storageSize": 4096_i64,
            "indexes": 3.0_f64,
            "name": "bootcamp",
        };

        assert_eq!(number(&stats, "dataSize"), 1024);
        assert_eq!(number(&stats, "storageSize"), 4096);
        assert_eq!(number(&stats, "indexes"), 3);
        assert_eq!(number(&stats, "name"), 0);
        assert_eq!(number(&stats, "missing"), 0);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        assert!(connect_test_database().await.is_ok());
    }
}

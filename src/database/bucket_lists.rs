use async_trait::async_trait;
use mongodb::bson::{self, doc};

use super::{collect_documents, drain_documents, MongoDB, BUCKET_LISTS};
use crate::models::{BucketList, Task};
use crate::utils::error::AppError;

/// Result of reading every stored bucket list
#[derive(Debug, Clone, Default)]
pub struct BucketListScan {
    pub lists: Vec<BucketList>,
    /// Stored lists that could not be decoded (e.g. legacy `task_id` tasks)
    pub unreadable: usize,
}

/// Bucket list persistence. Every task mutation addresses a single task;
/// the stored task array is never rewritten as a whole.
#[async_trait]
pub trait BucketListStore: Send + Sync {
    async fn find_bucket_list(&self, mentor_name: &str) -> Result<Option<BucketList>, AppError>;

    async fn all_bucket_lists(&self) -> Result<Vec<BucketList>, AppError>;

    /// Every list, reporting undecodable ones instead of silently dropping them
    async fn scan_bucket_lists(&self) -> Result<BucketListScan, AppError>;

    /// Creates an empty list for the mentor unless one exists
    async fn ensure_bucket_list(&self, mentor_name: &str) -> Result<(), AppError>;

    /// Appends a task, creating the list if needed
    async fn push_task(&self, mentor_name: &str, task: &Task) -> Result<(), AppError>;

    /// Sets `completed` on one task only if it currently differs.
    /// Returns true when this call performed the transition.
    async fn set_task_completed(
        &self,
        mentor_name: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<bool, AppError>;

    /// Returns true when a task was removed
    async fn remove_task(&self, mentor_name: &str, task_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
impl BucketListStore for MongoDB {
    async fn find_bucket_list(&self, mentor_name: &str) -> Result<Option<BucketList>, AppError> {
        let list = self
            .collection::<BucketList>(BUCKET_LISTS)
            .find_one(doc! { "mentor_name": mentor_name })
            .await?;
        Ok(list)
    }

    async fn all_bucket_lists(&self) -> Result<Vec<BucketList>, AppError> {
        let cursor = self
            .collection::<BucketList>(BUCKET_LISTS)
            .find(doc! {})
            .await?;
        Ok(collect_documents(cursor, BUCKET_LISTS).await)
    }

    async fn scan_bucket_lists(&self) -> Result<BucketListScan, AppError> {
        let cursor = self
            .collection::<BucketList>(BUCKET_LISTS)
            .find(doc! {})
            .await?;
        let (lists, unreadable) = drain_documents(cursor, BUCKET_LISTS).await;
        Ok(BucketListScan { lists, unreadable })
    }

    async fn ensure_bucket_list(&self, mentor_name: &str) -> Result<(), AppError> {
        self.collection::<BucketList>(BUCKET_LISTS)
            .update_one(
                doc! { "mentor_name": mentor_name },
                doc! { "$setOnInsert": { "tasks": [] } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn push_task(&self, mentor_name: &str, task: &Task) -> Result<(), AppError> {
        self.collection::<BucketList>(BUCKET_LISTS)
            .update_one(
                doc! { "mentor_name": mentor_name },
                doc! { "$push": { "tasks": bson::to_bson(task)? } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn set_task_completed(
        &self,
        mentor_name: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<bool, AppError> {
        // The $ne guard makes the flip a compare-and-set on the single task
        let result = self
            .collection::<BucketList>(BUCKET_LISTS)
            .update_one(
                doc! {
                    "mentor_name": mentor_name,
                    "tasks": { "$elemMatch": { "id": task_id, "completed": { "$ne": completed } } },
                },
                doc! { "$set": { "tasks.$[task].completed": completed } },
            )
            .array_filters(vec![doc! { "task.id": task_id }])
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn remove_task(&self, mentor_name: &str, task_id: &str) -> Result<bool, AppError> {
        let result = self
            .collection::<BucketList>(BUCKET_LISTS)
            .update_one(
                doc! { "mentor_name": mentor_name },
                doc! { "$pull": { "tasks": { "id": task_id } } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connect_test_database;
    use uuid::Uuid;

    async fn scratch_list(db: &MongoDB) -> String {
        let mentor_name = format!("Mentor {}", Uuid::new_v4());
        db.ensure_bucket_list(&mentor_name).await.unwrap();
        mentor_name
    }

    async fn cleanup(db: &MongoDB, mentor_name: &str) {
        db.collection::<BucketList>(BUCKET_LISTS)
            .delete_one(doc! { "mentor_name": mentor_name })
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_push_task_upserts_missing_list() {
        let db = connect_test_database().await.unwrap();
        let mentor_name = format!("Mentor {}", Uuid::new_v4());
        let task = Task::new("Climb a hill");

        db.push_task(&mentor_name, &task).await.unwrap();
        db.push_task(&mentor_name, &Task::new("Bake bread")).await.unwrap();

        let list = db.find_bucket_list(&mentor_name).await.unwrap().unwrap();
        assert_eq!(list.tasks.len(), 2);
        assert_eq!(list.task(&task.id), Some(&task));

        cleanup(&db, &mentor_name).await;
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_set_task_completed_flips_only_once() {
        let db = connect_test_database().await.unwrap();
        let mentor_name = scratch_list(&db).await;
        let target = Task::new("Run 5k");
        let other = Task::new("Read a novel");
        db.push_task(&mentor_name, &target).await.unwrap();
        db.push_task(&mentor_name, &other).await.unwrap();

        let (first, second) = tokio::join!(
            db.set_task_completed(&mentor_name, &target.id, true),
            db.set_task_completed(&mentor_name, &target.id, true),
        );
        assert_eq!([first.unwrap(), second.unwrap()].iter().filter(|flipped| **flipped).count(), 1);

        let list = db.find_bucket_list(&mentor_name).await.unwrap().unwrap();
        assert!(list.task(&target.id).unwrap().completed);
        assert!(!list.task(&other.id).unwrap().completed);

        assert!(db.set_task_completed(&mentor_name, &target.id, false).await.unwrap());
        assert!(!db.set_task_completed(&mentor_name, "no-such-task", true).await.unwrap());

        cleanup(&db, &mentor_name).await;
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_remove_task_pulls_a_single_task() {
        let db = connect_test_database().await.unwrap();
        let mentor_name = scratch_list(&db).await;
        let doomed = Task::new("Sell the car");
        let kept = Task::new("Learn to juggle");
        db.push_task(&mentor_name, &doomed).await.unwrap();
        db.push_task(&mentor_name, &kept).await.unwrap();

        assert!(db.remove_task(&mentor_name, &doomed.id).await.unwrap());
        assert!(!db.remove_task(&mentor_name, &doomed.id).await.unwrap());

        let list = db.find_bucket_list(&mentor_name).await.unwrap().unwrap();
        assert_eq!(list.tasks, vec![kept]);

        cleanup(&db, &mentor_name).await;
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_scan_counts_legacy_lists() {
        let db = connect_test_database().await.unwrap();
        let mentor_name = format!("Mentor {}", Uuid::new_v4());
        db.collection::<bson::Document>(BUCKET_LISTS)
            .insert_one(doc! {
                "mentor_name": mentor_name.as_str(),
                "tasks": [{ "task_id": "1", "description": "Old task", "completed": true }],
            })
            .await
            .unwrap();

        let scan = db.scan_bucket_lists().await.unwrap();
        assert!(scan.unreadable >= 1);
        assert!(scan.lists.iter().all(|l| l.mentor_name != mentor_name));

        cleanup(&db, &mentor_name).await;
    }
}

// ==================== POINTS RECALCULATION ====================
// One-shot maintenance job: rebuilds every user's points from the
// completed tasks currently in the bucket lists. Not used by request paths.

use serde::Serialize;

use crate::database::{BucketListStore, UserStore};
use crate::services::points_ledger::{self, POINTS_PER_TASK};
use crate::utils::error::AppError;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecalculationReport {
    pub users_reset: u64,
    pub bucket_lists: usize,
    pub completed_tasks: usize,
    pub ledger_failures: u32,
}

/// Resets all points to zero, then replays each list's completed-task count
/// through the points ledger.
///
/// Every list is read before anything is reset. If the read fails or any
/// stored list cannot be decoded, no points are touched.
pub async fn recalculate_all_points<S>(db: &S) -> Result<RecalculationReport, AppError>
where
    S: UserStore + BucketListStore + ?Sized,
{
    log::info!("🔄 Starting points recalculation...");

    let scan = db.scan_bucket_lists().await?;
    if scan.unreadable > 0 {
        log::error!(
            "❌ {} bucket lists could not be read; points left untouched. Run migrate-legacy first.",
            scan.unreadable
        );
        return Err(AppError::Internal(format!(
            "{} bucket lists could not be read; run migrate-legacy before recalculating",
            scan.unreadable
        )));
    }
    let bucket_lists = scan.lists;
    log::info!("   Found {} bucket lists", bucket_lists.len());

    let mut report = RecalculationReport {
        users_reset: db.reset_all_points().await?,
        bucket_lists: bucket_lists.len(),
        ..Default::default()
    };
    log::info!("   Reset points for {} users", report.users_reset);

    for list in &bucket_lists {
        let completed = list.completed_count();
        if completed == 0 {
            continue;
        }
        report.completed_tasks += completed;

        let points = completed as i64 * POINTS_PER_TASK;
        let outcome = points_ledger::apply_delta(db, &list.mentor_name, points).await;
        report.ledger_failures += outcome.failures;

        log::info!(
            "   {} completed tasks for {} -> {:+} (mentees: {})",
            completed,
            list.mentor_name,
            points,
            outcome.mentees_updated
        );
    }

    log::info!("✅ Recalculation complete: {:?}", report);

    match db.top_users_by_points(5).await {
        Ok(top) => {
            log::info!("🏆 Top {} users by points:", top.len());
            for (rank, user) in top.iter().enumerate() {
                log::info!("   {}. {}: {} points", rank + 1, user.full_name, user.points);
            }
        }
        Err(e) => log::warn!("⚠️  Could not load top users: {}", e),
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::models::{AccountType, BucketList, Task};
    use std::sync::atomic::Ordering;

    fn completed(description: &str) -> Task {
        Task { completed: true, ..Task::new(description) }
    }

    #[tokio::test]
    async fn test_recalculation_repairs_drift() {
        let store = MemoryStore::new();
        store.add_user("Alice", AccountType::Mentor, None);
        store.add_user("Bob", AccountType::Student, Some("Alice"));
        store.add_user("Zed", AccountType::Mentor, None);
        store.add_user("Yan", AccountType::Student, Some("Zed"));
        store.add_user("Loner", AccountType::Student, None);

        // Drifted values
        store.set_points("Alice", 999);
        store.set_points("Bob", -20);
        store.set_points("Loner", 50);

        store.insert_bucket_list(BucketList {
            mentor_name: "Alice".into(),
            tasks: vec![completed("a"), completed("b"), Task::new("c")],
        });
        store.insert_bucket_list(BucketList {
            mentor_name: "Zed".into(),
            tasks: vec![Task::new("d")],
        });

        let report = recalculate_all_points(&store).await.unwrap();

        assert_eq!(report.users_reset, 5);
        assert_eq!(report.bucket_lists, 2);
        assert_eq!(report.completed_tasks, 2);
        assert_eq!(store.points("Alice"), 20);
        assert_eq!(store.points("Bob"), 20);
        assert_eq!(store.points("Zed"), 0);
        assert_eq!(store.points("Yan"), 0);
        assert_eq!(store.points("Loner"), 0);
    }

    fn drifted_group() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_user("Alice", AccountType::Mentor, None);
        store.add_user("Bob", AccountType::Student, Some("Alice"));
        store.set_points("Alice", 30);
        store.set_points("Bob", 30);
        store.insert_bucket_list(BucketList {
            mentor_name: "Alice".into(),
            tasks: vec![completed("a"), completed("b"), completed("c")],
        });
        store
    }

    #[tokio::test]
    async fn test_failed_list_read_keeps_points() {
        let store = drifted_group();
        store.fail_list_reads.store(true, Ordering::SeqCst);

        assert!(recalculate_all_points(&store).await.is_err());

        assert_eq!(store.points("Alice"), 30);
        assert_eq!(store.points("Bob"), 30);
    }

    #[tokio::test]
    async fn test_unreadable_list_aborts_before_reset() {
        let store = drifted_group();
        store.unreadable_lists.store(1, Ordering::SeqCst);

        let err = recalculate_all_points(&store).await.unwrap_err();

        assert!(err.message().contains("migrate-legacy"));
        assert_eq!(store.points("Alice"), 30);
        assert_eq!(store.points("Bob"), 30);
    }

    #[tokio::test]
    async fn test_recalculation_is_repeatable() {
        let store = MemoryStore::new();
        store.add_user("Alice", AccountType::Mentor, None);
        store.insert_bucket_list(BucketList {
            mentor_name: "Alice".into(),
            tasks: vec![completed("a")],
        });

        recalculate_all_points(&store).await.unwrap();
        recalculate_all_points(&store).await.unwrap();

        assert_eq!(store.points("Alice"), POINTS_PER_TASK);
    }
}

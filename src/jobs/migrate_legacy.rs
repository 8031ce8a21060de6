// ==================== LEGACY RECORD MIGRATION ====================
// One-shot maintenance job for documents written before tasks were keyed
// by `id` and before account types were stored in canonical casing.
// Running it again finds nothing to change.

use futures::stream::StreamExt;
use mongodb::bson::{doc, Bson, Document};
use serde::Serialize;
use uuid::Uuid;

use crate::database::{MongoDB, BUCKET_LISTS, USERS};
use crate::models::AccountType;
use crate::utils::error::AppError;

const LEGACY_TASK_ID: &str = "task_id";

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    pub bucket_lists_updated: u64,
    pub tasks_rekeyed: usize,
    pub users_normalised: u64,
}

/// Canonical task id from a legacy value, minting a new one when the value is not a UUID
fn canonical_task_id(value: Option<&Bson>) -> String {
    value
        .and_then(Bson::as_str)
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string()
}

/// Rewrites one task document into the current shape.
/// Returns true if anything changed.
fn migrate_task(task: &mut Document) -> bool {
    let mut changed = false;

    if !matches!(task.get("id"), Some(Bson::String(_))) {
        let id = canonical_task_id(task.get(LEGACY_TASK_ID));
        task.insert("id", id);
        changed = true;
    }
    if task.remove(LEGACY_TASK_ID).is_some() {
        changed = true;
    }
    if !matches!(task.get("completed"), Some(Bson::Boolean(_))) {
        task.insert("completed", false);
        changed = true;
    }

    changed
}

/// Migrates a bucket list's task array; `None` when nothing needed to change
fn migrate_tasks(tasks: &[Bson]) -> Option<(Vec<Bson>, usize)> {
    let mut rekeyed = 0;
    let migrated: Vec<Bson> = tasks
        .iter()
        .map(|task| match task {
            Bson::Document(task) => {
                let mut task = task.clone();
                if migrate_task(&mut task) {
                    rekeyed += 1;
                }
                Bson::Document(task)
            }
            other => other.clone(),
        })
        .collect();

    (rekeyed > 0).then_some((migrated, rekeyed))
}

/// Stored role spellings that are not canonical
fn legacy_role_spellings(account_type: AccountType) -> Vec<&'static str> {
    match account_type {
        AccountType::Student => vec!["student", "mentee", "Mentee"],
        AccountType::Mentor => vec!["mentor"],
        AccountType::Admin => vec!["admin"],
    }
}

pub async fn migrate_legacy_records(db: &MongoDB) -> Result<MigrationReport, AppError> {
    log::info!("🔄 Starting legacy record migration...");

    let mut report = MigrationReport::default();
    let bucket_lists = db.collection::<Document>(BUCKET_LISTS);

    let mut cursor = bucket_lists.find(doc! {}).await?;
    while let Some(result) = cursor.next().await {
        let list = match result {
            Ok(list) => list,
            Err(e) => {
                log::error!("❌ Error reading bucket list: {}", e);
                continue;
            }
        };

        let Ok(tasks) = list.get_array("tasks") else {
            continue;
        };
        let Some((migrated, rekeyed)) = migrate_tasks(tasks) else {
            continue;
        };
        let Some(id) = list.get("_id").cloned() else {
            continue;
        };

        // Offline job: whole-array rewrite is acceptable here
        bucket_lists
            .update_one(doc! { "_id": id }, doc! { "$set": { "tasks": migrated } })
            .await?;

        report.bucket_lists_updated += 1;
        report.tasks_rekeyed += rekeyed;
        log::info!(
            "   ✅ {}: migrated {} tasks",
            list.get_str("mentor_name").unwrap_or("Unknown"),
            rekeyed
        );
    }

    let users = db.collection::<Document>(USERS);
    for account_type in [AccountType::Student, AccountType::Mentor, AccountType::Admin] {
        let result = users
            .update_many(
                doc! { "accountType": { "$in": legacy_role_spellings(account_type) } },
                doc! { "$set": { "accountType": account_type.as_str() } },
            )
            .await?;
        report.users_normalised += result.modified_count;
    }

    log::info!("✅ Migration complete: {:?}", report);

    Ok(report)
}

//! Task workflow for mentor group bucket lists.
//!
//! Each task is either incomplete or complete. `complete_task` is the one-way
//! shortcut for `toggle_task(.., true)`. Every real transition goes through
//! the points ledger; repeating a call for a task already in the target
//! state changes nothing.

use crate::database::{BucketListStore, UserStore};
use crate::models::{parse_task_id, BucketList, Task};
use crate::services::authorization::{authorize, TASK_EDITORS};
use crate::services::points_ledger::{self, LedgerOutcome};
use crate::utils::error::AppError;

/// Result of a completion change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTransition {
    /// State changed and points were propagated
    Applied(LedgerOutcome),
    /// Task was already in the requested state
    Unchanged,
}

fn require_mentor_name(mentor_name: &str) -> Result<&str, AppError> {
    let mentor_name = mentor_name.trim();
    if mentor_name.is_empty() {
        return Err(AppError::InvalidInput("mentor_name is required".to_string()));
    }
    Ok(mentor_name)
}

/// Appends a new incomplete task, creating the mentor's list if absent
pub async fn add_task<S>(
    db: &S,
    mentor_name: &str,
    description: &str,
    acting_user_email: &str,
) -> Result<Task, AppError>
where
    S: UserStore + BucketListStore + ?Sized,
{
    let mentor_name = require_mentor_name(mentor_name)?;
    let description = description.trim();
    if description.is_empty() {
        return Err(AppError::InvalidInput("Task description is required".to_string()));
    }

    authorize(db, acting_user_email, TASK_EDITORS).await?;

    let task = Task::new(description);
    db.push_task(mentor_name, &task).await?;

    log::info!("📝 Task {} added to {}'s bucket list by {}", task.id, mentor_name, acting_user_email);

    Ok(task)
}

/// Tasks for a mentor group; a missing list is simply empty
pub async fn list_tasks<S>(db: &S, mentor_name: &str) -> Result<Vec<Task>, AppError>
where
    S: BucketListStore + ?Sized,
{
    Ok(db
        .find_bucket_list(mentor_name)
        .await?
        .map(|list| list.tasks)
        .unwrap_or_default())
}

/// The mentor group's list as a resource; a missing list is `NotFound`
pub async fn get_bucket_list<S>(db: &S, mentor_name: &str) -> Result<BucketList, AppError>
where
    S: BucketListStore + ?Sized,
{
    db.find_bucket_list(mentor_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Bucket list not found".to_string()))
}

pub async fn all_bucket_lists<S>(db: &S) -> Result<Vec<BucketList>, AppError>
where
    S: BucketListStore + ?Sized,
{
    db.all_bucket_lists().await
}

pub async fn complete_task<S>(
    db: &S,
    mentor_name: &str,
    task_id: &str,
    acting_user_email: &str,
) -> Result<TaskTransition, AppError>
where
    S: UserStore + BucketListStore + ?Sized,
{
    set_completion(db, mentor_name, task_id, true, acting_user_email).await
}

pub async fn toggle_task<S>(
    db: &S,
    mentor_name: &str,
    task_id: &str,
    completed: bool,
    acting_user_email: &str,
) -> Result<TaskTransition, AppError>
where
    S: UserStore + BucketListStore + ?Sized,
{
    set_completion(db, mentor_name, task_id, completed, acting_user_email).await
}

async fn set_completion<S>(
    db: &S,
    mentor_name: &str,
    task_id: &str,
    completed: bool,
    acting_user_email: &str,
) -> Result<TaskTransition, AppError>
where
    S: UserStore + BucketListStore + ?Sized,
{
    let mentor_name = require_mentor_name(mentor_name)?;
    let task_id = parse_task_id(task_id)?;

    authorize(db, acting_user_email, TASK_EDITORS).await?;

    let list = get_bucket_list(db, mentor_name).await?;
    let task = list
        .task(&task_id)
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    if task.completed == completed {
        return Ok(TaskTransition::Unchanged);
    }

    if !db.set_task_completed(mentor_name, &task_id, completed).await? {
        // Either another request flipped it first and already moved the
        // points, or the task was deleted in between
        let still_there = db
            .find_bucket_list(mentor_name)
            .await?
            .is_some_and(|list| list.task(&task_id).is_some());
        if !still_there {
            return Err(AppError::NotFound("Task not found".to_string()));
        }
        log::debug!("Task {} reached completed={} concurrently", task_id, completed);
        return Ok(TaskTransition::Unchanged);
    }

    log::info!(
        "✅ Task {} in {}'s bucket list marked {} by {}",
        task_id,
        mentor_name,
        if completed { "complete" } else { "incomplete" },
        acting_user_email
    );

    let outcome = points_ledger::apply_delta(db, mentor_name, points_ledger::delta_for(completed)).await;

    Ok(TaskTransition::Applied(outcome))
}

/// Removes a task. Points already awarded for a completed task are kept.
pub async fn delete_task<S>(
    db: &S,
    mentor_name: &str,
    task_id: &str,
    acting_user_email: &str,
) -> Result<(), AppError>
where
    S: UserStore + BucketListStore + ?Sized,
{
    let mentor_name = require_mentor_name(mentor_name)?;
    let task_id = parse_task_id(task_id)?;

    authorize(db, acting_user_email, TASK_EDITORS).await?;

    let list = get_bucket_list(db, mentor_name).await?;
    let task = list
        .task(&task_id)
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;
    let was_completed = task.completed;

    if !db.remove_task(mentor_name, &task_id).await? {
        return Err(AppError::NotFound("Task not found".to_string()));
    }

    log::info!(
        "🗑️ Task {} removed from {}'s bucket list by {} (completed: {}, points kept)",
        task_id,
        mentor_name,
        acting_user_email,
        was_completed
    );

    Ok(())
}

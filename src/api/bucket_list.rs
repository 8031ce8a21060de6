use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::database::MongoDB;
use crate::models::{
    ActingUserQuery, AddTaskRequest, BucketList, Task, TaskCreatedResponse, ToggleTaskRequest,
};
use crate::services::bucket_list_service::{self, TaskTransition};
use crate::utils::error::AppError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TaskUpdateResponse {
    pub message: String,
    /// Whether the task actually changed state
    pub changed: bool,
    /// Points applied to the mentor and each group member (0 when unchanged)
    pub points_delta: i64,
    pub mentor_updated: bool,
    pub mentees_updated: u64,
}

impl TaskUpdateResponse {
    fn from_transition(transition: TaskTransition, applied: &str, unchanged: &str) -> Self {
        match transition {
            TaskTransition::Applied(outcome) => Self {
                message: applied.to_string(),
                changed: true,
                points_delta: outcome.delta,
                mentor_updated: outcome.mentor_updated,
                mentees_updated: outcome.mentees_updated,
            },
            TaskTransition::Unchanged => Self {
                message: unchanged.to_string(),
                changed: false,
                points_delta: 0,
                mentor_updated: false,
                mentees_updated: 0,
            },
        }
    }
}

#[utoipa::path(
    get,
    path = "/bucketlist/{mentor_name}/bucket_lists",
    tag = "Bucket Lists",
    params(("mentor_name" = String, Path, description = "Mentor's full name")),
    responses(
        (status = 200, description = "The mentor group's bucket list", body = BucketList),
        (status = 404, description = "Bucket list not found")
    )
)]
pub async fn get_bucket_list(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let list = bucket_list_service::get_bucket_list(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Missing lists come back as an empty array
#[utoipa::path(
    get,
    path = "/bucketlist/bucket_lists/{mentor_name}",
    tag = "Bucket Lists",
    params(("mentor_name" = String, Path, description = "Mentor's full name")),
    responses(
        (status = 200, description = "Tasks of the mentor group", body = [Task])
    )
)]
pub async fn list_tasks(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let tasks = bucket_list_service::list_tasks(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

#[utoipa::path(
    get,
    path = "/bucketlist/bucket_lists",
    tag = "Bucket Lists",
    responses(
        (status = 200, description = "Every bucket list", body = [BucketList])
    )
)]
pub async fn get_all_bucket_lists(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let lists = bucket_list_service::all_bucket_lists(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(lists))
}

#[utoipa::path(
    post,
    path = "/bucketlist/{mentor_name}/bucket_lists",
    tag = "Bucket Lists",
    params(
        ("mentor_name" = String, Path, description = "Mentor's full name"),
        ("user_email" = String, Query, description = "Email of the acting user")
    ),
    request_body = AddTaskRequest,
    responses(
        (status = 200, description = "Task added", body = TaskCreatedResponse),
        (status = 400, description = "Empty description"),
        (status = 403, description = "Acting user may not edit tasks"),
        (status = 404, description = "Acting user not found")
    )
)]
pub async fn add_task(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    query: web::Query<ActingUserQuery>,
    body: web::Json<AddTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let mentor_name = path.into_inner();
    log::info!("📝 POST /bucketlist/{}/bucket_lists - user: {}", mentor_name, query.user_email);

    let task = bucket_list_service::add_task(
        db.get_ref(),
        &mentor_name,
        &body.description,
        &query.user_email,
    )
    .await?;

    Ok(HttpResponse::Ok().json(TaskCreatedResponse {
        message: "Task added".to_string(),
        task_id: task.id,
    }))
}

#[utoipa::path(
    put,
    path = "/bucketlist/{mentor_name}/bucket_lists/complete/{task_id}",
    tag = "Bucket Lists",
    params(
        ("mentor_name" = String, Path, description = "Mentor's full name"),
        ("task_id" = String, Path, description = "Task UUID"),
        ("user_email" = String, Query, description = "Email of the acting user")
    ),
    responses(
        (status = 200, description = "Task completed, or already complete", body = TaskUpdateResponse),
        (status = 400, description = "Malformed task id"),
        (status = 403, description = "Acting user may not edit tasks"),
        (status = 404, description = "User, bucket list or task not found")
    )
)]
pub async fn complete_task(
    db: web::Data<MongoDB>,
    path: web::Path<(String, String)>,
    query: web::Query<ActingUserQuery>,
) -> Result<HttpResponse, AppError> {
    let (mentor_name, task_id) = path.into_inner();
    log::info!(
        "🏁 PUT /bucketlist/{}/bucket_lists/complete/{} - user: {}",
        mentor_name,
        task_id,
        query.user_email
    );

    let transition =
        bucket_list_service::complete_task(db.get_ref(), &mentor_name, &task_id, &query.user_email).await?;

    Ok(HttpResponse::Ok().json(TaskUpdateResponse::from_transition(
        transition,
        "Task marked complete and points awarded",
        "Task already completed",
    )))
}

#[utoipa::path(
    put,
    path = "/bucketlist/{mentor_name}/bucket_lists/toggle/{task_id}",
    tag = "Bucket Lists",
    params(
        ("mentor_name" = String, Path, description = "Mentor's full name"),
        ("task_id" = String, Path, description = "Task UUID"),
        ("user_email" = String, Query, description = "Email of the acting user")
    ),
    request_body = ToggleTaskRequest,
    responses(
        (status = 200, description = "Task status updated", body = TaskUpdateResponse),
        (status = 400, description = "Malformed task id"),
        (status = 403, description = "Acting user may not edit tasks"),
        (status = 404, description = "User, bucket list or task not found")
    )
)]
pub async fn toggle_task(
    db: web::Data<MongoDB>,
    path: web::Path<(String, String)>,
    query: web::Query<ActingUserQuery>,
    body: web::Json<ToggleTaskRequest>,
) -> Result<HttpResponse, AppError> {
    let (mentor_name, task_id) = path.into_inner();
    log::info!(
        "🔁 PUT /bucketlist/{}/bucket_lists/toggle/{} - completed: {}, user: {}",
        mentor_name,
        task_id,
        body.completed,
        query.user_email
    );

    let transition = bucket_list_service::toggle_task(
        db.get_ref(),
        &mentor_name,
        &task_id,
        body.completed,
        &query.user_email,
    )
    .await?;

    Ok(HttpResponse::Ok().json(TaskUpdateResponse::from_transition(
        transition,
        "Task status updated",
        "Task status unchanged",
    )))
}

#[utoipa::path(
    delete,
    path = "/bucketlist/{mentor_name}/bucket_lists/task/{task_id}",
    tag = "Bucket Lists",
    params(
        ("mentor_name" = String, Path, description = "Mentor's full name"),
        ("task_id" = String, Path, description = "Task UUID"),
        ("user_email" = String, Query, description = "Email of the acting user")
    ),
    responses(
        (status = 200, description = "Task deleted; awarded points are kept"),
        (status = 400, description = "Malformed task id"),
        (status = 403, description = "Acting user may not edit tasks"),
        (status = 404, description = "User, bucket list or task not found")
    )
)]
pub async fn delete_task(
    db: web::Data<MongoDB>,
    path: web::Path<(String, String)>,
    query: web::Query<ActingUserQuery>,
) -> Result<HttpResponse, AppError> {
    let (mentor_name, task_id) = path.into_inner();
    log::info!(
        "🗑️ DELETE /bucketlist/{}/bucket_lists/task/{} - user: {}",
        mentor_name,
        task_id,
        query.user_email
    );

    bucket_list_service::delete_task(db.get_ref(), &mentor_name, &task_id, &query.user_email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Task deleted"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::points_ledger::LedgerOutcome;

    #[test]
    fn test_unchanged_transition_reports_no_points() {
        let response = TaskUpdateResponse::from_transition(
            TaskTransition::Unchanged,
            "Task marked complete and points awarded",
            "Task already completed",
        );
        assert!(!response.changed);
        assert_eq!(response.points_delta, 0);
        assert_eq!(response.message, "Task already completed");
    }

    #[test]
    fn test_applied_transition_carries_ledger_outcome() {
        let outcome = LedgerOutcome {
            delta: 10,
            mentor_updated: true,
            mentees_updated: 2,
            failures: 0,
        };
        let response = TaskUpdateResponse::from_transition(
            TaskTransition::Applied(outcome),
            "Task marked complete and points awarded",
            "Task already completed",
        );
        assert!(response.changed);
        assert_eq!(response.points_delta, 10);
        assert!(response.mentor_updated);
        assert_eq!(response.mentees_updated, 2);
    }
}

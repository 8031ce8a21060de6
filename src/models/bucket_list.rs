use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::error::AppError;

/// Task embedded in a mentor group's bucket list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Task {
    /// Stable UUID; the only identity field
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            completed: false,
        }
    }
}

/// One bucket list per mentor group, keyed by the mentor's fullName
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BucketList {
    pub mentor_name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl BucketList {
    pub fn empty(mentor_name: impl Into<String>) -> Self {
        Self {
            mentor_name: mentor_name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

/// Parses a task id from a request path, returning its canonical form
pub fn parse_task_id(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidInput(format!("Invalid task ID: {}", raw)))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddTaskRequest {
    pub description: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ToggleTaskRequest {
    pub completed: bool,
}

/// Email of the caller performing a task mutation
#[derive(Debug, Deserialize)]
pub struct ActingUserQuery {
    pub user_email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TaskCreatedResponse {
    pub message: String,
    pub task_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_starts_incomplete_with_uuid() {
        let task = Task::new("Read chapter 1");
        assert!(!task.completed);
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn test_parse_task_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_task_id(&id.to_string().to_uppercase()).unwrap(), id.to_string());
        assert!(matches!(parse_task_id("not-a-uuid"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_completed_count() {
        let mut list = BucketList::empty("Alice");
        list.tasks.push(Task::new("a"));
        list.tasks.push(Task { completed: true, ..Task::new("b") });
        list.tasks.push(Task { completed: true, ..Task::new("c") });
        assert_eq!(list.completed_count(), 2);
    }
}

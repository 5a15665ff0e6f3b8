use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{TaskId, UserId},
    task::{
        event::{CreateTask, DeleteTask, UpdateTask},
        Task,
    },
};
use serde::{Deserialize, Serialize};

// email の書式は検証しない。存在しないユーザーとして 404 で返す
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(skip)]
    #[serde(default)]
    pub body: String,
    #[garde(skip)]
    pub email: String,
}

impl From<CreateTaskRequest> for CreateTask {
    fn from(value: CreateTaskRequest) -> Self {
        let CreateTaskRequest { title, body, email } = value;
        CreateTask {
            title,
            body,
            requested_email: email,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[garde(skip)]
    pub email: String,
    #[garde(length(min = 1))]
    pub title: Option<String>,
    #[garde(skip)]
    pub body: Option<String>,
}

#[derive(new)]
pub struct UpdateTaskRequestWithId(TaskId, UpdateTaskRequest);
impl From<UpdateTaskRequestWithId> for UpdateTask {
    fn from(value: UpdateTaskRequestWithId) -> Self {
        let UpdateTaskRequestWithId(task_id, UpdateTaskRequest { email, title, body }) = value;
        UpdateTask {
            task_id,
            title,
            body,
            requested_email: email,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskRequest {
    pub email: String,
}

#[derive(new)]
pub struct DeleteTaskRequestWithId(TaskId, DeleteTaskRequest);
impl From<DeleteTaskRequestWithId> for DeleteTask {
    fn from(value: DeleteTaskRequestWithId) -> Self {
        let DeleteTaskRequestWithId(task_id, DeleteTaskRequest { email }) = value;
        DeleteTask {
            task_id,
            requested_email: email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: TaskId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

impl From<Task> for TaskResponse {
    fn from(value: Task) -> Self {
        let Task {
            task_id,
            title,
            body,
            created_at,
            owner,
        } = value;
        Self {
            id: task_id,
            title,
            body,
            created_at,
            user_id: owner,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddTaskResponse {
    pub list: TaskResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTaskResponse {
    pub message: String,
    pub task: TaskResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub const NO_TASKS: &str = "NO Tasks";

/// A non-empty task list, or the explicit "no tasks" marker.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TasksResponse {
    Tasks { tasks: Vec<TaskResponse> },
    Empty { message: String },
}

impl From<Vec<Task>> for TasksResponse {
    fn from(value: Vec<Task>) -> Self {
        if value.is_empty() {
            return Self::Empty {
                message: NO_TASKS.into(),
            };
        }
        Self::Tasks {
            tasks: value.into_iter().map(TaskResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_fails_validation() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title":"","email":"a@x.com"}"#).unwrap();
        assert!(req.validate(&()).is_err());
        assert_eq!(req.body, "");
    }

    #[test]
    fn update_allows_missing_body() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"title":"T2","email":"a@x.com"}"#).unwrap();
        assert!(req.validate(&()).is_ok());
        assert!(req.body.is_none());

        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"title":"","email":"a@x.com"}"#).unwrap();
        assert!(req.validate(&()).is_err());
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            task_id: TaskId::new(),
            title: "T1".into(),
            body: "B1".into(),
            created_at: Utc::now(),
            owner: UserId::new(),
        };
        let value = serde_json::to_value(TaskResponse::from(task.clone())).unwrap();
        assert_eq!(value["id"], task.task_id.to_string());
        assert_eq!(value["userId"], task.owner.to_string());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn empty_list_is_explicit_marker() {
        let value = serde_json::to_value(TasksResponse::from(Vec::new())).unwrap();
        assert_eq!(value, serde_json::json!({ "message": "NO Tasks" }));
    }
}

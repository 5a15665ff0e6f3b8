use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub body: String,
    pub email: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskChanges {
    pub title: String,
    pub body: String,
    pub email: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListing {
    Tasks(Vec<RemoteTask>),
    Empty(String),
}

/// A task as held in the view's local list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub user_id: String,
}

impl From<RemoteTask> for TodoItem {
    fn from(value: RemoteTask) -> Self {
        let RemoteTask {
            id,
            title,
            body,
            user_id,
            ..
        } = value;
        Self {
            id,
            title,
            body,
            user_id,
        }
    }
}

// 以下はレスポンスボディの形
#[derive(Deserialize)]
pub(crate) struct AddTaskBody {
    pub list: RemoteTask,
}

#[derive(Deserialize)]
pub(crate) struct UpdateTaskBody {
    pub task: RemoteTask,
}

#[derive(Deserialize)]
pub(crate) struct MessageBody {
    pub message: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody {
    Tasks { tasks: Vec<RemoteTask> },
    Empty { message: String },
}

impl From<ListBody> for TaskListing {
    fn from(value: ListBody) -> Self {
        match value {
            ListBody::Tasks { tasks } => TaskListing::Tasks(tasks),
            ListBody::Empty { message } => TaskListing::Empty(message),
        }
    }
}

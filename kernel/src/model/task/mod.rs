use chrono::{DateTime, Utc};

use crate::model::id::{TaskId, UserId};
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub task_id: TaskId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub owner: UserId,
}

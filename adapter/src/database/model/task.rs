use kernel::model::{
    id::{TaskId, UserId},
    task::Task,
};
use sqlx::types::chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct TaskRow {
    pub task_id: TaskId,
    pub title: String,
    pub body: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(value: TaskRow) -> Self {
        let TaskRow {
            task_id,
            title,
            body,
            user_id,
            created_at,
        } = value;
        Task {
            task_id,
            title,
            body,
            created_at,
            owner: user_id,
        }
    }
}

// 所有チェックで参照を特定するための型
#[derive(sqlx::FromRow)]
pub struct OwnedTaskRefRow {
    pub user_id: UserId,
    pub task_id: TaskId,
}

use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    task::{
        event::{CreateTask, DeleteTask, UpdateTask},
        Task,
    },
};

pub const USER_NOT_FOUND: &str = "User not found";
pub const TASK_NOT_FOUND: &str = "Task not found";
pub const UPDATE_NOT_ALLOWED: &str = "Task not found or you're not allowed to update this task";
pub const DELETE_NOT_ALLOWED: &str =
    "Task or user not found, or you're not allowed to delete this task";

/// Task persistence together with the owner's reference list.
///
/// Implementations must apply the two writes of `create` and `delete`
/// (the task record and the owner's reference) as one unit. Ownership
/// failures on `update`/`delete` are reported as `EntityNotFound` whether
/// or not the task exists under another owner.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, event: CreateTask) -> AppResult<Task>;
    async fn update(&self, event: UpdateTask) -> AppResult<Task>;
    async fn delete(&self, event: DeleteTask) -> AppResult<()>;
    // 作成日時の新しい順
    async fn find_by_owner(&self, user_id: UserId) -> AppResult<Vec<Task>>;
}

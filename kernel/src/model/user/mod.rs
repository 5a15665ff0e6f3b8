use crate::model::id::{TaskId, UserId};
pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    // 作成順に並んだ所有タスクの参照
    pub task_ids: Vec<TaskId>,
}

impl User {
    pub fn owns(&self, task_id: TaskId) -> bool {
        self.task_ids.contains(&task_id)
    }
}

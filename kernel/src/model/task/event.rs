use derive_new::new;

use crate::model::id::TaskId;

/// Adds a task for the user registered under `requested_email`.
#[derive(new, Debug)]
pub struct CreateTask {
    pub title: String,
    pub body: String,
    pub requested_email: String,
}

/// Overwrites title and/or body. `None` keeps the stored value.
#[derive(new, Debug)]
pub struct UpdateTask {
    pub task_id: TaskId,
    pub title: Option<String>,
    pub body: Option<String>,
    pub requested_email: String,
}

#[derive(new, Debug)]
pub struct DeleteTask {
    pub task_id: TaskId,
    pub requested_email: String,
}

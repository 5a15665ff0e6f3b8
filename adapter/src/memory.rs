use std::{collections::HashMap, sync::Arc};

use kernel::model::{
    id::{TaskId, UserId},
    task::Task,
    user::User,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local document store holding the user and task collections.
///
/// Both collections sit behind one lock, so a writer that touches a task and
/// its owner's reference list does so without any reader observing the
/// intermediate state.
#[derive(Clone, Default)]
pub struct InMemoryStore(Arc<RwLock<Collections>>);

#[derive(Default)]
pub struct Collections {
    pub users: HashMap<UserId, User>,
    pub tasks: HashMap<TaskId, TaskDocument>,
    next_seq: u64,
}

pub struct TaskDocument {
    pub task: Task,
    // 同一時刻に作られたタスクの並びを安定させるための挿入順
    pub seq: u64,
}

impl Collections {
    pub fn insert_task(&mut self, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(task.task_id, TaskDocument { task, seq });
    }

    pub fn user_by_email_mut(&mut self, email: &str) -> Option<&mut User> {
        self.users.values_mut().find(|u| u.email == email)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.0.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.0.write().await
    }
}

use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::{
    id::{TaskId, UserId},
    task::{
        event::{CreateTask, DeleteTask, UpdateTask},
        Task,
    },
    user::{event::CreateUser, User},
};
use kernel::repository::{
    health::HealthCheckRepository,
    task::{
        TaskRepository, DELETE_NOT_ALLOWED, TASK_NOT_FOUND, UPDATE_NOT_ALLOWED, USER_NOT_FOUND,
    },
    user::UserRepository,
};
use shared::error::{AppError, AppResult};

use crate::memory::InMemoryStore;

#[derive(new)]
pub struct InMemoryTaskRepository {
    store: InMemoryStore,
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, event: CreateTask) -> AppResult<Task> {
        let mut docs = self.store.write().await;

        let owner = docs
            .user_by_email_mut(&event.requested_email)
            .ok_or_else(|| AppError::EntityNotFound(USER_NOT_FOUND.into()))?;

        let task = Task {
            task_id: TaskId::new(),
            title: event.title,
            body: event.body,
            created_at: Utc::now(),
            owner: owner.user_id,
        };
        owner.task_ids.push(task.task_id);
        docs.insert_task(task.clone());

        Ok(task)
    }

    async fn update(&self, event: UpdateTask) -> AppResult<Task> {
        let mut docs = self.store.write().await;

        let owned = docs
            .user_by_email_mut(&event.requested_email)
            .is_some_and(|u| u.owns(event.task_id));
        if !owned {
            return Err(AppError::EntityNotFound(UPDATE_NOT_ALLOWED.into()));
        }

        let doc = docs
            .tasks
            .get_mut(&event.task_id)
            .ok_or_else(|| AppError::EntityNotFound(TASK_NOT_FOUND.into()))?;
        if let Some(title) = event.title {
            doc.task.title = title;
        }
        if let Some(body) = event.body {
            doc.task.body = body;
        }

        Ok(doc.task.clone())
    }

    async fn delete(&self, event: DeleteTask) -> AppResult<()> {
        let mut docs = self.store.write().await;

        let owner = docs
            .user_by_email_mut(&event.requested_email)
            .filter(|u| u.owns(event.task_id))
            .ok_or_else(|| AppError::EntityNotFound(DELETE_NOT_ALLOWED.into()))?;

        owner.task_ids.retain(|id| *id != event.task_id);
        if docs.tasks.remove(&event.task_id).is_none() {
            tracing::warn!(task_id = %event.task_id, "task record was already gone; removed dangling reference");
        }

        Ok(())
    }

    async fn find_by_owner(&self, user_id: UserId) -> AppResult<Vec<Task>> {
        let docs = self.store.read().await;

        let mut owned: Vec<_> = docs
            .tasks
            .values()
            .filter(|doc| doc.task.owner == user_id)
            .collect();
        owned.sort_by(|a, b| {
            b.task
                .created_at
                .cmp(&a.task.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(owned.into_iter().map(|doc| doc.task.clone()).collect())
    }
}

#[derive(new)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let mut docs = self.store.write().await;

        if docs.user_by_email_mut(&event.email).is_some() {
            return Err(AppError::UnprocessableEntity(format!(
                "User with email {} already exists",
                event.email
            )));
        }

        let user = User {
            user_id: UserId::new(),
            email: event.email,
            task_ids: Vec::new(),
        };
        docs.users.insert(user.user_id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.store.read().await.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .store
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

pub struct InMemoryHealthCheckRepository;

#[async_trait]
impl HealthCheckRepository for InMemoryHealthCheckRepository {
    async fn check_db(&self) -> bool {
        true
    }
}

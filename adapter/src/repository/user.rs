use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{TaskId, UserId},
    user::{event::CreateUser, User},
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::{model::user::UserRow, ConnectionPool};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let mut tx = self.db.begin().await?;

        let exists = sqlx::query("SELECT user_id FROM users WHERE email = $1")
            .bind(&event.email)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if exists.is_some() {
            return Err(AppError::UnprocessableEntity(format!(
                "User with email {} already exists",
                event.email
            )));
        }

        let row = sqlx::query_as::<_, UserRow>(
            r#"
                INSERT INTO users (user_id, email)
                VALUES ($1, $2)
                RETURNING user_id, email
            "#,
        )
        .bind(UserId::new())
        .bind(&event.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(row.into_user(Vec::new()))
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        self.with_task_refs(row).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT user_id, email
                FROM users
                WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        self.with_task_refs(row).await
    }
}

impl UserRepositoryImpl {
    async fn with_task_refs(&self, row: Option<UserRow>) -> AppResult<Option<User>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let task_ids: Vec<TaskId> = sqlx::query_scalar(
            r#"
                SELECT task_id
                FROM user_task_refs
                WHERE user_id = $1
                ORDER BY position ASC
            "#,
        )
        .bind(row.user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(Some(row.into_user(task_ids)))
    }
}

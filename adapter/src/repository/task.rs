use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{TaskId, UserId},
    task::{
        event::{CreateTask, DeleteTask, UpdateTask},
        Task,
    },
};
use kernel::repository::task::{
    TaskRepository, DELETE_NOT_ALLOWED, TASK_NOT_FOUND, UPDATE_NOT_ALLOWED, USER_NOT_FOUND,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::task::{OwnedTaskRefRow, TaskRow},
    ConnectionPool,
};

#[derive(new)]
pub struct TaskRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, event: CreateTask) -> AppResult<Task> {
        let mut tx = self.db.begin().await?;

        // 依頼者のメールアドレスからユーザーを引く。
        // 行ロックを取り、参照の追加が終わるまで他の更新を待たせる
        let owner: Option<UserId> = sqlx::query_scalar(
            r#"
                SELECT user_id
                FROM users
                WHERE email = $1
                FOR UPDATE
            "#,
        )
        .bind(&event.requested_email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(owner) = owner else {
            return Err(AppError::EntityNotFound(USER_NOT_FOUND.into()));
        };

        // タスクを先に作り、そのあとユーザーの参照一覧へ追加する
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
                INSERT INTO tasks (task_id, title, body, user_id)
                VALUES ($1, $2, $3, $4)
                RETURNING task_id, title, body, user_id, created_at
            "#,
        )
        .bind(TaskId::new())
        .bind(&event.title)
        .bind(&event.body)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query(
            r#"
                INSERT INTO user_task_refs (user_id, task_id)
                VALUES ($1, $2)
            "#,
        )
        .bind(owner)
        .bind(row.task_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No task reference has been appended to the user".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(row.into())
    }

    async fn update(&self, event: UpdateTask) -> AppResult<Task> {
        let mut tx = self.db.begin().await?;

        if self
            .find_owned_ref(&mut tx, &event.requested_email, event.task_id)
            .await?
            .is_none()
        {
            return Err(AppError::EntityNotFound(UPDATE_NOT_ALLOWED.into()));
        }

        let row = sqlx::query_as::<_, TaskRow>(
            r#"
                UPDATE tasks
                SET
                    title = COALESCE($1, title),
                    body = COALESCE($2, body)
                WHERE task_id = $3
                RETURNING task_id, title, body, user_id, created_at
            "#,
        )
        .bind(event.title)
        .bind(event.body)
        .bind(event.task_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound(TASK_NOT_FOUND.into()));
        };

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(row.into())
    }

    async fn delete(&self, event: DeleteTask) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let Some(owned) = self
            .find_owned_ref(&mut tx, &event.requested_email, event.task_id)
            .await?
        else {
            return Err(AppError::EntityNotFound(DELETE_NOT_ALLOWED.into()));
        };

        // 参照を先に外してからタスク本体を消す
        sqlx::query(
            r#"
                DELETE FROM user_task_refs
                WHERE user_id = $1 AND task_id = $2
            "#,
        )
        .bind(owned.user_id)
        .bind(owned.task_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM tasks WHERE task_id = $1")
            .bind(owned.task_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            tracing::warn!(task_id = %owned.task_id, "task record was already gone; removed dangling reference");
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn find_by_owner(&self, user_id: UserId) -> AppResult<Vec<Task>> {
        sqlx::query_as::<_, TaskRow>(
            r#"
                SELECT t.task_id, t.title, t.body, t.user_id, t.created_at
                FROM tasks AS t
                LEFT JOIN user_task_refs AS r ON r.task_id = t.task_id
                WHERE t.user_id = $1
                ORDER BY t.created_at DESC, r.position DESC NULLS LAST
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Task::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}

impl TaskRepositoryImpl {
    // メールアドレスが一致し、かつ参照一覧に task_id を持つユーザーを探す。
    // 見つからない理由（ユーザー不在・他人のタスク・タスク不在）は区別しない
    async fn find_owned_ref(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        email: &str,
        task_id: TaskId,
    ) -> AppResult<Option<OwnedTaskRefRow>> {
        sqlx::query_as::<_, OwnedTaskRefRow>(
            r#"
                SELECT r.user_id, r.task_id
                FROM user_task_refs AS r
                INNER JOIN users AS u ON r.user_id = u.user_id
                WHERE u.email = $1 AND r.task_id = $2
                FOR UPDATE OF r
            "#,
        )
        .bind(email)
        .bind(task_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)
    }
}

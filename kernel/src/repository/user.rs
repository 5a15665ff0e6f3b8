use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::UserId,
    user::{event::CreateUser, User},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    // ユーザーを登録する（メールアドレスは一意）
    async fn create(&self, event: CreateUser) -> AppResult<User>;
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

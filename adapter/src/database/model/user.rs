use kernel::model::{
    id::{TaskId, UserId},
    user::User,
};

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub email: String,
}

impl UserRow {
    // users テーブルの行に user_task_refs から取った参照一覧を合わせて User にする
    pub fn into_user(self, task_ids: Vec<TaskId>) -> User {
        let UserRow { user_id, email } = self;
        User {
            user_id,
            email,
            task_ids,
        }
    }
}

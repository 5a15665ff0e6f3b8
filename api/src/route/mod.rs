pub mod health;
pub mod task;
pub mod v2;

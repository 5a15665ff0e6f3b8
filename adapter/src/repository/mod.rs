pub mod health;
pub mod memory;
pub mod task;
pub mod user;

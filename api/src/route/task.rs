use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::task::{add_task, delete_task, show_task_list, update_task};

pub fn build_task_routers() -> Router<AppRegistry> {
    Router::new()
        .route("/addTask", post(add_task))
        .route("/updateTask/:id", put(update_task))
        .route("/deleteTask/:id", delete(delete_task))
        .route("/getTasks/:id", get(show_task_list))
}

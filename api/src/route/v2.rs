use super::{health::build_health_check_routers, task::build_task_routers};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_task_routers());
    Router::new().nest("/api/v2", router)
}

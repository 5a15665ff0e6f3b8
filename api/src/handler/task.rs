use axum::{extract::State, Json};
use garde::Validate;
use kernel::model::id::{TaskId, UserId};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::extractor::{JsonBody, PathParam};
use crate::model::task::{
    AddTaskResponse, CreateTaskRequest, DeleteTaskRequest, DeleteTaskRequestWithId,
    MessageResponse, TasksResponse, UpdateTaskRequest, UpdateTaskRequestWithId,
    UpdateTaskResponse,
};

pub async fn add_task(
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<CreateTaskRequest>,
) -> AppResult<Json<AddTaskResponse>> {
    req.validate(&())?;

    registry
        .task_repository()
        .create(req.into())
        .await
        .map(|task| {
            tracing::info!(task_id = %task.task_id, user_id = %task.owner, "task added");
            Json(AddTaskResponse { list: task.into() })
        })
}

pub async fn update_task(
    PathParam(task_id): PathParam<TaskId>,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<UpdateTaskRequest>,
) -> AppResult<Json<UpdateTaskResponse>> {
    req.validate(&())?;

    let update_task = UpdateTaskRequestWithId::new(task_id, req);
    registry
        .task_repository()
        .update(update_task.into())
        .await
        .map(|task| {
            Json(UpdateTaskResponse {
                message: "Task updated successfully".into(),
                task: task.into(),
            })
        })
}

pub async fn delete_task(
    PathParam(task_id): PathParam<TaskId>,
    State(registry): State<AppRegistry>,
    JsonBody(req): JsonBody<DeleteTaskRequest>,
) -> AppResult<Json<MessageResponse>> {
    let delete_task = DeleteTaskRequestWithId::new(task_id, req);
    registry
        .task_repository()
        .delete(delete_task.into())
        .await
        .map(|_| {
            tracing::info!(%task_id, "task deleted");
            Json(MessageResponse {
                message: "Task Deleted".into(),
            })
        })
}

pub async fn show_task_list(
    PathParam(user_id): PathParam<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<TasksResponse>> {
    registry
        .task_repository()
        .find_by_owner(user_id)
        .await
        .map(TasksResponse::from)
        .map(Json)
}

#[cfg(test)]
mod tests {
    use adapter::memory::InMemoryStore;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use kernel::model::user::{event::CreateUser, User};
    use rstest::rstest;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::route::v2;
    use registry::AppRegistry;

    struct TestApp {
        registry: AppRegistry,
        router: Router,
    }

    impl TestApp {
        fn new() -> Self {
            let registry = AppRegistry::in_memory(InMemoryStore::new());
            let router = v2::routes().with_state(registry.clone());
            Self { registry, router }
        }

        async fn user(&self, email: &str) -> User {
            self.registry
                .user_repository()
                .create(CreateUser::new(email.into()))
                .await
                .unwrap()
        }

        async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let builder = Request::builder().method(method).uri(uri);
            let req = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let res = self.router.clone().oneshot(req).await.unwrap();
            let status = res.status();
            let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, value)
        }

        async fn add(&self, title: &str, email: &str) -> (StatusCode, Value) {
            self.call(
                Method::POST,
                "/api/v2/addTask",
                Some(json!({ "title": title, "body": format!("{title} body"), "email": email })),
            )
            .await
        }
    }

    #[tokio::test]
    async fn test_task_scenario() {
        let app = TestApp::new();
        let user = app.user("a@x.com").await;

        let (status, body) = app.add("T1", "a@x.com").await;
        assert_eq!(status, StatusCode::OK);
        let id = body["list"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["list"]["userId"], user.user_id.to_string());

        let (status, body) = app
            .call(
                Method::PUT,
                &format!("/api/v2/updateTask/{id}"),
                Some(json!({ "title": "T2", "email": "a@x.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Task updated successfully");
        assert_eq!(body["task"]["title"], "T2");
        assert_eq!(body["task"]["body"], "T1 body");

        let (status, body) = app
            .call(
                Method::DELETE,
                &format!("/api/v2/deleteTask/{id}"),
                Some(json!({ "email": "a@x.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Task Deleted");

        let (status, body) = app
            .call(Method::GET, &format!("/api/v2/getTasks/{}", user.user_id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "NO Tasks" }));
    }

    #[tokio::test]
    async fn test_add_task_for_unknown_user() {
        let app = TestApp::new();
        let user = app.user("a@x.com").await;

        let (status, body) = app.add("T1", "nobody@x.com").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");

        let stored = app
            .registry
            .user_repository()
            .find_by_id(user.user_id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.task_ids.is_empty());
    }

    #[tokio::test]
    async fn test_add_task_requires_title() {
        let app = TestApp::new();
        app.user("a@x.com").await;

        let (status, _) = app.add("", "a@x.com").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case::update(
        Method::PUT,
        "updateTask",
        json!({ "title": "hijack", "email": "b@x.com" }),
        "Task not found or you're not allowed to update this task"
    )]
    #[case::delete(
        Method::DELETE,
        "deleteTask",
        json!({ "email": "b@x.com" }),
        "Task or user not found, or you're not allowed to delete this task"
    )]
    #[tokio::test]
    async fn test_foreign_task_reported_as_not_found(
        #[case] method: Method,
        #[case] path: &str,
        #[case] body: Value,
        #[case] message: &str,
    ) {
        let app = TestApp::new();
        let owner = app.user("a@x.com").await;
        app.user("b@x.com").await;
        let (_, created) = app.add("T1", "a@x.com").await;
        let id = created["list"]["id"].as_str().unwrap().to_string();

        let (status, res) = app
            .call(method.clone(), &format!("/api/v2/{path}/{id}"), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(res["message"], message);

        // 存在しない ID でも同じ応答になる
        let missing = kernel::model::id::TaskId::new();
        let (status, res) = app
            .call(method, &format!("/api/v2/{path}/{missing}"), Some(body))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(res["message"], message);

        let (_, listed) = app
            .call(Method::GET, &format!("/api/v2/getTasks/{}", owner.user_id), None)
            .await;
        assert_eq!(listed["tasks"][0]["title"], "T1");
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let app = TestApp::new();
        let user = app.user("a@x.com").await;
        for title in ["first", "second", "third"] {
            app.add(title, "a@x.com").await;
        }

        let (status, body) = app
            .call(Method::GET, &format!("/api/v2/getTasks/{}", user.user_id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<_> = body["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[rstest]
    #[case::missing_email(Method::POST, "addTask", Some(json!({ "title": "T1" })))]
    #[case::malformed_id(
        Method::PUT,
        "updateTask/not-an-id",
        Some(json!({ "title": "T2", "email": "a@x.com" }))
    )]
    #[case::delete_without_body(Method::DELETE, "deleteTask/{id}", None)]
    #[tokio::test]
    async fn test_unreadable_request_is_json_bad_request(
        #[case] method: Method,
        #[case] path: &str,
        #[case] body: Option<Value>,
    ) {
        let app = TestApp::new();
        let user = app.user("a@x.com").await;
        let (_, created) = app.add("T1", "a@x.com").await;
        let id = created["list"]["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v2/{}", path.replace("{id}", &id));

        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.router.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()["content-type"], "application/json");
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!value["message"].as_str().unwrap().is_empty());

        // 受け付けられなかった要求でタスクは変わらない
        let (_, listed) = app
            .call(Method::GET, &format!("/api/v2/getTasks/{}", user.user_id), None)
            .await;
        assert_eq!(listed["tasks"][0]["title"], "T1");
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::new();
        let (status, _) = app.call(Method::GET, "/api/v2/health", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.call(Method::GET, "/api/v2/health/db", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

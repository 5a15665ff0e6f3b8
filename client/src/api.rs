use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    error::ClientError,
    model::{
        AddTaskBody, ListBody, MessageBody, NewTask, RemoteTask, TaskChanges, TaskListing,
        UpdateTaskBody,
    },
};

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn add_task(&self, task: &NewTask) -> Result<RemoteTask, ClientError>;
    async fn update_task(&self, id: &str, changes: &TaskChanges)
        -> Result<RemoteTask, ClientError>;
    async fn delete_task(&self, id: &str, email: &str) -> Result<(), ClientError>;
    async fn get_tasks(&self, user_id: &str) -> Result<TaskListing, ClientError>;
}

/// `TaskApi` over HTTP against the `/api/v2` routes.
pub struct HttpTaskApi {
    http: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, path)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn add_task(&self, task: &NewTask) -> Result<RemoteTask, ClientError> {
        let res = self.http.post(self.url("addTask")).json(task).send().await?;
        read_json::<AddTaskBody>(res).await.map(|b| b.list)
    }

    async fn update_task(
        &self,
        id: &str,
        changes: &TaskChanges,
    ) -> Result<RemoteTask, ClientError> {
        let res = self
            .http
            .put(self.url(&format!("updateTask/{id}")))
            .json(changes)
            .send()
            .await?;
        read_json::<UpdateTaskBody>(res).await.map(|b| b.task)
    }

    async fn delete_task(&self, id: &str, email: &str) -> Result<(), ClientError> {
        let res = self
            .http
            .delete(self.url(&format!("deleteTask/{id}")))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        read_json::<MessageBody>(res).await.map(|_| ())
    }

    async fn get_tasks(&self, user_id: &str) -> Result<TaskListing, ClientError> {
        let res = self
            .http
            .get(self.url(&format!("getTasks/{user_id}")))
            .send()
            .await?;
        read_json::<ListBody>(res).await.map(TaskListing::from)
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json().await?);
    }

    let message = res.json::<MessageBody>().await.ok().map(|b| b.message);
    tracing::debug!(status = status.as_u16(), ?message, "request failed");
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

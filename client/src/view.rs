use std::fmt;

use crate::{
    api::TaskApi,
    error::ClientError,
    model::{NewTask, TaskChanges, TaskListing, TodoItem},
    notify::{Notifier, Toast},
    session::Session,
};

const SUBMIT_FAILED: &str = "An error occurred while processing your request.";
const DELETE_FAILED: &str = "An error occurred while deleting the task.";
const FETCH_FAILED: &str = "An error occurred while fetching tasks.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub title: String,
    pub body: String,
}

/// The to-do form and list, mirroring the server's task list locally.
///
/// `editing` is the id of the task loaded into the form, if any; a submit
/// updates that task instead of adding a new one. Update and delete are
/// checked against the cached owner id before any request is sent.
pub struct TodoView<A, N> {
    api: A,
    notifier: N,
    session: Option<Session>,
    form: TodoForm,
    body_visible: bool,
    editing: Option<String>,
    items: Vec<TodoItem>,
    loaded: bool,
}

impl<A: TaskApi, N: Notifier> TodoView<A, N> {
    pub fn new(api: A, notifier: N, session: Option<Session>) -> Self {
        Self {
            api,
            notifier,
            session,
            form: TodoForm::default(),
            body_visible: false,
            editing: None,
            items: Vec::new(),
            loaded: false,
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn form(&self) -> &TodoForm {
        &self.form
    }

    pub fn is_body_visible(&self) -> bool {
        self.body_visible
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Fetches the user's tasks on first display. Later calls do nothing.
    pub async fn load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let Some(session) = self.session.as_ref() else {
            return;
        };

        match self.api.get_tasks(&session.user_id).await {
            Ok(TaskListing::Tasks(tasks)) => {
                self.items = tasks.into_iter().map(TodoItem::from).collect();
            }
            Ok(TaskListing::Empty(message)) => self.notifier.notify(Toast::info(message)),
            Err(err) => self.report(err, FETCH_FAILED),
        }
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.form.title = value.into();
        self.body_visible = !self.form.title.is_empty();
    }

    /// Clicking the title field flips the body field's visibility.
    pub fn toggle_body(&mut self) {
        self.body_visible = !self.body_visible;
    }

    pub fn set_body(&mut self, value: impl Into<String>) {
        self.form.body = value.into();
    }

    pub async fn submit(&mut self) {
        let Some(session) = self.session.clone() else {
            self.notifier
                .notify(Toast::error("Please log in to add a task!"));
            return;
        };
        // タイトル未入力の送信は受け付けない
        if self.form.title.is_empty() {
            return;
        }

        match self.editing.clone() {
            Some(id) => self.submit_update(&session, id).await,
            None => self.submit_new(&session).await,
        }
    }

    async fn submit_new(&mut self, session: &Session) {
        let task = NewTask {
            title: self.form.title.clone(),
            body: self.form.body.clone(),
            email: session.email.clone(),
            user_id: session.user_id.clone(),
        };

        match self.api.add_task(&task).await {
            Ok(created) => {
                let mut item = TodoItem::from(created);
                item.user_id = session.user_id.clone();
                self.items.push(item);
                self.reset_form();
                self.notifier
                    .notify(Toast::success("Task added successfully!"));
            }
            Err(err) => self.report(err, SUBMIT_FAILED),
        }
    }

    async fn submit_update(&mut self, session: &Session, id: String) {
        if !self.owned_by(&id, session) {
            self.notifier
                .notify(Toast::error("You're not allowed to update this task!"));
            return;
        }

        let changes = TaskChanges {
            title: self.form.title.clone(),
            body: self.form.body.clone(),
            email: session.email.clone(),
            user_id: session.user_id.clone(),
        };

        match self.api.update_task(&id, &changes).await {
            Ok(updated) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.title = updated.title;
                    item.body = updated.body;
                }
                self.reset_form();
                self.notifier
                    .notify(Toast::success("Task updated successfully!"));
            }
            Err(err) => self.report(err, SUBMIT_FAILED),
        }
    }

    /// Loads a listed task into the form for editing.
    pub fn edit(&mut self, id: &str) {
        let Some(item) = self.items.iter().find(|item| item.id == id) else {
            return;
        };
        self.form = TodoForm {
            title: item.title.clone(),
            body: item.body.clone(),
        };
        self.editing = Some(item.id.clone());
        self.body_visible = true;
    }

    pub async fn delete(&mut self, id: &str) {
        let Some(session) = self.session.clone() else {
            self.notifier
                .notify(Toast::error("Please log in to delete a task!"));
            return;
        };
        if !self.owned_by(id, &session) {
            self.notifier
                .notify(Toast::error("You're not allowed to delete this task!"));
            return;
        }

        match self.api.delete_task(id, &session.email).await {
            Ok(()) => {
                self.items.retain(|item| item.id != id);
                if self.editing.as_deref() == Some(id) {
                    self.reset_form();
                }
                self.notifier
                    .notify(Toast::success("Task deleted successfully!"));
            }
            Err(err) => self.report(err, DELETE_FAILED),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    // キャッシュ上のタスクの所有者がログイン中のユーザーかどうか
    fn owned_by(&self, id: &str, session: &Session) -> bool {
        self.items
            .iter()
            .any(|item| item.id == id && item.user_id == session.user_id)
    }

    fn reset_form(&mut self) {
        self.form = TodoForm::default();
        self.editing = None;
        self.body_visible = false;
    }

    fn report(&self, err: ClientError, fallback: &str) {
        tracing::warn!(error = %err, "task request failed");
        let message = err.server_message().unwrap_or(fallback).to_string();
        self.notifier.notify(Toast::error(message));
    }
}

impl<A, N> fmt::Display for TodoView<A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "title: {}", self.form.title)?;
        if self.body_visible {
            writeln!(f, "body: {}", self.form.body)?;
        }
        let label = if self.editing.is_some() {
            "Update Todo"
        } else {
            "Add Todo"
        };
        writeln!(f, "[{label}]")?;

        if self.items.is_empty() {
            writeln!(f, "No tasks available.")?;
        }
        for item in &self.items {
            writeln!(f, "- {}: {}", item.title, item.body)?;
        }
        Ok(())
    }
}

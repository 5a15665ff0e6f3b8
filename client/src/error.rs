use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server responded with status {status}")]
    Server { status: u16, message: Option<String> },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// The `message` field of the server's error body, when there was one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Server { message, .. } => message.as_deref(),
            ClientError::Transport(_) => None,
        }
    }
}

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    // リクエストボディ・パスパラメータを取り出せなかった
    #[error("{}", .0.body_text())]
    InvalidJsonBody(#[from] JsonRejection),
    #[error("{}", .0.body_text())]
    InvalidPathParam(#[from] PathRejection),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_)
            | AppError::InvalidJsonBody(_)
            | AppError::InvalidPathParam(_) => StatusCode::BAD_REQUEST,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();

        // 5xx の詳細はログにだけ残し、クライアントには汎用メッセージを返す
        let message = if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status_code, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

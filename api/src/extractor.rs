use axum::extract::{FromRequest, FromRequestParts};
use shared::error::AppError;

// axum の Json / Path と同じだが、取り出しに失敗したときは AppError として
// {"message": ...} の 400 を返す

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathParam<T>(pub T);

//! Request extractors.

use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

/// JSON body extractor whose rejection is an [`AppError`].
///
/// Drop-in replacement for [`axum::Json`]: a malformed or unknown-field body
/// produces a 400 with the `{"success": false, "message": ...}` envelope
/// instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

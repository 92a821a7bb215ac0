//! Acting-user extraction.
//!
//! The chat host authenticates users and forwards their identity in the
//! `X-User-Id` and `X-Username` headers.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use crate::error::ErrorBody;

/// Header carrying the acting user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the acting user's display name.
pub const USERNAME_HEADER: &str = "x-username";

/// The user performing the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
    pub user_id: String,
    /// Falls back to the user id when the header is absent.
    pub username: String,
}

/// Rejection returned when the request carries no user identity.
#[derive(Debug)]
pub struct MissingUser;

impl IntoResponse for MissingUser {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: "unauthenticated",
            message: format!("the {USER_ID_HEADER} header is required"),
            field: None,
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

impl<S: Send + Sync> FromRequestParts<S> for ActingUser {
    type Rejection = MissingUser;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER).ok_or(MissingUser)?;
        let username = header_value(parts, USERNAME_HEADER).unwrap_or_else(|| user_id.clone());
        Ok(Self { user_id, username })
    }
}

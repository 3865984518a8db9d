use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kindred_core::CoreError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(e) => match e {
                CoreError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                CoreError::UnknownEntry(_) | CoreError::FavorNotFound(_) => StatusCode::NOT_FOUND,
                CoreError::SelfClaim | CoreError::NotClaimant => StatusCode::FORBIDDEN,
                CoreError::IllegalTransition { .. } => StatusCode::CONFLICT,
                CoreError::EmptyTask
                | CoreError::EmptyNote
                | CoreError::EmptyJournalEntry
                | CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

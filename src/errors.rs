use crate::ledger::LedgerError;
use crate::models::ErrorBody;
use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidValue | LedgerError::InvalidTarget => Self::bad_request(err.to_string()),
            LedgerError::NothingToUndo | LedgerError::NothingToRedo => Self::conflict(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },
}

impl ApiError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_map_to_http_status() {
        assert_eq!(AppError::from(LedgerError::InvalidValue).status, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::from(LedgerError::NothingToUndo).status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn malformed_json_body_keeps_status_and_message() {
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::Request;

        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"value":"abc"}"#))
            .unwrap();
        let rejection = Json::<crate::models::AddLeadRequest>::from_request(request, &())
            .await
            .unwrap_err();

        let err = AppError::from(rejection);
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.message.contains("value"));
    }

    #[test]
    fn server_message_only_for_rejections() {
        let err = ApiError::rejected(400, "quota exceeded");
        assert_eq!(err.server_message(), Some("quota exceeded"));

        let bare = ApiError::Rejected { status: 502, message: None };
        assert_eq!(bare.server_message(), None);
    }
}

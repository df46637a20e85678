use serde_json::json;
use std::fmt::Display;

use anyhow::Error as anyhowError;
use axum::{http::StatusCode, response::IntoResponse};

#[derive(Debug)]
pub enum AppError {
    // 400 bad request
    BadRequest(anyhowError),
    // 401 unauthorized
    Unauthorized(anyhowError),
    // 404 not found
    NotFound(anyhowError),
    // 409 conflict
    Conflict(anyhowError),
    // 500 internal server error
    InternalServerError(anyhowError),
    // 503 service unavailable
    ServiceUnavailable(anyhowError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn inner(&self) -> &anyhowError {
        match self {
            Self::BadRequest(e)
            | Self::Unauthorized(e)
            | Self::NotFound(e)
            | Self::Conflict(e)
            | Self::InternalServerError(e)
            | Self::ServiceUnavailable(e) => e,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(e) => write!(f, "BadRequest: {}", e),
            AppError::Unauthorized(e) => write!(f, "Unauthorized: {}", e),
            AppError::NotFound(e) => write!(f, "NotFound: {}", e),
            AppError::Conflict(e) => write!(f, "Conflict: {}", e),
            AppError::InternalServerError(e) => write!(f, "InternalServerError: {}", e),
            AppError::ServiceUnavailable(e) => write!(f, "ServiceUnavailable: {}", e),
        }
    }
}

impl From<anyhowError> for AppError {
    fn from(e: anyhowError) -> Self {
        AppError::InternalServerError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error_message = self.inner().to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{:#}", self.inner());
        }

        #[cfg(debug_assertions)]
        let error_response = json!({
            "success": false,
            "error": error_message,
            "type": format!("{:?}", self),
        });

        // Client errors keep their message; server errors only expose the reason phrase.
        #[cfg(not(debug_assertions))]
        let error_response = json!({
            "success": false,
            "error": if status.is_server_error() {
                status.canonical_reason().unwrap_or("An error occurred").to_string()
            } else {
                error_message
            },
        });

        (status, axum::Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            AppError::BadRequest(anyhow!("x")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound(anyhow!("x")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict(anyhow!("x")).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_carries_status() {
        let response = AppError::NotFound(anyhow!("Follow does not exist")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use warden::{Error as WardenError, ErrorKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} is invalid")]
    Invalid { field: &'static str },

    #[error(transparent)]
    Service(#[from] WardenError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Missing { field } => match *field {
                "email" => ErrorKind::EmptyEmail,
                "password" | "new_password" => ErrorKind::EmptyPassword,
                "code" => ErrorKind::EmptyCode,
                _ => ErrorKind::InvalidArgument,
            },
            ApiError::Invalid { .. } => ErrorKind::InvalidArgument,
            ApiError::Service(error) => error.kind(),
        }
    }
}

/// Transport status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorKind::UserExists => StatusCode::CONFLICT,
        ErrorKind::UserNotFound | ErrorKind::AppNotFound | ErrorKind::VerificationNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorKind::PasswordsAreEqual
        | ErrorKind::CodesDiffer
        | ErrorKind::EmptyEmail
        | ErrorKind::EmptyPassword
        | ErrorKind::EmptyCode
        | ErrorKind::EmptyExpiresAt
        | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::VerificationExpired => StatusCode::GONE,
        ErrorKind::DeliveryError => StatusCode::BAD_GATEWAY,
        ErrorKind::Cancelled => StatusCode::REQUEST_TIMEOUT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// User-visible message for service errors; never includes store details.
fn message_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidCredentials => "Invalid email or password",
        ErrorKind::UserExists => "User already exists",
        ErrorKind::UserNotFound => "User not found",
        ErrorKind::AppNotFound => "App not found",
        ErrorKind::PasswordsAreEqual => "New password must differ from the current one",
        ErrorKind::EmptyEmail => "email is required",
        ErrorKind::EmptyPassword => "password is required",
        ErrorKind::EmptyCode => "code is required",
        ErrorKind::EmptyExpiresAt => "expires_at is required",
        ErrorKind::VerificationNotFound => "No pending verification for this email",
        ErrorKind::VerificationExpired => "Verification code expired",
        ErrorKind::CodesDiffer => "Verification code does not match",
        ErrorKind::DeliveryError => "Failed to send email",
        ErrorKind::InvalidArgument => "Invalid argument",
        ErrorKind::Cancelled => "Request cancelled",
        ErrorKind::Internal => "Internal error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);

        let message = match &self {
            ApiError::Missing { .. } | ApiError::Invalid { .. } => self.to_string(),
            ApiError::Service(error) => {
                if kind == ErrorKind::Internal {
                    tracing::error!(error = %error, "Request failed");
                } else {
                    tracing::debug!(error = %error, kind = %kind, "Request rejected");
                }
                message_for(kind).to_string()
            }
        };

        let body = Json(json!({
            "error": message,
            "code": kind.as_str(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use warden::Error;
    use warden_core::error::{AuthError, StorageError, VerificationError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::UserExists), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::AppNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::CodesDiffer), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::VerificationExpired), StatusCode::GONE);
        assert_eq!(status_for(ErrorKind::DeliveryError), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::Cancelled), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn test_missing_field_kinds() {
        assert_eq!(ApiError::Missing { field: "email" }.kind(), ErrorKind::EmptyEmail);
        assert_eq!(ApiError::Missing { field: "new_password" }.kind(), ErrorKind::EmptyPassword);
        assert_eq!(ApiError::Missing { field: "app_id" }.kind(), ErrorKind::InvalidArgument);
        assert_eq!(ApiError::Missing { field: "code" }.to_string(), "code is required");
    }

    #[test]
    fn test_service_kinds_pass_through() {
        let error = ApiError::from(Error::from(VerificationError::Expired));
        assert_eq!(error.kind(), ErrorKind::VerificationExpired);

        let error = ApiError::from(Error::from(AuthError::UserExists));
        assert_eq!(status_for(error.kind()), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak() {
        let error = ApiError::from(Error::from(StorageError::Database(
            "disk I/O error at /var/lib/warden.db".to_string(),
        )));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Internal error");
        assert_eq!(body["code"], "INTERNAL");
    }
}

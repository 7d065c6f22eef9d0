//! Handler error definitions

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tonic::{Code, Status};

/// Errors produced while translating a job into an inventory call and back.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Bad payload shape, bad params, conflicting or missing relations
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A numeric value that does not fit the backend representation
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The operation is not supported for the resource
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// The inventory answered with an unexpected shape
    #[error("Internal error: {0}")]
    Internal(String),

    /// Inventory error, forwarded unchanged
    #[error("Inventory error: {0}")]
    Backend(#[from] Status),

    /// gRPC transport error while connecting to the inventory
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HandlerError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// gRPC code this error is reported with.
    pub fn code(&self) -> Code {
        match self {
            HandlerError::InvalidArgument(_) | HandlerError::Conversion(_) => Code::InvalidArgument,
            HandlerError::NotImplemented(_) => Code::Unimplemented,
            HandlerError::Backend(status) => status.code(),
            HandlerError::Transport(_) => Code::Unavailable,
            HandlerError::Internal(_) | HandlerError::Config(_) => Code::Internal,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code() == Code::InvalidArgument
    }
}

impl From<std::num::TryFromIntError> for HandlerError {
    fn from(err: std::num::TryFromIntError) -> Self {
        HandlerError::Conversion(err.to_string())
    }
}

impl From<HandlerError> for Status {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::Backend(status) => status,
            other => Status::new(other.code(), other.to_string()),
        }
    }
}

fn http_status(code: Code) -> StatusCode {
    match code {
        Code::InvalidArgument | Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::FailedPrecondition => StatusCode::PRECONDITION_FAILED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error reply of the OpenAPI HTTP surface that dispatches jobs into the handlers.
impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = http_status(self.code());

        let error_message = if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            // 不向客户端暴露内部错误详情
            tracing::error!("Internal error: {:?}", self);
            "Internal server error".to_string()
        } else {
            match &self {
                HandlerError::Backend(s) => s.message().to_string(),
                other => other.to_string(),
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Handler result type alias
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_status_passes_through_unchanged() {
        let status = Status::not_found("telemetryprofile-1234 not found");
        let err = HandlerError::from(status);
        assert_eq!(err.code(), Code::NotFound);

        let back: Status = err.into();
        assert_eq!(back.code(), Code::NotFound);
        assert_eq!(back.message(), "telemetryprofile-1234 not found");
    }

    #[test]
    fn test_conversion_is_invalid_argument() {
        let err: HandlerError = u32::try_from(-1_i32).unwrap_err().into();
        assert!(matches!(err, HandlerError::Conversion(_)));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_http_mapping() {
        let cases = [
            (HandlerError::invalid_argument("x"), StatusCode::BAD_REQUEST),
            (HandlerError::not_implemented("x"), StatusCode::NOT_IMPLEMENTED),
            (HandlerError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                HandlerError::Backend(Status::already_exists("dup")),
                StatusCode::CONFLICT,
            ),
            (
                HandlerError::Backend(Status::unavailable("down")),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}

//! Mapping from engine errors to HTTP responses.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use igaming::{
    ErrorKind, ledger::LedgerError, settlement::SettlementError, tournament::TournamentError,
    wager::WagerError,
};
use serde::Serialize;

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
    pub retryable: bool,
}

/// Handler error carrying a classified kind and a client-safe message
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.kind)
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::TournamentNotOpen
        | ErrorKind::AlreadySettled
        | ErrorKind::NoEligibleParticipants
        | ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::ConcurrencyConflict => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = self.kind.is_retryable();
        let body = ErrorResponse {
            error: self.message,
            kind: self.kind,
            retryable,
        };

        let mut response = (status, Json(body)).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

macro_rules! impl_from_engine_error {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<$error> for ApiError {
                fn from(err: $error) -> Self {
                    let kind = err.kind();
                    if kind == ErrorKind::Internal {
                        tracing::error!(error = %err, "Internal error");
                    }
                    ApiError::new(kind, err.client_message())
                }
            }
        )+
    };
}

impl_from_engine_error!(LedgerError, TournamentError, WagerError, SettlementError);

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorKind::InsufficientFunds),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        for kind in [
            ErrorKind::TournamentNotOpen,
            ErrorKind::AlreadySettled,
            ErrorKind::NoEligibleParticipants,
            ErrorKind::Conflict,
        ] {
            assert_eq!(status_for(kind), StatusCode::CONFLICT);
        }
        assert_eq!(
            status_for(ErrorKind::ConcurrencyConflict),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(ErrorKind::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_errors_are_sanitized() {
        let err = ApiError::from(LedgerError::Database(sqlx::Error::Protocol(
            "password authentication failed".into(),
        )));
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, "Internal server error");
    }

    #[tokio::test]
    async fn test_conflict_response_is_retryable() {
        let response =
            ApiError::new(ErrorKind::ConcurrencyConflict, "Concurrent update conflict, please retry")
                .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers()[header::RETRY_AFTER], "1");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "concurrency_conflict");
        assert_eq!(json["retryable"], true);
    }
}

//! Request extractors that reject with the API error body.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use igaming::ErrorKind;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON body extractor
///
/// Same as [`axum::Json`], but a missing content type, malformed JSON or a body
/// of the wrong shape is a `400` with the usual `{"error","kind","retryable"}` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::new(ErrorKind::Validation, rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Stake {
        amount: u32,
    }

    fn app() -> Router {
        Router::new().route(
            "/stake",
            post(|ApiJson(stake): ApiJson<Stake>| async move { stake.amount.to_string() }),
        )
    }

    async fn post_body(content_type: Option<&str>, body: &'static str) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method("POST").uri("/stake");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let response = app()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let (status, body) = post_body(Some("application/json"), r#"{"amount": 7}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"7");
    }

    #[tokio::test]
    async fn test_rejections_use_error_body() {
        for (content_type, body) in [
            (Some("application/json"), "{not json"),
            (Some("application/json"), r#"{"amount": "seven"}"#),
            (None, r#"{"amount": 7}"#),
        ] {
            let (status, body) = post_body(content_type, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);

            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["kind"], "validation");
            assert_eq!(json["retryable"], false);
            assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
        }
    }
}

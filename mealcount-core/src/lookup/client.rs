//! HTTP client for the remote calorie lookup service.

use std::future::Future;
use std::time::Duration;

use super::error::{ErrorBody, LookupError};
use crate::models::{CalorieRequest, CalorieResponse};

/// Path of the lookup endpoint, relative to the API base URL.
pub const CALORIES_ENDPOINT: &str = "/get-calories";

/// Converts a dish name and serving count into calorie figures.
pub trait CalorieLookup {
    fn lookup(
        &self,
        request: &CalorieRequest,
    ) -> impl Future<Output = Result<CalorieResponse, LookupError>> + Send;
}

/// Lookup service reached over HTTP.
///
/// Sends `POST {base_url}/get-calories` with a JSON body and forwards the
/// bearer token, if any, without inspecting it.
#[derive(Clone, Debug)]
pub struct HttpCalorieLookup {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpCalorieLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Rebuilds the HTTP client with a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LookupError> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(self)
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CALORIES_ENDPOINT)
    }
}

impl CalorieLookup for HttpCalorieLookup {
    async fn lookup(&self, request: &CalorieRequest) -> Result<CalorieResponse, LookupError> {
        if self.base_url.trim().is_empty() {
            return Err(LookupError::NotConfigured);
        }

        let url = self.endpoint();
        tracing::debug!(%url, dish = %request.dish_name, servings = request.servings, "looking up calories");

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let err = LookupError::from_status(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "calorie lookup failed");
            return Err(err);
        }

        response
            .json::<CalorieResponse>()
            .await
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn calories(headers: HeaderMap, Json(req): Json<CalorieRequest>) -> impl IntoResponse {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer secret-token");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no token"})));
        }

        let cps = 280.0;
        (
            StatusCode::OK,
            Json(json!({
                "dish_name": req.dish_name,
                "servings": req.servings,
                "calories_per_serving": cps,
                "total_calories": cps * req.servings,
                "source": "test-server"
            })),
        )
    }

    fn fixed_status(status: StatusCode, body: serde_json::Value) -> Router {
        Router::new().route(
            CALORIES_ENDPOINT,
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        )
    }

    #[tokio::test]
    async fn test_lookup_success_forwards_token() {
        let base = serve(Router::new().route(CALORIES_ENDPOINT, post(calories))).await;
        let lookup = HttpCalorieLookup::new(format!("{}/", base)).with_token("secret-token");

        let request = CalorieRequest::new("Salmon Fillet", 1.5).unwrap();
        let response = lookup.lookup(&request).await.unwrap();

        assert_eq!(response.dish_name, "Salmon Fillet");
        assert_eq!(response.calories_per_serving, 280.0);
        assert_eq!(response.total_calories, 420.0);
        assert_eq!(response.source, "test-server");
    }

    #[tokio::test]
    async fn test_lookup_without_token_is_unauthorized() {
        let base = serve(Router::new().route(CALORIES_ENDPOINT, post(calories))).await;
        let lookup = HttpCalorieLookup::new(base);

        let request = CalorieRequest::new("Salmon Fillet", 1.0).unwrap();
        let err = lookup.lookup(&request).await.unwrap_err();
        assert_eq!(err, LookupError::Unauthorized);
    }

    #[tokio::test]
    async fn test_lookup_maps_error_statuses() {
        let cases = [
            (StatusCode::NOT_FOUND, json!({}), LookupError::DishNotFound),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"message": "boom"}),
                LookupError::DishNotFound,
            ),
            (StatusCode::TOO_MANY_REQUESTS, json!({}), LookupError::RateLimited),
            (
                StatusCode::BAD_REQUEST,
                json!({"message": "servings must be positive"}),
                LookupError::InvalidInput("Servings must be at least 0.1.".to_string()),
            ),
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({"message": "maintenance"}),
                LookupError::Server {
                    status: 503,
                    message: "maintenance".to_string(),
                },
            ),
        ];

        for (status, body, expected) in cases {
            let base = serve(fixed_status(status, body)).await;
            let lookup = HttpCalorieLookup::new(base);
            let request = CalorieRequest::new("Mystery Stew", 1.0).unwrap();

            let err = lookup.lookup(&request).await.unwrap_err();
            assert_eq!(err, expected, "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_lookup_rejects_malformed_success_body() {
        let base = serve(fixed_status(StatusCode::OK, json!({"calories": 12}))).await;
        let lookup = HttpCalorieLookup::new(base);
        let request = CalorieRequest::new("Toast", 1.0).unwrap();

        let err = lookup.lookup(&request).await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_lookup_requires_base_url() {
        let lookup = HttpCalorieLookup::new("");
        let request = CalorieRequest::new("Toast", 1.0).unwrap();

        let err = lookup.lookup(&request).await.unwrap_err();
        assert_eq!(err, LookupError::NotConfigured);
    }

    #[tokio::test]
    async fn test_lookup_unreachable_is_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let lookup = HttpCalorieLookup::new(format!("http://{}", addr))
            .with_timeout(Duration::from_secs(5))
            .unwrap();
        let request = CalorieRequest::new("Toast", 1.0).unwrap();

        let err = lookup.lookup(&request).await.unwrap_err();
        assert!(matches!(err, LookupError::Network(_)));
    }
}

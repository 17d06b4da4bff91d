//! Lookup error types.

use serde::Deserialize;

/// Errors that can occur while asking the lookup service for calories.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// No API base URL configured
    NotConfigured,
    /// The service does not know the dish
    DishNotFound,
    /// The service rejected the request body
    InvalidInput(String),
    /// Missing or rejected bearer token
    Unauthorized,
    /// Token valid but not allowed to call the endpoint
    Forbidden,
    /// Too many requests
    RateLimited,
    /// Any other non-success status
    Server { status: u16, message: String },
    /// Request never produced a response
    Network(String),
    /// Success status with a body that is not a calorie response
    InvalidResponse(String),
}

impl LookupError {
    /// Maps a non-success HTTP status and its (possibly empty) error body to
    /// a lookup error.
    pub fn from_status(status: u16, body: &ErrorBody) -> Self {
        match status {
            404 | 500 => LookupError::DishNotFound,
            400 => LookupError::InvalidInput(body.bad_request_message()),
            401 => LookupError::Unauthorized,
            403 => LookupError::Forbidden,
            422 => LookupError::InvalidInput(body.validation_message()),
            429 => LookupError::RateLimited,
            _ => LookupError::Server {
                status,
                message: body
                    .text()
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            },
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotConfigured => {
                write!(f, "API base URL is not configured. Set api_base_url in config.")
            }
            LookupError::DishNotFound => write!(
                f,
                "Dish not found. Please try a different dish name or check the spelling."
            ),
            LookupError::InvalidInput(message) => write!(f, "{}", message),
            LookupError::Unauthorized => write!(f, "Authentication failed. Please log in again."),
            LookupError::Forbidden => write!(
                f,
                "Access denied. You don't have permission to perform this action."
            ),
            LookupError::RateLimited => {
                write!(f, "Too many requests. Please wait a moment and try again.")
            }
            LookupError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            LookupError::Network(e) => write!(f, "Network error: {}", e),
            LookupError::InvalidResponse(e) => write!(f, "Invalid response from server: {}", e),
        }
    }
}

impl std::error::Error for LookupError {}

/// Error payload the service may attach to a failed response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    fn text(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }

    fn bad_request_message(&self) -> String {
        let message = self.message.as_deref().unwrap_or_default();
        if message.contains("servings") {
            return "Servings must be at least 0.1.".to_string();
        }
        if message.contains("dish_name") {
            return "Please enter a valid dish name.".to_string();
        }
        self.text()
            .unwrap_or_else(|| "Invalid input. Please check your data.".to_string())
    }

    /// First field error from an `errors` map, else the message.
    fn validation_message(&self) -> String {
        let first = self
            .errors
            .as_ref()
            .and_then(|errors| errors.as_object())
            .and_then(|fields| fields.values().next())
            .and_then(|value| match value {
                serde_json::Value::Array(items) => items.first().and_then(|v| v.as_str()),
                serde_json::Value::String(s) => Some(s.as_str()),
                _ => None,
            });

        match first {
            Some(message) => message.to_string(),
            None => self
                .message
                .clone()
                .unwrap_or_else(|| "Validation failed. Please check your input.".to_string()),
        }
    }
}

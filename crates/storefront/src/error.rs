//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error body is JSON: `{"error": "..."}`, plus a `details` array of
//! `{field, message}` objects when product input fails validation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::{CatalogError, StorageError};
use crate::services::OrderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Session store could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Catalog(CatalogError::Storage(err))
    }
}

impl AppError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::Validation(_))
            | Self::Order(OrderError::EmptyCart)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Order(OrderError::InProgress) => StatusCode::CONFLICT,
            Self::Order(OrderError::Submission(_)) => StatusCode::BAD_GATEWAY,
            Self::Catalog(CatalogError::Storage(_)) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Catalog(CatalogError::Storage(_))
                | Self::Order(OrderError::Submission(_))
                | Self::Session(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Catalog(CatalogError::Validation(err)) => json!({
                "error": "Invalid product data",
                "details": err.errors,
            }),
            Self::Catalog(CatalogError::NotFound(_)) => json!({ "error": "Product not found" }),
            Self::Order(OrderError::EmptyCart) => json!({ "error": "Cart is empty" }),
            Self::Order(OrderError::InProgress) => {
                json!({ "error": "An order for this cart is already being submitted" })
            }
            Self::Order(OrderError::Submission(_)) => {
                json!({ "error": "Could not submit order, please try again" })
            }
            Self::BadRequest(msg) => json!({ "error": msg }),
            Self::Catalog(CatalogError::Storage(_)) | Self::Session(_) => {
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::NotifyError;
    use dendy_food_core::{ProductId, ProductInput};

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Order(OrderError::EmptyCart);
        assert_eq!(err.to_string(), "Order error: cart is empty");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        let invalid = ProductInput::default().validate().unwrap_err();
        assert_eq!(
            get_status(AppError::Catalog(invalid.into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Catalog(CatalogError::NotFound(ProductId::new("x")))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::InProgress)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::Submission(NotifyError::Timeout))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(StorageError::Corrupt(serde_json::from_str::<u8>("x").unwrap_err()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let invalid = ProductInput::default().validate().unwrap_err();
        let (status, body) = body_json(AppError::Catalog(invalid.into())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid product data");
        let first = &body["details"][0];
        assert_eq!(first["field"], "nameUz");
        assert_eq!(first["message"], "is required");
    }

    #[tokio::test]
    async fn test_storage_error_hides_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "/srv/data/db.json");
        let (status, body) = body_json(StorageError::Io(io).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}

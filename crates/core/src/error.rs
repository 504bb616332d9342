//! Error types for Hookwatch.
//!
//! This module defines the `WebhookError` enum which represents every
//! rejection the intake pipeline can produce.

use thiserror::Error;

/// The main error type for webhook intake operations.
///
/// Every failure is terminal for the request it belongs to; callers map
/// each variant to a distinct HTTP response. No variant ever carries the
/// shared secret or a signature value in its message.
#[derive(Debug, Error)]
pub enum WebhookError {
    // ==================== Lookup Errors ====================
    /// No webhook source is registered for the slug.
    #[error("Webhook source not found: {slug}")]
    SourceNotFound { slug: String },

    /// The source exists but has been disabled by an operator.
    #[error("Webhook source is disabled")]
    SourceDisabled { slug: String },

    // ==================== Payload Errors ====================
    /// The request body is empty.
    #[error("Missing payload")]
    MissingPayload,

    /// The request body is not valid JSON.
    #[error("Invalid payload: {message}")]
    InvalidPayloadEncoding { message: String },

    // ==================== Authentication Errors ====================
    /// No verification scheme is defined for the provider slug.
    #[error("Unsupported provider: {slug}")]
    UnsupportedProvider { slug: String },

    /// The provider's signature header was not present on the request.
    #[error("Missing signature header: {header}")]
    MissingSignatureHeader { header: String },

    /// The claimed signature does not authenticate the payload.
    #[error("Signature validation failed")]
    SignatureMismatch,

    // ==================== Availability Errors ====================
    /// The durable store rejected or failed the operation.
    #[error("Storage error: {message}")]
    StorageFailure { message: String },
}

impl WebhookError {
    /// Creates a new unsupported-provider error.
    pub fn unsupported(slug: impl Into<String>) -> Self {
        Self::UnsupportedProvider { slug: slug.into() }
    }

    /// Creates a new invalid-payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayloadEncoding {
            message: message.into(),
        }
    }

    /// Creates a new storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageFailure {
            message: message.into(),
        }
    }

    /// Returns true if this is an authentication failure (vs a request
    /// validity or availability failure).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::UnsupportedProvider { .. } | Self::SignatureMismatch)
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedProvider { .. } | Self::SignatureMismatch => 401,
            Self::SourceDisabled { .. } => 403,
            Self::SourceNotFound { .. } => 404,
            Self::MissingPayload | Self::MissingSignatureHeader { .. } => 400,
            Self::InvalidPayloadEncoding { .. } => 422,
            Self::StorageFailure { .. } => 503,
        }
    }
}

/// A Result type alias using WebhookError.
pub type WebhookResult<T> = Result<T, WebhookError>;

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayloadEncoding {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WebhookError::SignatureMismatch;
        assert_eq!(err.to_string(), "Signature validation failed");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(WebhookError::SignatureMismatch.status_code(), 401);
        assert_eq!(WebhookError::unsupported("shopify").status_code(), 401);
        assert_eq!(
            WebhookError::SourceDisabled {
                slug: "github".into()
            }
            .status_code(),
            403
        );
        assert_eq!(
            WebhookError::SourceNotFound {
                slug: "nope".into()
            }
            .status_code(),
            404
        );
        assert_eq!(WebhookError::MissingPayload.status_code(), 400);
        assert_eq!(WebhookError::invalid_payload("bad").status_code(), 422);
        assert_eq!(WebhookError::storage("down").status_code(), 503);
    }

    #[test]
    fn test_auth_error_class() {
        assert!(WebhookError::SignatureMismatch.is_auth_error());
        assert!(WebhookError::unsupported("shopify").is_auth_error());
        assert!(!WebhookError::MissingPayload.is_auth_error());
        assert!(
            !WebhookError::MissingSignatureHeader {
                header: "X-Signature".into()
            }
            .is_auth_error()
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WebhookError = err.into();
        assert!(matches!(err, WebhookError::InvalidPayloadEncoding { .. }));
    }
}

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod events;
pub mod image;

// Re-export image types
pub use image::{ImageId, ImageOrder, ImageRecord, ListImagesResponse, ReorderRequest};

// Re-export auth types
pub use auth::{
    ErrorBody, FormErrors, LoginForm, LoginRequest, LoginResponse, RegisterForm, RegisterRequest,
    UserData,
};

// Re-export UI event payloads
pub use events::DragResult;

pub type Result<T> = std::result::Result<T, GalleryError>;

/// Structured error types for gallery operations.
///
/// Serializable so they can be handed to a frontend unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum GalleryError {
    #[error("Image not found: {id}")]
    NotFound { id: String },

    #[error("Index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid operation: {message}")]
    InvalidOperation { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GalleryError {
    /// HTTP status code, if the gateway answered with a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            GalleryError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a form's common-error slot
    pub fn message(&self) -> String {
        match self {
            GalleryError::Http { message, .. }
            | GalleryError::Network { message }
            | GalleryError::Decode { message }
            | GalleryError::Storage { message }
            | GalleryError::Internal { message }
            | GalleryError::InvalidOperation { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(e: serde_json::Error) -> Self {
        GalleryError::Decode {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_http_errors() {
        let http = GalleryError::Http {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(http.status(), Some(401));
        assert_eq!(http.message(), "Invalid credentials");

        let network = GalleryError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(network.status(), None);
    }

    #[test]
    fn test_error_serializes_with_variant_tag() {
        let err = GalleryError::IndexOutOfBounds { index: 4, len: 3 };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["IndexOutOfBounds"]["index"], 4);
        assert_eq!(
            err.to_string(),
            "Index 4 out of bounds for collection of length 3"
        );
    }
}

// =============================================================================
// CreUp API - Error Types
// =============================================================================
// Table of Contents:
// 1. API Error
// 2. User-facing Messages
// =============================================================================

use thiserror::Error;

/// Generic message rendered by list and detail views when a fetch fails.
pub const LOAD_ERROR_MESSAGE: &str = "Une erreur est survenue lors du chargement des données";

/// Message rendered by forms when a submission fails.
pub const SUBMIT_ERROR_MESSAGE: &str = "Une erreur est survenue lors de l'envoi du formulaire";

/// Message rendered by the login form when credentials are rejected.
pub const LOGIN_ERROR_MESSAGE: &str = "Email ou mot de passe incorrect";

// -----------------------------------------------------------------------------
// 1. API Error
// -----------------------------------------------------------------------------

/// Errors surfaced by the client layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// A response was received with a non-2xx status.
    #[error("Server error: {status} - {message}")]
    Http { status: u16, message: String },

    /// The server rejected the session while on a protected page.
    /// Credentials have been wiped and the login route requested.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// The request was aborted through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Build an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status carried by this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    // -------------------------------------------------------------------------
    // 2. User-facing Messages
    // -------------------------------------------------------------------------

    /// Localized message for views. Network and server failures are not
    /// distinguished.
    pub fn user_message(&self) -> &'static str {
        LOAD_ERROR_MESSAGE
    }

    /// Localized message for contact, appointment and back-office forms.
    pub fn submit_message(&self) -> &'static str {
        SUBMIT_ERROR_MESSAGE
    }

    /// Localized message for the login form.
    pub fn login_message(&self) -> &'static str {
        match self {
            ApiError::Http { status: 400 | 401 | 403, .. } => LOGIN_ERROR_MESSAGE,
            _ => LOAD_ERROR_MESSAGE,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialize(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

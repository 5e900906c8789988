//! Result and error types for the core library

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failing field from deposit input validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Core library error type
///
/// Login failures are deliberately undifferentiated: an unknown email and a
/// wrong password both surface as `InvalidCredentials` so the caller cannot
/// tell which part was wrong. `WrongPassword` exists only on the
/// password-change path, where the user is already authenticated.
#[derive(Error, Debug)]
pub enum Error {
    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input")]
    InvalidInput(Vec<FieldError>),

    #[error("Card rejected: {0}")]
    CardRejected(String),

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Session required")]
    NotAuthenticated,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// The field-level messages, if this is a validation error
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::InvalidInput(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result for the view layer
///
/// Every store operation is recovered into this shape at the boundary; the
/// rendering layer owns turning it into user-visible text. `fields` carries
/// the per-field messages for deposit validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub fields: Option<Vec<FieldError>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            fields: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            fields: None,
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(Error::InvalidInput(fields)) => Self {
                success: false,
                data: None,
                error: Some("Invalid input".to_string()),
                fields: Some(fields),
            },
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use cdn_provisioner_client::ClientError;

use crate::types::AttrError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Declared configuration is unusable (missing required attribute, wrong type, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The vendor rejected a submitted change
    #[error("Change denied: {message}")]
    Denied { message: String },

    /// The status endpoint returned a value outside the known contract
    #[error("Unknown propagation status '{status}' while waiting for change completion")]
    UnknownStatus { status: String },

    /// An error with the lifecycle operation it happened in
    #[error("{operation} failed: {source}")]
    Operation {
        operation: String,
        source: Box<CoreError>,
    },

    /// Remote client error (converting from library)
    #[error("{0}")]
    Client(#[from] ClientError),
}

impl CoreError {
    /// Wrap this error with the name of the lifecycle operation, e.g. `"Domain Create"`.
    #[must_use]
    pub fn in_operation(self, operation: impl Into<String>) -> Self {
        Self::Operation {
            operation: operation.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, seen through any operation wrappers.
    pub fn root(&self) -> &Self {
        match self {
            Self::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// The remote client error at the root, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self.root() {
            Self::Client(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the root cause is a missing remote object.
    pub fn is_not_found(&self) -> bool {
        self.client_error().is_some_and(ClientError::is_not_found)
    }

    /// Whether it is expected behavior (bad input, missing object, vendor denial); used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self.root() {
            Self::Validation(_) | Self::Denied { .. } => true,
            Self::Client(e) => e.is_expected(),
            _ => false,
        }
    }
}

impl From<AttrError> for CoreError {
    fn from(e: AttrError) -> Self {
        Self::Validation(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Attach an operation name to the error of a `Result`.
pub trait OperationContext<T> {
    fn in_operation(self, operation: &str) -> CoreResult<T>;
}

impl<T, E: Into<CoreError>> OperationContext<T> for Result<T, E> {
    fn in_operation(self, operation: &str) -> CoreResult<T> {
        self.map_err(|e| Into::<CoreError>::into(e).in_operation(operation))
    }
}

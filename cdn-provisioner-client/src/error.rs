use serde::{Deserialize, Serialize};

/// Unified error type for all remote object operations.
///
/// Every variant names the vendor API (`api`) that produced it. Variants are
/// serializable so the calling engine can surface them as structured
/// diagnostics.
///
/// # Classes
///
/// - [`NotFound`](Self::NotFound) is the only recoverable class; callers use
///   it to branch between create and update.
/// - [`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout) and
///   [`RateLimited`](Self::RateLimited) are transport failures. The HTTP layer
///   retries them with exponential backoff before giving up.
/// - Everything else is fatal and surfaced verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ClientError {
    /// A network-level error occurred (DNS resolution failure, connection refused, HTTP 502-504).
    NetworkError {
        /// API that produced the error.
        api: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// API that produced the error.
        api: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// API that produced the error.
        api: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The requested remote object does not exist (HTTP 404).
    NotFound {
        /// API that produced the error.
        api: String,
        /// Lookup key of the missing object.
        key: String,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The vendor rejected the request payload (HTTP 400, 409, 422).
    Validation {
        /// API that produced the error.
        api: String,
        /// HTTP status code.
        status: u16,
        /// Original response body.
        raw_body: String,
    },

    /// The request signature or credentials were rejected (HTTP 401).
    InvalidCredentials {
        /// API that produced the error.
        api: String,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The authenticated client lacks permission for the operation (HTTP 403).
    PermissionDenied {
        /// API that produced the error.
        api: String,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the vendor's response.
    ParseError {
        /// API that produced the error.
        api: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// API that produced the error.
        api: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// Any other non-success HTTP response.
    ///
    /// The status and body are kept intact so callers can apply narrowly
    /// scoped tolerance rules (for example a 405 on delete).
    Api {
        /// API that produced the error.
        api: String,
        /// HTTP status code.
        status: u16,
        /// Original response body.
        raw_body: String,
    },
}

impl ClientError {
    /// Whether the remote object simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the error is a transport failure rather than a vendor verdict.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Whether the error reflects caller input or remote state rather than a fault; used for log levels.
    ///
    /// `true` logs at `warn`, `false` at `error`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Validation { .. }
                | Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// HTTP status code carried by the error, when the vendor answered.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::InvalidCredentials { .. } => Some(401),
            Self::PermissionDenied { .. } => Some(403),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Raw response body carried by the error, when the vendor answered.
    #[must_use]
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::Validation { raw_body, .. } | Self::Api { raw_body, .. } => Some(raw_body),
            Self::NotFound { raw_message, .. }
            | Self::InvalidCredentials { raw_message, .. }
            | Self::PermissionDenied { raw_message, .. }
            | Self::RateLimited { raw_message, .. } => raw_message.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { api, detail } => {
                write!(f, "[{api}] Network error: {detail}")
            }
            Self::Timeout { api, detail } => {
                write!(f, "[{api}] Request timeout: {detail}")
            }
            Self::RateLimited {
                api, retry_after, ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{api}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{api}] Rate limited")
                }
            }
            Self::NotFound { api, key, .. } => {
                write!(f, "[{api}] '{key}' not found")
            }
            Self::Validation {
                api,
                status,
                raw_body,
            } => {
                write!(f, "[{api}] Validation error (HTTP {status}): {raw_body}")
            }
            Self::InvalidCredentials { api, raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{api}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{api}] Invalid credentials")
                }
            }
            Self::PermissionDenied { api, raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{api}] Permission denied: {msg}")
                } else {
                    write!(f, "[{api}] Permission denied")
                }
            }
            Self::ParseError { api, detail } => {
                write!(f, "[{api}] Parse error: {detail}")
            }
            Self::SerializationError { api, detail } => {
                write!(f, "[{api}] Serialization error: {detail}")
            }
            Self::Api {
                api,
                status,
                raw_body,
            } => {
                write!(f, "[{api}] HTTP {status}: {raw_body}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

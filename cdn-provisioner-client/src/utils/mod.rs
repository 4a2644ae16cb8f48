//! Utility modules.

/// Timestamp serialization helpers for vendor objects.
pub mod datetime;

/// Log sanitization utilities to keep secrets and large bodies out of logs.
pub mod log_sanitizer;

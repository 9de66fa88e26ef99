//! Page address and user notification capabilities
//!
//! The codec never touches `window.location` directly. The browser binding
//! lives in `api::browser`; tests supply in-memory implementations.

use thiserror::Error;

/// Failures reported by an address implementation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    /// The current address could not be parsed as a URL
    #[error("Invalid page address: {0}")]
    InvalidAddress(String),

    /// The history API refused the replacement
    #[error("Failed to replace page address: {0}")]
    ReplaceFailed(String),
}

/// Read and rewrite the page address
pub trait Location {
    /// Decoded value of a query parameter on the current address
    fn query_param(&self, name: &str) -> Option<String>;

    /// Copy of the current address with `name` set to `value`
    ///
    /// Must not change the page itself.
    fn with_query_param(&self, name: &str, value: &str) -> Result<String, LocationError>;

    /// Swap the current address in place, without adding a history entry
    fn replace_url(&self, url: &str) -> Result<(), LocationError>;
}

/// Blocking, user-visible notification (`alert` in the browser)
pub trait Notifier {
    fn notify(&self, message: &str);
}

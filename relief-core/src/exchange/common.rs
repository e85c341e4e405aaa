//! Failure classification shared by the auth and prediction exchanges.

use crate::api::TransportError;

/// How a transport failure is reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureClass {
    /// The collaborator could not be reached at all.
    Unreachable,
    /// Anything else, carrying the message to show.
    Other(String),
}

/// Whether `message` is one of the recognised no-connectivity signatures.
///
/// # Examples
///
/// ```
/// use relief_core::exchange::common::is_network_failure;
///
/// assert!(is_network_failure("Failed to fetch"));
/// assert!(is_network_failure("NetworkError when attempting to fetch resource."));
/// assert!(is_network_failure("Load failed"));
/// assert!(!is_network_failure("Failed to fetch data"));
/// ```
pub fn is_network_failure(message: &str) -> bool {
    message == "Failed to fetch" || message.contains("NetworkError") || message.contains("Load failed")
}

/// Classifies a failure that produced no response.
///
/// Failures the transport flagged as connection failures are unreachable
/// regardless of their text. `fallback` replaces an empty message.
pub fn classify_failure(
    failure: &TransportError,
    fallback: &str,
) -> FailureClass {
    if failure.connect || is_network_failure(&failure.message) {
        FailureClass::Unreachable
    } else if failure.message.is_empty() {
        FailureClass::Other(fallback.to_string())
    } else {
        FailureClass::Other(failure.message.clone())
    }
}

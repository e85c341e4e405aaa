//! Request normalization and response classification for both backends.

pub mod auth;
pub mod common;
pub mod prediction;

#[cfg(test)]
pub(crate) mod stub;

pub use auth::{AuthError, AuthOutcome, authenticate, validate_credentials};
pub use common::{FailureClass, classify_failure, is_network_failure};
pub use prediction::{PredictionError, build_request, classify_prediction_response, estimate};

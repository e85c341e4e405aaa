//! Credential exchange with the auth backend.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::common::{FailureClass, classify_failure};
use crate::api::{ApiConfig, RawResponse, Transport};
use crate::models::{AuthMode, AuthRequest, Credentials, MIN_PASSWORD_LEN, Session};

const UNKNOWN_FALLBACK: &str =
    "Unable to reach the server. Please check your connection and try again.";

/// Why an authentication attempt did not produce a [`Session`].
///
/// `Display` is the text shown next to the credential form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter username and password.")]
    MissingFields,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password should be at least {} characters.", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("{}", .0.rejection_message())]
    Rejected(AuthMode),

    #[error(
        "Could not reach the auth server. ({endpoint} → {base_url}) If the backend is up, this is \
         usually CORS or an origin allow-list: the auth server must accept requests from this client."
    )]
    Unreachable {
        mode: AuthMode,
        endpoint: &'static str,
        base_url: String,
    },

    #[error("{0}")]
    Unknown(String),
}

impl AuthMode {
    fn rejection_message(&self) -> &'static str {
        match self {
            Self::SignUp => "Username may already be taken or signup failed. Please try again.",
            Self::SignIn => "Invalid username or password.",
        }
    }
}

/// The auth backend's answer, decoded from the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Accepted,
    Refused,
}

impl AuthOutcome {
    /// Accepted iff the body is JSON `true`, or the body is not JSON at all,
    /// the status is 2xx and the trimmed text is `true`.
    pub fn from_response(response: &RawResponse) -> Self {
        let accepted = match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => value == Value::Bool(true),
            Err(_) => response.is_success() && response.body.trim() == "true",
        };
        if accepted { Self::Accepted } else { Self::Refused }
    }
}

/// Local checks run before anything is sent.
///
/// Order: missing fields, then (sign-up only) mismatch, then length.
pub fn validate_credentials(
    mode: AuthMode,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    if credentials.trimmed_username().is_empty() || credentials.password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if mode == AuthMode::SignUp {
        if credentials.password != credentials.repeat_password {
            return Err(AuthError::PasswordMismatch);
        }
        if credentials.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }
    }
    Ok(())
}

/// Signs in or signs up with the auth backend.
///
/// Validates locally, posts `{username, password}` to the endpoint for
/// `mode` and decodes the answer. No retry is attempted.
///
/// # Errors
/// * [`AuthError::MissingFields`], [`AuthError::PasswordMismatch`],
///   [`AuthError::PasswordTooShort`]: local checks failed, nothing sent.
/// * [`AuthError::Rejected`]: the backend answered with anything but `true`.
/// * [`AuthError::Unreachable`] / [`AuthError::Unknown`]: no response.
pub async fn authenticate<T: Transport + ?Sized>(
    transport: &T,
    config: &ApiConfig,
    mode: AuthMode,
    credentials: &Credentials,
) -> Result<Session, AuthError> {
    validate_credentials(mode, credentials)?;

    let username = credentials.trimmed_username();
    let url = config.auth_url(mode);
    let body = serde_json::to_value(AuthRequest {
        username,
        password: &credentials.password,
    })
    .map_err(|e| AuthError::Unknown(e.to_string()))?;

    debug!(transport = transport.name(), url = %url, ?mode, "posting credentials");
    let response = match transport.post_json(&url, &body).await {
        Ok(response) => response,
        Err(failure) => {
            warn!(url = %url, error = %failure, "auth request failed");
            return Err(match classify_failure(&failure, UNKNOWN_FALLBACK) {
                FailureClass::Unreachable => AuthError::Unreachable {
                    mode,
                    endpoint: mode.endpoint(),
                    base_url: config.auth_base.clone(),
                },
                FailureClass::Other(message) => AuthError::Unknown(message),
            });
        }
    };

    match AuthOutcome::from_response(&response) {
        AuthOutcome::Accepted => {
            info!(username, ?mode, "authenticated");
            Ok(Session {
                username: username.to_string(),
            })
        }
        AuthOutcome::Refused => {
            warn!(username, ?mode, status = response.status, "auth backend refused credentials");
            Err(AuthError::Rejected(mode))
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum password length accepted when creating an account, counted in
/// UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Which auth endpoint a credential submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    /// Path segment of the auth endpoint for this mode.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::SignIn => "validatelogin",
            Self::SignUp => "makenewuser",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SignIn => "Existing user",
            Self::SignUp => "New user",
        }
    }
}

/// Credential-entry state for the session gate.
///
/// `repeat_password` is only consulted in [`AuthMode::SignUp`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub repeat_password: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            repeat_password: String::new(),
        }
    }

    pub fn with_repeat_password(
        mut self,
        repeat_password: impl Into<String>,
    ) -> Self {
        self.repeat_password = repeat_password.into();
        self
    }

    /// Username as sent to the backend: surrounding whitespace removed.
    pub fn trimmed_username(&self) -> &str {
        self.username.trim()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("repeat_password", &"<redacted>")
            .finish()
    }
}

/// An authenticated user. Exists only in memory for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
}

/// JSON body posted to both auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn endpoints_match_mode() {
        assert_eq!(AuthMode::SignIn.endpoint(), "validatelogin");
        assert_eq!(AuthMode::SignUp.endpoint(), "makenewuser");
    }

    #[test]
    fn default_mode_is_sign_in() {
        assert_eq!(AuthMode::default(), AuthMode::SignIn);
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let creds = Credentials::new("alice", "hunter22").with_repeat_password("hunter22");
        let rendered = format!("{creds:?}");

        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter22"), "leaked: {rendered}");
    }

    #[test]
    fn auth_request_serializes_username_and_password_only() {
        let body = serde_json::to_value(AuthRequest {
            username: "alice",
            password: "secret1",
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({"username": "alice", "password": "secret1"})
        );
    }
}

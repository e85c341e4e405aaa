use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AuthMode;

/// Production auth backend used under [`BaseUrlPolicy::ProductionDefault`].
pub const DEFAULT_AUTH_BASE_URL: &str = "https://floodreliefbackend-production.up.railway.app";
/// Production prediction backend used under [`BaseUrlPolicy::ProductionDefault`].
pub const DEFAULT_PREDICTION_BASE_URL: &str =
    "https://floodreliefprediction-production.up.railway.app";

/// Environment override for the auth base URL.
pub const AUTH_URL_ENV: &str = "RELIEF_AUTH_API_URL";
/// Environment override for the prediction base URL.
pub const PREDICTION_URL_ENV: &str = "RELIEF_PREDICTION_API_URL";

/// What to do when a base URL is not configured.
///
/// | policy               | unset / empty value                      |
/// |----------------------|------------------------------------------|
/// | `ProductionDefault`  | falls back to the production URL         |
/// | `RequireExplicit`    | [`ConfigError::MissingBaseUrl`]          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseUrlPolicy {
    #[default]
    ProductionDefault,
    RequireExplicit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{service} base URL is not configured; set {setting} (e.g. {example} for local development)")]
    MissingBaseUrl {
        service: &'static str,
        setting: &'static str,
        example: &'static str,
    },
}

/// Base URLs of both collaborators, without trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub auth_base: String,
    pub prediction_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_base: DEFAULT_AUTH_BASE_URL.to_string(),
            prediction_base: DEFAULT_PREDICTION_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Builds a config from optional overrides under `policy`.
    ///
    /// Empty or whitespace-only values count as unset.
    ///
    /// # Errors
    /// * [`ConfigError::MissingBaseUrl`] under
    ///   [`BaseUrlPolicy::RequireExplicit`] when a value is unset. The auth
    ///   URL is checked first.
    pub fn resolve(
        auth_base: Option<&str>,
        prediction_base: Option<&str>,
        policy: BaseUrlPolicy,
    ) -> Result<Self, ConfigError> {
        let auth_base = pick(auth_base, policy, DEFAULT_AUTH_BASE_URL).ok_or(
            ConfigError::MissingBaseUrl {
                service: "auth",
                setting: AUTH_URL_ENV,
                example: "http://localhost:8080",
            },
        )?;
        let prediction_base = pick(prediction_base, policy, DEFAULT_PREDICTION_BASE_URL).ok_or(
            ConfigError::MissingBaseUrl {
                service: "prediction",
                setting: PREDICTION_URL_ENV,
                example: "http://localhost:8000",
            },
        )?;

        Ok(Self {
            auth_base,
            prediction_base,
        })
    }

    /// Full URL of the auth endpoint for `mode`.
    pub fn auth_url(
        &self,
        mode: AuthMode,
    ) -> String {
        format!("{}/{}", self.auth_base, mode.endpoint())
    }

    /// Full URL of the prediction endpoint.
    pub fn prediction_url(&self) -> String {
        format!("{}/prediction", self.prediction_base)
    }
}

fn pick(
    value: Option<&str>,
    policy: BaseUrlPolicy,
    default: &str,
) -> Option<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(v.trim_end_matches('/').to_string()),
        None => match policy {
            BaseUrlPolicy::ProductionDefault => Some(default.to_string()),
            BaseUrlPolicy::RequireExplicit => None,
        },
    }
}

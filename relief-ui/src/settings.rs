//! Layered runtime settings.
//!
//! Precedence, highest first: command-line flags, environment variables,
//! the optional TOML settings file, built-in defaults.
//!
//! ```toml
//! [api]
//! auth_url = "http://localhost:8080"
//! prediction_url = "http://localhost:8000"
//! policy = "require-explicit"   # or "production-default"
//!
//! [logging]
//! level = "debug"
//! file = "relief.log"
//! console = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use relief_core::api::config::{AUTH_URL_ENV, PREDICTION_URL_ENV};
use relief_core::{ApiConfig, BaseUrlPolicy, ConfigError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    pub auth_url: Option<String>,
    pub prediction_url: Option<String>,
    pub policy: BaseUrlPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Bare level or full `EnvFilter` directive.
    pub level: Option<String>,
    /// Append log records to this file.
    pub file: Option<PathBuf>,
    /// Write log records to stderr (on unless set to `false`).
    pub console: Option<bool>,
}

impl Settings {
    /// Reads and parses a settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Base-URL values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiOverrides {
    pub auth_url: Option<String>,
    pub prediction_url: Option<String>,
    /// Forces [`BaseUrlPolicy::RequireExplicit`] regardless of the file.
    pub require_explicit: bool,
}

/// Resolves the API configuration across all layers.
///
/// `env` looks up an environment variable; pass `|k| std::env::var(k).ok()`
/// in production.
pub fn resolve_api_config(
    file: &ApiSettings,
    overrides: &ApiOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ApiConfig, ConfigError> {
    let policy = if overrides.require_explicit {
        BaseUrlPolicy::RequireExplicit
    } else {
        file.policy
    };

    let auth = first_set([
        overrides.auth_url.clone(),
        env(AUTH_URL_ENV),
        file.auth_url.clone(),
    ]);
    let prediction = first_set([
        overrides.prediction_url.clone(),
        env(PREDICTION_URL_ENV),
        file.prediction_url.clone(),
    ]);

    ApiConfig::resolve(auth.as_deref(), prediction.as_deref(), policy)
}

/// First layer holding a non-blank value; blank values fall through.
fn first_set<const N: usize>(layers: [Option<String>; N]) -> Option<String> {
    layers
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use relief_core::api::config::{DEFAULT_AUTH_BASE_URL, DEFAULT_PREDICTION_BASE_URL};

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ── file parsing ─────────────────────────────────────────────────────
    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn full_file_parses() {
        let settings = Settings::from_toml_str(
            r#"
            [api]
            auth_url = "http://localhost:8080"
            prediction_url = "http://localhost:8000"
            policy = "require-explicit"

            [logging]
            level = "debug"
            file = "relief.log"
            console = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.api.auth_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(settings.api.policy, BaseUrlPolicy::RequireExplicit);
        assert_eq!(settings.logging.level.as_deref(), Some("debug"));
        assert_eq!(settings.logging.file, Some(PathBuf::from("relief.log")));
        assert_eq!(settings.logging.console, Some(false));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml_str("[api]\nauth = \"x\"\n").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Settings::load(Path::new("/this/path/does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("/this/path/does/not/exist.toml"));
    }

    // ── layering ─────────────────────────────────────────────────────────
    #[test]
    fn nothing_set_uses_production_defaults() {
        let cfg =
            resolve_api_config(&ApiSettings::default(), &ApiOverrides::default(), env_from(&[]))
                .unwrap();
        assert_eq!(cfg.auth_base, DEFAULT_AUTH_BASE_URL);
        assert_eq!(cfg.prediction_base, DEFAULT_PREDICTION_BASE_URL);
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = ApiSettings {
            auth_url: Some("http://file-auth".to_string()),
            prediction_url: Some("http://file-predict".to_string()),
            policy: BaseUrlPolicy::ProductionDefault,
        };
        let overrides = ApiOverrides {
            auth_url: Some("http://flag-auth".to_string()),
            ..Default::default()
        };
        let env = env_from(&[
            (AUTH_URL_ENV, "http://env-auth"),
            (PREDICTION_URL_ENV, "http://env-predict/"),
        ]);

        let cfg = resolve_api_config(&file, &overrides, env).unwrap();
        assert_eq!(cfg.auth_base, "http://flag-auth");
        assert_eq!(cfg.prediction_base, "http://env-predict");
    }

    #[test]
    fn blank_env_falls_through_to_file() {
        let file = ApiSettings {
            auth_url: Some("http://file-auth".to_string()),
            ..Default::default()
        };
        let cfg = resolve_api_config(
            &file,
            &ApiOverrides::default(),
            env_from(&[(AUTH_URL_ENV, "")]),
        )
        .unwrap();
        assert_eq!(cfg.auth_base, "http://file-auth");
    }

    #[test]
    fn require_explicit_flag_overrides_file_policy() {
        let overrides = ApiOverrides {
            require_explicit: true,
            ..Default::default()
        };
        let err = resolve_api_config(
            &ApiSettings::default(),
            &overrides,
            env_from(&[(AUTH_URL_ENV, "http://env-auth")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains(PREDICTION_URL_ENV), "{err}");
    }

    #[test]
    fn require_explicit_from_file_is_satisfied_by_env() {
        let file = ApiSettings {
            policy: BaseUrlPolicy::RequireExplicit,
            ..Default::default()
        };
        let cfg = resolve_api_config(
            &file,
            &ApiOverrides::default(),
            env_from(&[
                (AUTH_URL_ENV, "http://a"),
                (PREDICTION_URL_ENV, "http://p"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.auth_base, "http://a");
        assert_eq!(cfg.prediction_base, "http://p");
    }
}

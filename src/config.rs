// Configuration loading and parsing (config/hmtracker.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Fantasy-league account credentials forwarded to the valuation service.
///
/// Opaque to this crate: they are carried on every evolution request and
/// never inspected or stored beyond the running session.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Credentials {
    pub hm_user: String,
    pub hm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the hmtracker REST API, e.g. `http://localhost:8000`.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    /// Code of the team whose timeline the session opens on.
    pub code: String,
}

/// Top-level assembled configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub team: TeamConfig,
    pub credentials: Credentials,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/hmtracker.toml` relative to
/// the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("hmtracker.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;

    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;
    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: "must not be empty".into(),
        });
    }
    if config.api.base_url.ends_with('/') {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: "must not end with a trailing slash".into(),
        });
    }
    if config.team.code.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "team.code".into(),
            message: "must not be empty".into(),
        });
    }
    if config.credentials.hm_user.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "credentials.hm_user".into(),
            message: "must not be empty".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID: &str = r#"
[api]
base_url = "http://localhost:8000"

[team]
code = "HM42"

[credentials]
hm_user = "manager@example.com"
hm_password = "secret"
"#;

    fn write_config(dir_name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(dir_name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("hmtracker.toml"), contents).unwrap();
        tmp
    }

    #[test]
    fn loads_valid_config() {
        let tmp = write_config("hmtracker_config_valid", VALID);
        let config = load_config_from(&tmp).expect("should load valid config");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.team.code, "HM42");
        assert_eq!(config.credentials.hm_user, "manager@example.com");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let tmp = std::env::temp_dir().join("hmtracker_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("hmtracker.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let tmp = write_config("hmtracker_config_invalid", "this is not [[[ toml");
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_team_code() {
        let tmp = write_config(
            "hmtracker_config_empty_team",
            &VALID.replace("code = \"HM42\"", "code = \"\""),
        );
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "team.code"),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_trailing_slash_base_url() {
        let tmp = write_config(
            "hmtracker_config_slash",
            &VALID.replace(
                "base_url = \"http://localhost:8000\"",
                "base_url = \"http://localhost:8000/\"",
            ),
        );
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "api.base_url"),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}

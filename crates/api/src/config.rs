use std::time::Duration;

use taskboard_board::assistant::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use taskboard_board::assistant::GeminiConfig;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where projects and tasks are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    /// Process-local, lost on restart.
    Memory,
}

/// Which answer provider backs the assistant endpoints.
#[derive(Debug, Clone)]
pub enum AssistantConfig {
    Rules,
    Gemini(GeminiConfig),
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// credentials of the selected backends.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub store: StoreBackend,
    pub assistant: AssistantConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `STORE_BACKEND`          | `postgres`                 |
    /// | `DATABASE_URL`           | required for `postgres`    |
    /// | `ASSISTANT_PROVIDER`     | `rules`                    |
    /// | `GEMINI_API_KEY`         | required for `gemini`      |
    /// | `GEMINI_MODEL`           | `gemini-1.5-flash`         |
    /// | `GEMINI_BASE_URL`        | public Gemini endpoint     |
    /// | `ASSISTANT_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ServerConfig::from_env`] but reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &'static str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = var("HOST", "0.0.0.0");
        let port: u16 = parse_var("PORT", var("PORT", "3000"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 =
            parse_var("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS", "30"))?;
        let shutdown_timeout_secs: u64 =
            parse_var("SHUTDOWN_TIMEOUT_SECS", var("SHUTDOWN_TIMEOUT_SECS", "30"))?;

        let store = match var("STORE_BACKEND", "postgres").to_lowercase().as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or(ConfigError::Missing { var: "DATABASE_URL" })?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    var: "STORE_BACKEND",
                    value: other.to_string(),
                    reason: "expected 'postgres' or 'memory'".to_string(),
                })
            }
        };

        let assistant = match var("ASSISTANT_PROVIDER", "rules").to_lowercase().as_str() {
            "rules" => AssistantConfig::Rules,
            "gemini" => {
                let api_key = lookup("GEMINI_API_KEY")
                    .filter(|k| !k.trim().is_empty())
                    .ok_or(ConfigError::Missing {
                        var: "GEMINI_API_KEY",
                    })?;
                let timeout_secs: u64 =
                    parse_var("ASSISTANT_TIMEOUT_SECS", var("ASSISTANT_TIMEOUT_SECS", "30"))?;
                AssistantConfig::Gemini(GeminiConfig {
                    api_key,
                    model: var("GEMINI_MODEL", DEFAULT_MODEL),
                    base_url: var("GEMINI_BASE_URL", DEFAULT_BASE_URL),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            other => {
                return Err(ConfigError::Invalid {
                    var: "ASSISTANT_PROVIDER",
                    value: other.to_string(),
                    reason: "expected 'rules' or 'gemini'".to_string(),
                })
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store,
            assistant,
        })
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_with_database_url() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/taskboard")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/taskboard".to_string()
            }
        );
        assert_matches!(config.assistant, AssistantConfig::Rules);
    }

    #[test]
    fn postgres_requires_database_url() {
        assert_matches!(
            load(&[]),
            Err(ConfigError::Missing { var: "DATABASE_URL" })
        );
    }

    #[test]
    fn memory_backend_and_origin_list() {
        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_matches!(
            load(&[("STORE_BACKEND", "memory"), ("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
        assert_matches!(
            load(&[("STORE_BACKEND", "sqlite")]),
            Err(ConfigError::Invalid { var: "STORE_BACKEND", .. })
        );
    }

    #[test]
    fn gemini_requires_api_key() {
        assert_matches!(
            load(&[("STORE_BACKEND", "memory"), ("ASSISTANT_PROVIDER", "gemini")]),
            Err(ConfigError::Missing { var: "GEMINI_API_KEY" })
        );

        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("ASSISTANT_PROVIDER", "gemini"),
            ("GEMINI_API_KEY", "k"),
            ("ASSISTANT_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_matches!(config.assistant, AssistantConfig::Gemini(g) => {
            assert_eq!(g.model, "gemini-1.5-flash");
            assert_eq!(g.timeout, Duration::from_secs(5));
        });
    }
}

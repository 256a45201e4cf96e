use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Malaria Risk Predictor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the serialized pipeline inside the models directory.
pub const MODEL_FILE_NAME: &str = "malaria_risk_model.json";

/// Same port the original web form listened on.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

pub const ENV_HOME: &str = "MALARIA_RISK_HOME";
pub const ENV_MODEL: &str = "MALARIA_RISK_MODEL";
pub const ENV_ADDR: &str = "MALARIA_RISK_ADDR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Invalid bind address {value:?}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Default `EnvFilter` directive when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "malaria_risk_lib=info,tower_http=warn"
}

/// Get the application data directory.
/// ~/MalariaRisk/ unless `MALARIA_RISK_HOME` points elsewhere.
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(ENV_HOME) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join("MalariaRisk"))
}

/// Get the models directory
pub fn models_dir() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("models"))
}

/// Resolved runtime settings for one process lifetime.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let model = std::env::var_os(ENV_MODEL).map(PathBuf::from);
        let addr = std::env::var(ENV_ADDR).ok();
        Self::resolve(model, addr.as_deref())
    }

    /// Apply overrides on top of the defaults.
    pub fn resolve(model: Option<PathBuf>, addr: Option<&str>) -> Result<Self, ConfigError> {
        let model_path = match model {
            Some(path) => path,
            None => models_dir()?.join(MODEL_FILE_NAME),
        };
        let bind_addr = parse_bind_addr(addr.unwrap_or(DEFAULT_BIND_ADDR))?;
        Ok(Self {
            model_path,
            bind_addr,
        })
    }
}

fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddr {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_model_path_wins() {
        let config =
            AppConfig::resolve(Some(PathBuf::from("/tmp/model.json")), Some("127.0.0.1:9000"))
                .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn default_bind_addr_is_loopback() {
        let config = AppConfig::resolve(Some(PathBuf::from("m.json")), None).unwrap();
        assert!(config.bind_addr.ip().is_loopback());
        assert_eq!(config.bind_addr.port(), 8501);
    }

    #[test]
    fn invalid_bind_addr_rejected() {
        let err = AppConfig::resolve(Some(PathBuf::from("m.json")), Some("not-an-addr"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(err.to_string().contains("not-an-addr"));
    }

    #[test]
    fn default_model_path_ends_with_file_name() {
        if let Ok(dir) = models_dir() {
            let config = AppConfig::resolve(None, None).unwrap();
            assert!(config.model_path.starts_with(dir));
            assert!(config.model_path.ends_with(MODEL_FILE_NAME));
        }
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}

use std::path::PathBuf;

use plinth_core::{load_settings, CalcResult, DesignSettings};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8085";
const DEFAULT_REPORTS_DIR: &str = "./reports";

/// Process configuration read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
    /// `PLINTH_REPORTS_DIR`
    pub reports_dir: PathBuf,
    /// `PLINTH_SETTINGS`; built-in defaults when unset
    pub settings_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string()),
            reports_dir: lookup("PLINTH_REPORTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
            settings_path: lookup("PLINTH_SETTINGS").filter(|s| !s.is_empty()).map(PathBuf::from),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Design constants from `settings_path`, or the defaults.
    pub fn design_settings(&self) -> CalcResult<DesignSettings> {
        match &self.settings_path {
            Some(path) => load_settings(path),
            None => Ok(DesignSettings::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr(), "0.0.0.0:8085");
        assert_eq!(config.reports_dir, PathBuf::from("./reports"));
        assert_eq!(config.design_settings().unwrap(), DesignSettings::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("PLINTH_REPORTS_DIR", "/var/plinth"),
            ("PLINTH_SETTINGS", ""),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.reports_dir, PathBuf::from("/var/plinth"));
        assert!(config.settings_path.is_none());
    }

    #[test]
    fn test_missing_settings_file_is_error() {
        let config = ServerConfig::from_lookup(|k| (k == "PLINTH_SETTINGS").then(|| "/nonexistent/plinth.json".to_string()));
        assert!(config.design_settings().is_err());
    }
}

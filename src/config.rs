use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::DEFAULT_DIRECTORY_LABEL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    /// Label reported as `directory` by the options endpoint.
    pub directory_label: String,
    pub strict: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            directory_label: DEFAULT_DIRECTORY_LABEL.to_string(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub web_root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            web_root: "web/dist".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub server: ServerConfig,
}

impl DashboardConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::parse(&contents)?
            }
            _ => DashboardConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("UMAFAN_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data.dir = PathBuf::from(dir);
            }
        }
        if let Ok(label) = env::var("UMAFAN_DIRECTORY_LABEL") {
            if !label.trim().is_empty() {
                self.data.directory_label = label;
            }
        }
        if let Ok(strict) = env::var("UMAFAN_STRICT") {
            if let Some(value) = parse_flag(&strict) {
                self.data.strict = value;
            }
        }
        if let Ok(host) = env::var("UMAFAN_HOST") {
            if !host.trim().is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = env::var("UMAFAN_PORT") {
            if let Ok(value) = port.trim().parse::<u16>() {
                self.server.port = value;
            }
        }
        if let Ok(web_root) = env::var("UMAFAN_WEB_ROOT") {
            if !web_root.trim().is_empty() {
                self.server.web_root = web_root;
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    env::var("UMAFAN_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/dashboard.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = DashboardConfig::parse(
            r#"
            [data]
            dir = "snapshots"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.data.dir, PathBuf::from("snapshots"));
        assert_eq!(config.data.directory_label, DEFAULT_DIRECTORY_LABEL);
        assert!(!config.data.strict);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn defaults_survive_serialization() {
        let config = DashboardConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(DashboardConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = DashboardConfig::parse("[data\ndir = 1").unwrap_err();
        assert!(err.starts_with("failed to parse config"));
    }
}

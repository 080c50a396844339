use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use crate::error::ConfigError;

/// 默认服务地址（局域网内的后端）
pub const DEFAULT_BASE_URL: &str = "http://192.168.0.178:8080/api/dietplans";
/// 默认用户（服务端尚无用户体系）
pub const DEFAULT_USER_ID: &str = "demoUser";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 客户端配置 (~/.config/meal-log/config.toml)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub user_id: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("meal-log").join("config.toml"))
    }

    /// 从TOML文件加载配置，文件不存在时使用默认值
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 校验并规范化服务地址（去掉末尾的 `/`）
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        self.base_url = trimmed;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(r#"base_url = "http://localhost:8080/api/dietplans""#).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/api/dietplans");
        assert_eq!(config.user_id, DEFAULT_USER_ID);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("meal-log-does-not-exist").join("config.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_validate_strips_trailing_slash() {
        let config = Config {
            base_url: "http://localhost:8080/api/dietplans/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap().base_url, "http://localhost:8080/api/dietplans");
    }

    #[test]
    fn test_validate_accepts_https() {
        let config = Config {
            base_url: "https://meals.example.com/api/dietplans".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        for url in ["not a url", "ftp://example.com/api"] {
            let config = Config {
                base_url: url.to_string(),
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })));
        }
    }
}

//! 错误类型
//!
//! 校验错误在发请求之前产生，网络错误来自传输层或服务器响应

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// 提交前的输入校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("请输入餐名和卡路里")]
    MissingFields,

    #[error("卡路里必须是非负整数: {0}")]
    InvalidCalories(String),
}

/// 与远端服务通信时的错误
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("服务器返回 {status}: {url}")]
    Status { status: StatusCode, url: String },
}

/// 启动阶段的配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误 {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("无效的服务地址 '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

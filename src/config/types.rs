//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::application::ClientSettings;
use crate::domain::RequestFlags;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP transport 配置
    #[serde(default)]
    pub http: HttpConfig,

    /// 请求默认开关
    #[serde(default)]
    pub request: RequestFlags,

    /// 用户提示配置
    #[serde(default)]
    pub notify: NotifyConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 编排层使用的设置
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            defaults: self.request,
            suppressed_codes: self.notify.suppressed_codes.clone(),
        }
    }
}

/// HTTP transport 配置
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// 相对地址的前缀
    #[serde(default)]
    pub base_url: String,

    /// 请求超时时间（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// 用户提示配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    /// 不自动提示的业务码
    #[serde(default)]
    pub suppressed_codes: Vec<i64>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

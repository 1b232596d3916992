//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（reqlayer.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["reqlayer", "reqlayer.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `REQLAYER_`，层级分隔符 `__`）
/// 2. 配置文件（reqlayer.toml 或 reqlayer.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `REQLAYER_HTTP__BASE_URL=http://api.internal:8080`
/// - `REQLAYER_HTTP__TIMEOUT_MS=10000`
/// - `REQLAYER_REQUEST__GLOBAL_ERROR=false`
/// - `REQLAYER_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("http.base_url", "")?
        .set_default("http.timeout_ms", 5000)?
        .set_default("request.global_error", true)?
        .set_default("request.from_cache", false)?
        .set_default("request.clear_cache", false)?
        .set_default("request.original_response", false)?
        .set_default("request.cancel_when_route_change", true)?
        .set_default("request.cancel_previous", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: REQLAYER_HTTP__BASE_URL=http://api.internal:8080
    builder = builder.add_source(
        Environment::with_prefix("REQLAYER")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("notify.suppressed_codes")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.http.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "HTTP timeout cannot be 0".to_string(),
        ));
    }

    let base_url = &config.http.base_url;
    if !base_url.is_empty() && !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "HTTP base URL must start with http:// or https://: {}",
            base_url
        )));
    }

    if config.log.level.is_empty() {
        return Err(ConfigError::ValidationError(
            "Log level cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Request Layer Configuration ===");
    tracing::info!("Base URL: {:?}", config.http.base_url);
    tracing::info!("Timeout: {}ms", config.http.timeout_ms);
    tracing::info!("Request Defaults: {:?}", config.request);
    tracing::info!("Suppressed Codes: {:?}", config.notify.suppressed_codes);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("===================================");
}

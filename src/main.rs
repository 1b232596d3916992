//! reqlayer - 命令行入口
//!
//! 用法: `reqlayer <METHOD> <URL> [JSON_PARAMS]`
//!
//! 相对 URL 会拼接配置中的 `http.base_url`；Ctrl-C 取消在途请求

use std::sync::Arc;

use reqlayer::config::{load_config, print_config, AppConfig};
use reqlayer::infrastructure::adapters::{HttpTransportConfig, ReqwestTransport, TracingNotifier};
use reqlayer::{build_client, Method, RequestOptions};

fn init_logging(config: &AppConfig) {
    let log_filter = format!("{},reqlayer={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    init_logging(&config);
    print_config(&config);

    let mut args = std::env::args().skip(1);
    let usage = "usage: reqlayer <METHOD> <URL> [JSON_PARAMS]";
    let method = args
        .next()
        .and_then(|m| Method::from_str(&m))
        .ok_or_else(|| anyhow::anyhow!(usage))?;
    let url = args.next().ok_or_else(|| anyhow::anyhow!(usage))?;
    let params = match args.next() {
        Some(raw) => serde_json::from_str(&raw)?,
        None => serde_json::Value::Null,
    };

    let transport_config =
        HttpTransportConfig::new(config.http.base_url.clone()).with_timeout(config.http.timeout_ms);
    let transport = Arc::new(ReqwestTransport::new(transport_config)?);
    let client = build_client(
        config.client_settings(),
        transport,
        Arc::new(TracingNotifier::new()),
    );

    let pending = client
        .dispatch(method, &url, params, &RequestOptions::new())
        .await;

    let result = tokio::select! {
        result = pending => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received interrupt, cancelling in-flight requests");
            client.cancel_route_scoped().await;
            return Ok(());
        }
    };

    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

use std::path::Path;
use std::sync::Arc;

use config::{Config, Environment, File};
use kurabe_align::service::CompareService;
use kurabe_api::server::{AppState, start_server};
use kurabe_core::common::time::RealTimeProvider;
use kurabe_core::config::AppConfig;
use kurabe_feed::yahoo::YahooProvider;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 可选配置文件路径 (不含扩展名)
const CONFIG_FILE: &str = "config/kurabe";

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化所有具体实现组件并通过 Arc<dyn Trait> 注入到 API 层。
///
/// # Logic
/// 1. 加载配置。
/// 2. 初始化全局日志。
/// 3. 实例化基础设施层 (Yahoo 行情源、系统时钟)。
/// 4. 构造对比服务并启动 HTTP 服务，直到收到 Ctrl-C。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载配置
    let config = load_config(Path::new(CONFIG_FILE))?;

    // 2. 初始化日志，guard 必须存活到进程结束以刷新缓冲
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))?;
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
    info!("Kurabe starting...");

    // 3. 实例化基础设施层
    let feed = Arc::new(YahooProvider::new(&config.feed)?);
    let clock = Arc::new(RealTimeProvider);

    // 4. 构造应用服务层并启动
    let compare = Arc::new(CompareService::new(feed, clock));
    let state = AppState { compare };

    start_server(state, &config.server.bind_addr(), shutdown_signal()).await?;

    info!("Shutdown complete.");
    Ok(())
}

/// # Summary
/// 分层加载配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 为底。
/// 2. 叠加可选的 TOML 文件。
/// 3. 叠加 `KURABE__SECTION__KEY` 形式的环境变量。
fn load_config(file: &Path) -> Result<AppConfig, config::ConfigError> {
    Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix("KURABE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// 等待 Ctrl-C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received. Exiting..."),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tictactoe_ai::RandomBot;
use tictactoe_server::{Device, DeviceServer, ServerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志：先用默认指令，读取配置后再替换
    let (filter, filter_handle) = reload::Layer::new(ServerConfig::default().env_filter()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    // 可选参数：配置文件路径
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ServerConfig::load_from(&path)?,
        None => ServerConfig::load(),
    };
    filter_handle
        .reload(config.env_filter()?)
        .context("无法应用日志配置")?;

    info!("井字棋设备服务启动中...");

    let device = Arc::new(Device::new(
        config.device_name.clone(),
        RandomBot::with_seed(config.bot_seed),
    ));
    let addr = config.network.addr();
    let server = DeviceServer::bind(&addr, device)
        .await
        .with_context(|| format!("无法监听 {}", addr))?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("无法监听退出信号: {}", e);
            }
        })
        .await;

    info!("井字棋设备服务已退出");
    Ok(())
}

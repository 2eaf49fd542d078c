//! 命令行客户端：逐行读取标准输入作为命令，打印设备返回的内容

use anyhow::{Context, Result};
use protocol::NetworkConfig;
use tictactoe_server::DeviceClient;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| NetworkConfig::default().addr());
    let mut client = DeviceClient::connect(&addr)
        .await
        .with_context(|| format!("无法连接 {}", addr))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let output = client.command(&line).await?;
        if output.ends_with('\n') {
            print!("{}", output);
        } else {
            println!("{}", output);
        }
    }

    client.close().await?;
    Ok(())
}

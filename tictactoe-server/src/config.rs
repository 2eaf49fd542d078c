//! 服务端配置
//!
//! 配置以 JSON 保存在系统配置目录下，文件缺失或格式无效时使用默认值。

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use protocol::{NetworkConfig, DEVICE_NAME};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::{Directive, EnvFilter};

/// 服务端配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub network: NetworkConfig,
    /// 默认日志指令（`RUST_LOG` 之外追加）
    pub log_directive: String,
    /// 机器人随机种子，设置后对局可复现
    pub bot_seed: Option<u64>,
    /// 设备名称
    pub device_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            log_directive: "tictactoe_server=info".to_string(),
            bot_seed: None,
            device_name: DEVICE_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    /// 默认配置文件路径
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("tictactoe");
            path.push("server.json");
            path
        })
    }

    /// 从默认路径加载，失败时退回默认配置
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("无法获取配置目录，使用默认配置");
            return Self::default();
        };

        if !path.exists() {
            tracing::info!("配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("配置文件格式无效: {:?}", path))?;
        tracing::info!("已加载配置: {:?}", path);
        Ok(config)
    }

    /// 日志过滤器：`RUST_LOG` 加上配置的默认指令
    pub fn env_filter(&self) -> Result<EnvFilter> {
        let directive = self
            .log_directive
            .parse::<Directive>()
            .with_context(|| format!("日志指令无效: {}", self.log_directive))?;
        Ok(EnvFilter::from_default_env().add_directive(directive))
    }

    /// 保存到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化配置失败")?;
        fs::write(path, content).with_context(|| format!("写入配置文件失败: {:?}", path))?;

        tracing::info!("配置已保存: {:?}", path);
        Ok(())
    }
}

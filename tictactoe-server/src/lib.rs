//! 井字棋设备服务端
//!
//! 包含:
//! - 对局状态机
//! - 字节流设备（写命令、读状态）
//! - TCP 设备服务与客户端
//! - 配置

pub mod client;
pub mod config;
pub mod device;
pub mod game;
pub mod server;

pub use client::DeviceClient;
pub use config::ServerConfig;
pub use device::{Device, DeviceHandle};
pub use game::GameState;
pub use server::{handle_request, serve_connection, DeviceServer};

//! 设备消息类型定义
//!
//! 远程客户端通过这些消息对设备执行写、读、定位操作，
//! 与本地打开设备文件后的 write/read/lseek 一一对应。

use serde::{Deserialize, Serialize};

/// 客户端发送给设备的请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceRequest {
    /// 写入一条命令
    Write { data: Vec<u8> },
    /// 从当前读取位置读取至多 `count` 字节
    Read { count: usize },
    /// 设置读取位置
    Seek { offset: usize },
    /// 心跳请求
    Ping,
}

/// 设备返回给客户端的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceResponse {
    /// 已写入的字节数
    Written { count: usize },
    /// 读取到的数据，为空表示已读完
    Data { bytes: Vec<u8> },
    /// 新的读取位置
    Seeked { offset: usize },
    /// 心跳响应
    Pong,
    /// 错误消息
    Error { message: String },
}

impl DeviceResponse {
    /// 简短的类型名（用于日志和错误信息）
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceResponse::Written { .. } => "Written",
            DeviceResponse::Data { .. } => "Data",
            DeviceResponse::Seeked { .. } => "Seeked",
            DeviceResponse::Pong => "Pong",
            DeviceResponse::Error { .. } => "Error",
        }
    }
}

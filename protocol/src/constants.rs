//! 协议常量定义

use std::time::Duration;

/// 协议版本号
pub const PROTOCOL_VERSION: u8 = 1;

/// 设备名称
pub const DEVICE_NAME: &str = "wtictactoe";

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 3;

/// 棋盘格子总数
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 单条命令最大字节数（超出部分被截断）
pub const MAX_COMMAND_LEN: usize = 127;

/// 命令字最大长度
pub const MAX_COMMAND_WORD_LEN: usize = 5;

/// 单个参数最大长度
pub const MAX_ARG_LEN: usize = 1;

/// 最多参数个数
pub const MAX_ARGS: usize = 2;

/// 状态缓冲区容量（字节）
pub const STATUS_BUFFER_SIZE: usize = 128;

/// 消息帧最大大小
pub const MAX_FRAME_SIZE: usize = 65536;

/// 服务端最大连接数
pub const MAX_CONNECTIONS: usize = 100;

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 9528;

/// 连接超时（秒）
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// 连接超时 Duration
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(CONNECT_TIMEOUT_SECS);

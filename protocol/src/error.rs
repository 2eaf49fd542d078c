//! 错误类型定义

use thiserror::Error;

/// 命令解析错误（统一编码为 DEV_INVALID_COMMAND）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 空命令
    #[error("Empty command")]
    Empty,

    /// 输入不是文本
    #[error("Command is not valid ASCII text")]
    NotText,

    /// 命令字过长
    #[error("Command word too long: {len} chars (max: {max})")]
    CommandTooLong { len: usize, max: usize },

    /// 参数过长
    #[error("Argument #{index} too long: {len} chars (max: {max})")]
    ArgumentTooLong { index: usize, len: usize, max: usize },

    /// 参数过多
    #[error("Too many arguments, extra token: {token}")]
    TooManyArguments { token: String },

    /// 未知命令
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// 游戏规则错误（命令合法但不适用于当前状态）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// 缺少棋子参数
    #[error("Missing piece argument")]
    MissingPiece,

    /// 无效棋子
    #[error("Invalid piece: {piece:?}")]
    InvalidPiece { piece: char },

    /// 游戏已开始
    #[error("Game already started")]
    AlreadyStarted,

    /// 无效重置
    #[error("Invalid reset")]
    InvalidReset,

    /// 游戏未开始
    #[error("Game not started")]
    NotStarted,

    /// 不是玩家回合
    #[error("Not the player's turn")]
    NotPlayerTurn,

    /// 越界
    #[error("Position out of bounds")]
    OutOfBounds,

    /// 格子已被占用
    #[error("Cannot place at ({row}, {col}): cell occupied")]
    CannotPlace { row: u8, col: u8 },

    /// 游戏已结束
    #[error("Game is already over")]
    AlreadyOver,

    /// 无效的机器人命令
    #[error("BOT takes no arguments")]
    InvalidBot,

    /// 不是机器人回合
    #[error("Not the bot's turn")]
    NotCpuTurn,
}

/// 命令执行错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// 解析错误
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// 规则错误
    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误（bincode）
    #[error("Bincode serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// 协议版本不匹配
    #[error("Protocol version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    /// 帧大小超限
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// 连接超时
    #[error("Connection timeout")]
    ConnectionTimeout,

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,

    /// 设备返回错误
    #[error("Device error: {0}")]
    Device(String),

    /// 非预期的响应
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;

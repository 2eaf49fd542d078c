//! 结果编码
//!
//! 每条命令的结果最终都编码为一个稳定的状态名，作为下一次读取的内容。

use serde::{Deserialize, Serialize};

use crate::buffer::TextBuffer;
use crate::error::{CommandError, GameError, ParseError};
use crate::piece::Outcome;

/// 命令成功后的状态迁移
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 命令已生效
    Applied,
    /// 已渲染棋盘，下一次读取返回棋盘文本
    Rendered(TextBuffer),
    /// 本次落子结束了对局
    Finished(Outcome),
}

/// 命令执行结果
pub type CommandResult = std::result::Result<Transition, CommandError>;

/// 状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StatusCode {
    Ok = 0,
    MissingPiece,
    InvalidPiece,
    GameStarted,
    InvalidReset,
    GameNotStarted,
    NotPlayerTurn,
    OutOfBounds,
    CannotPlace,
    GameOver,
    InvalidBot,
    NotCpuTurn,
    DevInvalidCommand,
}

impl StatusCode {
    /// 所有状态码
    pub const ALL: [StatusCode; 13] = [
        StatusCode::Ok,
        StatusCode::MissingPiece,
        StatusCode::InvalidPiece,
        StatusCode::GameStarted,
        StatusCode::InvalidReset,
        StatusCode::GameNotStarted,
        StatusCode::NotPlayerTurn,
        StatusCode::OutOfBounds,
        StatusCode::CannotPlace,
        StatusCode::GameOver,
        StatusCode::InvalidBot,
        StatusCode::NotCpuTurn,
        StatusCode::DevInvalidCommand,
    ];

    /// 状态名（读取时返回的文本）
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MissingPiece => "MISSING_PIECE",
            StatusCode::InvalidPiece => "INVALID_PIECE",
            StatusCode::GameStarted => "GAME_STARTED",
            StatusCode::InvalidReset => "INVALID_RESET",
            StatusCode::GameNotStarted => "GAME_NOT_STARTED",
            StatusCode::NotPlayerTurn => "NOT_PLAYER_TURN",
            StatusCode::OutOfBounds => "OUT_OF_BOUNDS",
            StatusCode::CannotPlace => "CANNOT_PLACE",
            StatusCode::GameOver => "GAME_OVER",
            StatusCode::InvalidBot => "INVALID_BOT",
            StatusCode::NotCpuTurn => "NOT_CPU_TURN",
            StatusCode::DevInvalidCommand => "DEV_INVALID_COMMAND",
        }
    }

    /// 从状态名解析
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == name)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&Transition> for StatusCode {
    fn from(transition: &Transition) -> Self {
        match transition {
            Transition::Applied | Transition::Rendered(_) => StatusCode::Ok,
            Transition::Finished(_) => StatusCode::GameOver,
        }
    }
}

impl From<&ParseError> for StatusCode {
    fn from(_: &ParseError) -> Self {
        StatusCode::DevInvalidCommand
    }
}

impl From<&GameError> for StatusCode {
    fn from(err: &GameError) -> Self {
        match err {
            GameError::MissingPiece => StatusCode::MissingPiece,
            GameError::InvalidPiece { .. } => StatusCode::InvalidPiece,
            GameError::AlreadyStarted => StatusCode::GameStarted,
            GameError::InvalidReset => StatusCode::InvalidReset,
            GameError::NotStarted => StatusCode::GameNotStarted,
            GameError::NotPlayerTurn => StatusCode::NotPlayerTurn,
            GameError::OutOfBounds => StatusCode::OutOfBounds,
            GameError::CannotPlace { .. } => StatusCode::CannotPlace,
            GameError::AlreadyOver => StatusCode::GameOver,
            GameError::InvalidBot => StatusCode::InvalidBot,
            GameError::NotCpuTurn => StatusCode::NotCpuTurn,
        }
    }
}

impl From<&CommandError> for StatusCode {
    fn from(err: &CommandError) -> Self {
        match err {
            CommandError::Parse(e) => e.into(),
            CommandError::Game(e) => e.into(),
        }
    }
}

impl From<&CommandResult> for StatusCode {
    fn from(result: &CommandResult) -> Self {
        match result {
            Ok(transition) => transition.into(),
            Err(err) => err.into(),
        }
    }
}

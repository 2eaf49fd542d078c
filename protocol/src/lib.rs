//! 井字棋设备共享协议库
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 胜负判定与棋盘渲染
//! - 命令分词与识别
//! - 状态码与结果编码
//! - 设备消息类型定义 (DeviceRequest, DeviceResponse)
//! - 传输层抽象 (Connector, Connection, Listener traits) 与帧编解码

mod board;
mod buffer;
mod command;
mod constants;
mod error;
mod message;
mod piece;
mod rules;
mod status;
mod transport;

pub use board::Board;
pub use buffer::TextBuffer;
pub use command::{Command, CommandKind, Tokens};
pub use constants::*;
pub use error::{CommandError, GameError, ParseError, ProtocolError, Result};
pub use message::{DeviceRequest, DeviceResponse};
pub use piece::{cell_glyph, Cell, Outcome, Piece, PlayerRole, Position, EMPTY_GLYPH};
pub use rules::{Rules, Verdict, LINES};
pub use status::{CommandResult, StatusCode, Transition};
pub use transport::{
    Connection, Connector, Listener,
    StreamConnection, TcpConnection, TcpConnector, TcpListener,
    NetworkConfig,
    FrameReader, FrameWriter,
};

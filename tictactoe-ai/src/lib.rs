//! 井字棋机器人
//!
//! 包含:
//! - 随机落子（拒绝采样）
//! - 可复现的随机源构造

mod bot;

pub use bot::{BotRng, RandomBot};

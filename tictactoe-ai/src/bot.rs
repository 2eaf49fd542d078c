//! 随机落子机器人
//!
//! 在整个 3x3 索引空间内有放回地抽取坐标，抽到已占用的格子就重抽。
//! 棋盘上至少有一个空格时必然终止；对局状态机保证轮到机器人时棋盘未满。

use protocol::{Board, Position, BOARD_SIZE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// 机器人使用的随机源
pub type BotRng = ChaCha8Rng;

/// 随机落子机器人
#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: BotRng,
}

impl RandomBot {
    /// 使用系统熵初始化
    pub fn from_entropy() -> Self {
        Self {
            rng: BotRng::from_entropy(),
        }
    }

    /// 使用固定种子初始化（对局可复现）
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: BotRng::seed_from_u64(seed),
        }
    }

    /// 有种子时可复现，否则使用系统熵
    pub fn with_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// 选择一个空格
    pub fn choose(&mut self, board: &Board) -> Option<Position> {
        Self::pick(board, &mut self.rng)
    }

    /// 用给定随机源均匀地选择一个空格，棋盘已满时返回 `None`
    pub fn pick<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
        if board.is_full() {
            return None;
        }

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let row = rng.gen_range(0..BOARD_SIZE) as u8;
            let col = rng.gen_range(0..BOARD_SIZE) as u8;
            let pos = Position::new_unchecked(row, col);
            if board.is_vacant(pos) {
                debug!(%pos, attempts, "机器人选定落子位置");
                return Some(pos);
            }
        }
    }
}

impl Default for RandomBot {
    fn default() -> Self {
        Self::from_entropy()
    }
}

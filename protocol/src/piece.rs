//! 棋子、角色与位置定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, CELL_COUNT};

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    X,
    O,
}

impl Piece {
    /// 获取对方棋子
    pub fn opponent(&self) -> Piece {
        match self {
            Piece::X => Piece::O,
            Piece::O => Piece::X,
        }
    }

    /// 获取显示字符
    pub fn to_char(&self) -> char {
        match self {
            Piece::X => 'X',
            Piece::O => 'O',
        }
    }

    /// 从字符解析（区分大小写）
    pub fn from_char(c: char) -> Option<Piece> {
        match c {
            'X' => Some(Piece::X),
            'O' => Some(Piece::O),
            _ => None,
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// 格子：`None` 为空
pub type Cell = Option<Piece>;

/// 空格子的显示字符
pub const EMPTY_GLYPH: char = '_';

/// 获取格子的显示字符
pub fn cell_glyph(cell: Cell) -> char {
    cell.map_or(EMPTY_GLYPH, |piece| piece.to_char())
}

/// 行棋方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    /// 玩家
    Human,
    /// 机器人
    Bot,
}

impl PlayerRole {
    /// 获取对方
    pub fn opponent(&self) -> PlayerRole {
        match self {
            PlayerRole::Human => PlayerRole::Bot,
            PlayerRole::Bot => PlayerRole::Human,
        }
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// 一方连成一线
    Won(Piece),
    /// 和棋
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Won(piece) => write!(f, "{} wins", piece),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// 棋盘位置（内部 0 起始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-2)
    pub row: u8,
    /// 列 (0-2)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 从外部坐标字符解析（'1'-'3'）
    pub fn from_labels(row: char, col: char) -> Option<Self> {
        let row = row.to_digit(10)?.checked_sub(1)?;
        let col = col.to_digit(10)?.checked_sub(1)?;
        Self::new(row as u8, col as u8)
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Position {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 遍历所有位置（行优先）
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT).filter_map(Position::from_index)
    }
}

/// 以外部坐标（1 起始）显示
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row + 1, self.col + 1)
    }
}

//! 棋盘状态与渲染

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::buffer::TextBuffer;
use crate::constants::{BOARD_SIZE, CELL_COUNT};
use crate::piece::{cell_glyph, Cell, Piece, Position};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 3x3 棋盘，索引为 row * 3 + col
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
        }
    }

    /// 获取指定位置的格子
    pub fn get(&self, pos: Position) -> Cell {
        self.cells.get(pos.to_index()).copied().flatten()
    }

    /// 指定位置是否为空
    pub fn is_vacant(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// 在空格上落子，格子已被占用时返回 false
    pub fn place(&mut self, pos: Position, piece: Piece) -> bool {
        match self.cells.get_mut(pos.to_index()) {
            Some(cell) if cell.is_none() => {
                *cell = Some(piece);
                true
            }
            _ => false,
        }
    }

    /// 所有空格位置
    pub fn vacant_positions(&self) -> Vec<Position> {
        Position::all().filter(|&pos| self.is_vacant(pos)).collect()
    }

    /// 空格数量
    pub fn vacant_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// 是否已下满
    pub fn is_full(&self) -> bool {
        self.vacant_count() == 0
    }

    /// 指定棋子的数量
    pub fn count(&self, piece: Piece) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(piece)).count()
    }

    /// 获取一行
    pub fn row(&self, row: u8) -> [Cell; BOARD_SIZE] {
        [0u8, 1, 2].map(|col| self.get(Position::new_unchecked(row, col)))
    }

    /// 将棋盘（含行列标号）写入定长缓冲区
    ///
    /// ```text
    /// . 1 2 3
    /// 1 X _ _
    /// 2 _ O _
    /// 3 _ _ _
    /// ```
    pub fn render(&self) -> Result<TextBuffer, fmt::Error> {
        let mut buf = TextBuffer::new();
        self.render_into(&mut buf)?;
        Ok(buf)
    }

    /// 逐段写入任意 `fmt::Write`
    pub fn render_into<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str(".")?;
        for col in 1..=BOARD_SIZE {
            write!(out, " {}", col)?;
        }
        out.write_char('\n')?;

        for row in 0..BOARD_SIZE {
            write!(out, "{}", row + 1)?;
            for cell in self.row(row as u8) {
                write!(out, " {}", cell_glyph(cell))?;
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_into(f)
    }
}

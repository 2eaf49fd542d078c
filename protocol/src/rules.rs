//! 胜负判定

use crate::board::Board;
use crate::piece::{Piece, Position};

/// 判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 指定棋子连成一线
    Win,
    /// 棋盘已满且无人获胜
    Draw,
    /// 对局继续
    Ongoing,
}

/// 所有可能的连线：三行、三列、两条对角线
pub const LINES: [[Position; 3]; 8] = [
    // 行
    [Position::new_unchecked(0, 0), Position::new_unchecked(0, 1), Position::new_unchecked(0, 2)],
    [Position::new_unchecked(1, 0), Position::new_unchecked(1, 1), Position::new_unchecked(1, 2)],
    [Position::new_unchecked(2, 0), Position::new_unchecked(2, 1), Position::new_unchecked(2, 2)],
    // 列
    [Position::new_unchecked(0, 0), Position::new_unchecked(1, 0), Position::new_unchecked(2, 0)],
    [Position::new_unchecked(0, 1), Position::new_unchecked(1, 1), Position::new_unchecked(2, 1)],
    [Position::new_unchecked(0, 2), Position::new_unchecked(1, 2), Position::new_unchecked(2, 2)],
    // 对角线
    [Position::new_unchecked(0, 0), Position::new_unchecked(1, 1), Position::new_unchecked(2, 2)],
    [Position::new_unchecked(0, 2), Position::new_unchecked(1, 1), Position::new_unchecked(2, 0)],
];

/// 规则判定
pub struct Rules;

impl Rules {
    /// 判定刚落子的一方是否获胜或和棋
    ///
    /// 只检查 `piece` 的连线：落子方不可能替对方完成连线。
    /// 连线优先于和棋，最后一步既下满棋盘又连成一线时判为胜。
    pub fn evaluate(board: &Board, piece: Piece) -> Verdict {
        if Self::has_line(board, piece) {
            Verdict::Win
        } else if board.is_full() {
            Verdict::Draw
        } else {
            Verdict::Ongoing
        }
    }

    /// 指定棋子是否占满某一行、列或对角线
    pub fn has_line(board: &Board, piece: Piece) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&pos| board.get(pos) == Some(piece)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 从 "XO_" 形式的三行字符串构造棋盘
    fn board_from(rows: [&str; 3]) -> Board {
        let mut board = Board::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if let Some(piece) = Piece::from_char(ch) {
                    board.place(Position::new_unchecked(r as u8, c as u8), piece);
                }
            }
        }
        board
    }

    #[test]
    fn test_every_line_wins() {
        for line in LINES {
            let mut board = Board::empty();
            for pos in line {
                board.place(pos, Piece::O);
            }
            assert_eq!(Rules::evaluate(&board, Piece::O), Verdict::Win);
            // 对方棋子不受影响
            assert_eq!(Rules::evaluate(&board, Piece::X), Verdict::Ongoing);
        }
    }

    #[test]
    fn test_ongoing() {
        let board = board_from(["XO_", "_X_", "O__"]);
        assert_eq!(Rules::evaluate(&board, Piece::X), Verdict::Ongoing);
        assert_eq!(Rules::evaluate(&board, Piece::O), Verdict::Ongoing);
        assert_eq!(Rules::evaluate(&Board::empty(), Piece::X), Verdict::Ongoing);
    }

    #[test]
    fn test_draw() {
        let board = board_from(["XOX", "XOO", "OXX"]);
        assert_eq!(Rules::evaluate(&board, Piece::X), Verdict::Draw);
        assert_eq!(Rules::evaluate(&board, Piece::O), Verdict::Draw);
    }

    #[test]
    fn test_full_board_with_line_is_win() {
        let board = board_from(["XXX", "OOX", "XOO"]);
        assert_eq!(Rules::evaluate(&board, Piece::X), Verdict::Win);
        assert_eq!(Rules::evaluate(&board, Piece::O), Verdict::Draw);
    }

    #[test]
    fn test_mixed_line_is_not_win() {
        let board = board_from(["XXO", "___", "___"]);
        assert!(!Rules::has_line(&board, Piece::X));
        assert!(!Rules::has_line(&board, Piece::O));
    }
}

//! 对局状态机
//!
//! 每条命令都是对 `GameState` 的一次受保护迁移：
//! 先按固定顺序检查前置条件，全部通过后才修改状态。

use protocol::{
    Board, Command, CommandKind, CommandResult, GameError, Outcome, Piece, PlayerRole,
    Position, Rules, Transition, Verdict,
};
use tictactoe_ai::RandomBot;
use tracing::{debug, info, warn};

/// 记录被拒绝的命令
fn reject<T>(err: GameError) -> Result<T, GameError> {
    warn!(result = "fail", error = %err, "命令被拒绝");
    Err(err)
}

/// 对局状态
///
/// 玩家和机器人的棋子在 START 时确定，之后不再改变；
/// 当前行棋的棋子由 `active_role` 推出。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameState {
    board: Board,
    /// 玩家棋子，`None` 表示未开局
    human_piece: Option<Piece>,
    /// 当前行棋方，`None` 表示未开局
    active_role: Option<PlayerRole>,
    /// 对局结果，`Some` 表示已结束
    winner: Option<Outcome>,
}

impl GameState {
    /// 创建未开局的初始状态
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human_piece(&self) -> Option<Piece> {
        self.human_piece
    }

    /// 机器人棋子（玩家棋子的对方）
    pub fn bot_piece(&self) -> Option<Piece> {
        self.human_piece.map(|piece| piece.opponent())
    }

    pub fn active_role(&self) -> Option<PlayerRole> {
        self.active_role
    }

    /// 当前行棋方的棋子
    pub fn active_piece(&self) -> Option<Piece> {
        match self.active_role? {
            PlayerRole::Human => self.human_piece(),
            PlayerRole::Bot => self.bot_piece(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.human_piece.is_some()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    /// 执行一条命令，返回新状态和结果
    ///
    /// 命令被拒绝时返回的状态与原状态相同。
    pub fn apply(&self, command: &Command, bot: &mut RandomBot) -> (GameState, CommandResult) {
        let mut next = self.clone();
        match next.dispatch(command, bot) {
            Ok(transition) => (next, Ok(transition)),
            Err(err) => (self.clone(), Err(err.into())),
        }
    }

    /// 将命令交给对应的处理函数
    fn dispatch(&mut self, command: &Command, bot: &mut RandomBot) -> Result<Transition, GameError> {
        debug!(
            command = %command.kind,
            args = ?command.args,
            human_piece = ?self.human_piece,
            active_role = ?self.active_role,
            started = self.is_started(),
            over = self.is_over(),
            winner = ?self.winner,
            "分派命令前的对局状态"
        );

        match command.kind {
            CommandKind::Start => self.start(command),
            CommandKind::Reset => self.reset(command),
            CommandKind::Play => self.play(command),
            CommandKind::Bot => self.bot_move(command, bot),
            CommandKind::Board => Ok(self.render()),
        }
    }

    /// START <X|O>
    fn start(&mut self, command: &Command) -> Result<Transition, GameError> {
        if self.is_started() {
            return reject(GameError::AlreadyStarted);
        }
        let Some(arg) = command.arg(0) else {
            return reject(GameError::MissingPiece);
        };
        let Some(piece) = Piece::from_char(arg) else {
            return reject(GameError::InvalidPiece { piece: arg });
        };

        self.human_piece = Some(piece);
        self.active_role = Some(PlayerRole::Human);
        info!(result = "pass", %piece, "对局开始");
        Ok(Transition::Applied)
    }

    /// RESET
    fn reset(&mut self, command: &Command) -> Result<Transition, GameError> {
        if !command.args.is_empty() || !self.is_started() {
            return reject(GameError::InvalidReset);
        }

        *self = Self::new();
        info!(result = "pass", "对局已重置");
        Ok(Transition::Applied)
    }

    /// PLAY <行> <列>
    fn play(&mut self, command: &Command) -> Result<Transition, GameError> {
        let Some(piece) = self.human_piece else {
            return reject(GameError::NotStarted);
        };
        if self.is_over() {
            return reject(GameError::AlreadyOver);
        }
        if self.active_role != Some(PlayerRole::Human) {
            return reject(GameError::NotPlayerTurn);
        }
        let (Some(row), Some(col)) = (command.arg(0), command.arg(1)) else {
            return reject(GameError::OutOfBounds);
        };
        let Some(pos) = Position::from_labels(row, col) else {
            return reject(GameError::OutOfBounds);
        };
        if !self.board.is_vacant(pos) {
            return reject(GameError::CannotPlace {
                row: pos.row + 1,
                col: pos.col + 1,
            });
        }

        // 落子即交出行棋权，玩家结束对局后 BOT 报告 GAME_OVER
        self.active_role = Some(PlayerRole::Bot);
        info!(result = "pass", %piece, %pos, "玩家落子");
        Ok(self.settle(pos, piece, PlayerRole::Human))
    }

    /// BOT
    fn bot_move(&mut self, command: &Command, bot: &mut RandomBot) -> Result<Transition, GameError> {
        if !command.args.is_empty() {
            return reject(GameError::InvalidBot);
        }
        let Some(piece) = self.bot_piece() else {
            return reject(GameError::NotStarted);
        };
        if self.active_role != Some(PlayerRole::Bot) {
            return reject(GameError::NotCpuTurn);
        }
        if self.is_over() {
            return reject(GameError::AlreadyOver);
        }
        // 未结束的对局必有空格
        let Some(pos) = bot.choose(&self.board) else {
            return reject(GameError::AlreadyOver);
        };

        info!(result = "pass", %piece, %pos, "机器人落子");
        Ok(self.settle(pos, piece, PlayerRole::Bot))
    }

    /// BOARD：无前置条件
    fn render(&self) -> Transition {
        match self.board.render() {
            Ok(text) => {
                debug!(result = "pass", "棋盘已渲染");
                Transition::Rendered(text)
            }
            Err(_) => {
                warn!("棋盘文本超出缓冲区容量");
                Transition::Applied
            }
        }
    }

    /// 在空格上落子并判定胜负，未结束时轮到对方
    fn settle(&mut self, pos: Position, piece: Piece, mover: PlayerRole) -> Transition {
        self.board.place(pos, piece);

        let outcome = match Rules::evaluate(&self.board, piece) {
            Verdict::Win => Outcome::Won(piece),
            Verdict::Draw => Outcome::Draw,
            Verdict::Ongoing => {
                self.active_role = Some(mover.opponent());
                return Transition::Applied;
            }
        };

        self.winner = Some(outcome);
        info!(result = "pass", ?mover, %outcome, "对局结束");
        Transition::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::StatusCode;

    /// 测试用对局：封装状态与机器人
    struct Session {
        state: GameState,
        bot: RandomBot,
    }

    impl Session {
        fn new() -> Self {
            Self {
                state: GameState::new(),
                bot: RandomBot::seeded(3),
            }
        }

        fn run(&mut self, line: &str) -> CommandResult {
            let command = match Command::parse(line.as_bytes()) {
                Ok(command) => command,
                Err(err) => return Err(err.into()),
            };
            let (next, result) = self.state.apply(&command, &mut self.bot);
            self.state = next;
            result
        }

        fn status(&mut self, line: &str) -> StatusCode {
            StatusCode::from(&self.run(line))
        }
    }

    #[test]
    fn test_start_and_play() {
        let mut s = Session::new();
        assert_eq!(s.status("START X"), StatusCode::Ok);
        assert_eq!(s.status("PLAY 1 1"), StatusCode::Ok);
        assert_eq!(s.state.board().get(Position::new_unchecked(0, 0)), Some(Piece::X));
        assert_eq!(s.state.active_role(), Some(PlayerRole::Bot));
        assert_eq!(s.state.active_piece(), Some(Piece::O));
    }

    #[test]
    fn test_start_checks() {
        let mut s = Session::new();
        assert_eq!(s.status("START"), StatusCode::MissingPiece);
        assert_eq!(s.status("START Z"), StatusCode::InvalidPiece);
        assert_eq!(s.status("START x"), StatusCode::InvalidPiece);
        assert!(!s.state.is_started());

        assert_eq!(s.status("START O"), StatusCode::Ok);
        assert_eq!(s.state.human_piece(), Some(Piece::O));
        assert_eq!(s.state.bot_piece(), Some(Piece::X));

        // 已开局时优先报告 GAME_STARTED
        assert_eq!(s.status("START"), StatusCode::GameStarted);
        assert_eq!(s.status("START X"), StatusCode::GameStarted);
    }

    #[test]
    fn test_play_before_start() {
        let mut s = Session::new();
        assert_eq!(s.status("PLAY 1 1"), StatusCode::GameNotStarted);
        assert_eq!(s.status("BOT"), StatusCode::GameNotStarted);
        assert_eq!(s.state, GameState::new());
    }

    #[test]
    fn test_not_player_turn() {
        let mut s = Session::new();
        s.status("START X");
        assert_eq!(s.status("PLAY 1 1"), StatusCode::Ok);
        assert_eq!(s.status("PLAY 1 2"), StatusCode::NotPlayerTurn);
        assert!(s.state.board().is_vacant(Position::new_unchecked(0, 1)));
    }

    #[test]
    fn test_not_cpu_turn() {
        let mut s = Session::new();
        s.status("START X");
        assert_eq!(s.status("BOT"), StatusCode::NotCpuTurn);
        assert_eq!(s.status("BOT 1"), StatusCode::InvalidBot);
    }

    #[test]
    fn test_out_of_bounds_leaves_board() {
        let mut s = Session::new();
        s.status("START X");
        for line in ["PLAY", "PLAY 1", "PLAY 0 1", "PLAY 1 4", "PLAY a b", "PLAY - 2"] {
            assert_eq!(s.status(line), StatusCode::OutOfBounds, "{}", line);
            assert_eq!(s.state.board(), &Board::empty());
            assert_eq!(s.state.active_role(), Some(PlayerRole::Human));
        }
    }

    #[test]
    fn test_cannot_place() {
        let mut s = Session::new();
        s.status("START X");
        s.status("PLAY 2 2");
        s.status("BOT");
        let result = s.run("PLAY 2 2");
        assert_eq!(
            result,
            Err(GameError::CannotPlace { row: 2, col: 2 }.into())
        );
    }

    #[test]
    fn test_reset() {
        let mut s = Session::new();
        assert_eq!(s.status("RESET"), StatusCode::InvalidReset);

        s.status("START O");
        s.status("PLAY 3 3");
        assert_eq!(s.status("RESET X"), StatusCode::InvalidReset);
        assert!(s.state.is_started());

        assert_eq!(s.status("RESET"), StatusCode::Ok);
        assert_eq!(s.state, GameState::new());
        assert_eq!(s.status("RESET"), StatusCode::InvalidReset);
        assert_eq!(s.state, GameState::new());
    }

    #[test]
    fn test_board_always_renders() {
        let mut s = Session::new();
        match s.run("BOARD") {
            Ok(Transition::Rendered(text)) => assert!(text.as_str().starts_with(". 1 2 3\n")),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(s.state, GameState::new());
    }

    #[test]
    fn test_diagonal_win_for_o() {
        // 手工布置：玩家执 O，机器人执 X 的棋子放在不影响对角线的位置
        let mut state = GameState::new();
        state.human_piece = Some(Piece::O);
        state.active_role = Some(PlayerRole::Human);
        for (pos, piece) in [
            ((0, 0), Piece::O),
            ((0, 1), Piece::X),
            ((1, 1), Piece::O),
            ((0, 2), Piece::X),
        ] {
            state.board.place(Position::new_unchecked(pos.0, pos.1), piece);
        }

        let mut bot = RandomBot::seeded(0);
        let command = Command::parse(b"PLAY 3 3").unwrap();
        let (state, result) = state.apply(&command, &mut bot);

        assert_eq!(result, Ok(Transition::Finished(Outcome::Won(Piece::O))));
        assert_eq!(state.winner(), Some(Outcome::Won(Piece::O)));
        assert!(state.is_over());

        // 终局后：PLAY 与 BOT 都报告 GAME_OVER（已结束）
        let (state, result) = state.apply(&command, &mut bot);
        assert_eq!(result, Err(GameError::AlreadyOver.into()));
        let (_, result) = state.apply(&Command::parse(b"BOT").unwrap(), &mut bot);
        assert_eq!(result, Err(GameError::AlreadyOver.into()));
    }

    #[test]
    fn test_bot_win_ends_game() {
        // O O _ / X X O / O X X ，玩家执 X，机器人执 O，只剩 (1,3) 可下
        let mut state = GameState::new();
        state.human_piece = Some(Piece::X);
        state.active_role = Some(PlayerRole::Bot);
        let layout = ["OO_", "XXO", "OXX"];
        for (r, row) in layout.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if let Some(piece) = Piece::from_char(ch) {
                    state.board.place(Position::new_unchecked(r as u8, c as u8), piece);
                }
            }
        }

        let mut bot = RandomBot::seeded(0);
        let (state, result) = state.apply(&Command::parse(b"BOT").unwrap(), &mut bot);
        assert_eq!(result, Ok(Transition::Finished(Outcome::Won(Piece::O))));
        assert_eq!(state.winner(), Some(Outcome::Won(Piece::O)));
        // 机器人结束对局后行棋权不再交还
        assert_eq!(state.active_role(), Some(PlayerRole::Bot));

        // 已结束优先于轮次检查
        let play = Command::parse(b"PLAY 1 3").unwrap();
        let (state, result) = state.apply(&play, &mut bot);
        assert_eq!(result, Err(GameError::AlreadyOver.into()));
        assert_eq!(StatusCode::from(&result), StatusCode::GameOver);

        let (state, result) = state.apply(&Command::parse(b"BOT").unwrap(), &mut bot);
        assert_eq!(result, Err(GameError::AlreadyOver.into()));

        let (state, result) = state.apply(&Command::parse(b"RESET").unwrap(), &mut bot);
        assert_eq!(result, Ok(Transition::Applied));
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_draw_on_last_cell() {
        // X O X / X O O / O X _ ，玩家执 X 落最后一格成和棋
        let mut state = GameState::new();
        state.human_piece = Some(Piece::X);
        state.active_role = Some(PlayerRole::Human);
        let layout = ["XOX", "XOO", "OX_"];
        for (r, row) in layout.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if let Some(piece) = Piece::from_char(ch) {
                    state.board.place(Position::new_unchecked(r as u8, c as u8), piece);
                }
            }
        }

        let mut bot = RandomBot::seeded(0);
        let (state, result) = state.apply(&Command::parse(b"PLAY 3 3").unwrap(), &mut bot);
        assert_eq!(result, Ok(Transition::Finished(Outcome::Draw)));
        assert_eq!(state.winner(), Some(Outcome::Draw));
    }

    #[test]
    fn test_full_games_keep_invariants() {
        for seed in 0..50 {
            let mut state = GameState::new();
            let mut bot = RandomBot::seeded(seed);
            let piece = if seed % 2 == 0 { "X" } else { "O" };
            let start = Command::parse(format!("START {}", piece).as_bytes()).unwrap();
            let (next, result) = state.apply(&start, &mut bot);
            assert_eq!(result, Ok(Transition::Applied));
            state = next;

            let mut moves = 0;
            while !state.is_over() {
                let (role, active) = (state.active_role(), state.active_piece());
                let command = match role {
                    Some(PlayerRole::Human) => {
                        let pos = state.board().vacant_positions()[0];
                        Command::parse(format!("PLAY {} {}", pos.row + 1, pos.col + 1).as_bytes())
                            .unwrap()
                    }
                    _ => Command::parse(b"BOT").unwrap(),
                };
                let before = state.board().vacant_count();
                let (next, result) = state.apply(&command, &mut bot);
                state = next;
                moves += 1;

                // 每次成功落子恰好填一个格子
                assert_eq!(state.board().vacant_count(), before - 1);
                match result {
                    Ok(Transition::Applied) => {
                        assert_eq!(state.active_role(), role.map(|r| r.opponent()));
                        assert_eq!(state.active_piece(), active.map(|p| p.opponent()));
                    }
                    Ok(Transition::Finished(outcome)) => {
                        assert_eq!(state.winner(), Some(outcome));
                    }
                    other => panic!("unexpected: {:?}", other),
                }
            }
            assert!(moves <= 9);
            assert_eq!(
                state.board().count(Piece::X) + state.board().count(Piece::O),
                moves
            );
        }
    }
}

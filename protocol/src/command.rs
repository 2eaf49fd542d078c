//! 文本命令的分词与识别
//!
//! 一条命令形如 `<命令字> [参数1] [参数2]`，以空格或换行分隔：
//! - 命令字最长 5 个字符
//! - 每个参数恰好 1 个字符
//! - 最多 2 个参数
//!
//! 参数个数与命令不符时只记录日志，不拒绝命令：由具体的处理函数
//! 给出最贴切的错误（例如 `PLAY 1` 报告越界而不是参数个数错误）。

use tracing::{debug, warn};

use crate::constants::{MAX_ARGS, MAX_ARG_LEN, MAX_COMMAND_WORD_LEN};
use crate::error::ParseError;

/// 分隔符
const DELIMITERS: [char; 2] = [' ', '\n'];

/// 分词结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    command: String,
    args: Vec<char>,
}

impl Tokens {
    /// 将原始输入拆分为命令字和至多两个单字符参数
    ///
    /// 输入在第一个 NUL 字节处结束，末尾的空白被忽略。
    pub fn tokenize(input: &[u8]) -> Result<Self, ParseError> {
        let end = input.iter().position(|&b| b == 0).unwrap_or(input.len());
        let input = &input[..end];
        if !input.is_ascii() {
            return Err(ParseError::NotText);
        }
        let line = std::str::from_utf8(input).map_err(|_| ParseError::NotText)?;

        let mut tokens = line
            .trim_end()
            .split(&DELIMITERS[..])
            .filter(|token| !token.is_empty());

        let command = tokens.next().ok_or(ParseError::Empty)?;
        if command.len() > MAX_COMMAND_WORD_LEN {
            return Err(ParseError::CommandTooLong {
                len: command.len(),
                max: MAX_COMMAND_WORD_LEN,
            });
        }

        let mut args = Vec::with_capacity(MAX_ARGS);
        for (index, token) in tokens.by_ref().take(MAX_ARGS).enumerate() {
            if token.len() > MAX_ARG_LEN {
                return Err(ParseError::ArgumentTooLong {
                    index: index + 1,
                    len: token.len(),
                    max: MAX_ARG_LEN,
                });
            }
            // 长度已校验为 1
            args.extend(token.chars());
        }

        if let Some(extra) = tokens.next() {
            return Err(ParseError::TooManyArguments {
                token: extra.to_string(),
            });
        }

        debug!(command, ?args, "命令分词完成");
        Ok(Self {
            command: command.to_string(),
            args,
        })
    }

    /// 命令字
    pub fn command(&self) -> &str {
        &self.command
    }

    /// 参数
    pub fn args(&self) -> &[char] {
        &self.args
    }

    /// 词元总数（含命令字）
    pub fn count(&self) -> usize {
        1 + self.args.len()
    }
}

/// 命令类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `START <X|O>`
    Start,
    /// `RESET`
    Reset,
    /// `PLAY <行> <列>`
    Play,
    /// `BOT`
    Bot,
    /// `BOARD`
    Board,
}

impl CommandKind {
    /// 所有命令
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Start,
        CommandKind::Reset,
        CommandKind::Play,
        CommandKind::Bot,
        CommandKind::Board,
    ];

    /// 命令字
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Start => "START",
            CommandKind::Reset => "RESET",
            CommandKind::Play => "PLAY",
            CommandKind::Bot => "BOT",
            CommandKind::Board => "BOARD",
        }
    }

    /// 期望的参数个数
    pub fn arity(&self) -> usize {
        match self {
            CommandKind::Start => 1,
            CommandKind::Play => 2,
            CommandKind::Reset | CommandKind::Bot | CommandKind::Board => 0,
        }
    }

    /// 按命令字精确匹配（区分大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 已识别的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub args: Vec<char>,
}

impl Command {
    /// 分词并识别命令
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        Self::from_tokens(Tokens::tokenize(input)?)
    }

    /// 从分词结果识别命令
    pub fn from_tokens(tokens: Tokens) -> Result<Self, ParseError> {
        let Some(kind) = CommandKind::from_name(tokens.command()) else {
            warn!(command = tokens.command(), "未知命令");
            return Err(ParseError::UnknownCommand(tokens.command));
        };

        let command = Self {
            kind,
            args: tokens.args,
        };
        if !command.arity_matches() {
            warn!(
                command = %kind,
                expected = kind.arity(),
                actual = command.args.len(),
                "参数个数不符，交由处理函数判定"
            );
        }
        Ok(command)
    }

    /// 参数个数是否与命令相符
    pub fn arity_matches(&self) -> bool {
        self.args.len() == self.kind.arity()
    }

    /// 第 `index` 个参数（0 起始）
    pub fn arg(&self, index: usize) -> Option<char> {
        self.args.get(index).copied()
    }
}

//! 字节流设备
//!
//! 对外只暴露写和读：写入一行命令，之后的读取返回该命令的状态名，
//! 若命令是 BOARD 则返回渲染好的棋盘。对局状态与状态缓冲区由同一把锁保护，
//! 每次写或读都在一个临界区内完成。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use protocol::{Command, CommandResult, StatusCode, TextBuffer, Transition, MAX_COMMAND_LEN};
use tictactoe_ai::RandomBot;
use tracing::{debug, info};

use crate::game::GameState;

/// 锁内的设备状态
struct DeviceInner {
    game: GameState,
    bot: RandomBot,
    /// 下一次读取的内容
    buffer: TextBuffer,
}

/// 井字棋设备
pub struct Device {
    name: String,
    inner: Mutex<DeviceInner>,
}

impl Device {
    /// 创建设备（对局处于未开局状态，缓冲区为空）
    pub fn new(name: impl Into<String>, bot: RandomBot) -> Self {
        let name = name.into();
        info!(device = %name, "设备已注册");
        Self {
            name,
            inner: Mutex::new(DeviceInner {
                game: GameState::new(),
                bot,
                buffer: TextBuffer::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 打开设备，得到一个读取位置从 0 开始的句柄
    pub fn open(self: &Arc<Self>) -> DeviceHandle {
        debug!(device = %self.name, "设备已打开");
        DeviceHandle {
            device: Arc::clone(self),
            position: 0,
        }
    }

    /// 每个临界区结束时状态都是一致的，锁中毒后可以继续使用
    fn lock(&self) -> MutexGuard<'_, DeviceInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 写入一条命令，返回消耗的字节数
    ///
    /// 超过 127 字节的部分被截断。解析或规则错误不会让写入失败，
    /// 而是体现在之后读到的状态名里。
    pub fn write(&self, data: &[u8]) -> usize {
        let consumed = data.len().min(MAX_COMMAND_LEN);
        if let Err(err) = self.execute(&data[..consumed]) {
            debug!(device = %self.name, error = %err, "命令未生效");
        }
        consumed
    }

    /// 执行一条命令并更新状态缓冲区，返回完整的结果
    pub fn execute(&self, line: &[u8]) -> CommandResult {
        let line = &line[..line.len().min(MAX_COMMAND_LEN)];
        let text = String::from_utf8_lossy(line);
        debug!(device = %self.name, line = %text.trim_end(), "收到命令");

        let mut guard = self.lock();
        let inner = &mut *guard;

        let result = match Command::parse(line) {
            Ok(command) => {
                let (next, result) = inner.game.apply(&command, &mut inner.bot);
                inner.game = next;
                result
            }
            Err(err) => Err(err.into()),
        };

        let code = StatusCode::from(&result);
        match &result {
            Ok(Transition::Rendered(board)) => inner.buffer = board.clone(),
            _ => inner.buffer.set(code.as_str()),
        }
        info!(device = %self.name, status = %code, "命令处理完成");

        result
    }

    /// 从 `offset` 起读取至多 `count` 字节
    pub fn read_at(&self, offset: usize, count: usize) -> Vec<u8> {
        self.lock().buffer.read_at(offset, count).to_vec()
    }

    /// 当前缓冲区内容
    pub fn output(&self) -> String {
        self.lock().buffer.as_str().to_string()
    }

    /// 对局状态快照
    pub fn snapshot(&self) -> GameState {
        self.lock().game.clone()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        info!(device = %self.name, "设备已注销");
    }
}

/// 打开的设备句柄，持有独立的读取位置
pub struct DeviceHandle {
    device: Arc<Device>,
    position: usize,
}

impl DeviceHandle {
    /// 写入一条命令（不移动读取位置）
    pub fn write(&mut self, data: &[u8]) -> usize {
        self.device.write(data)
    }

    /// 读取至多 `count` 字节并前移读取位置，读完后返回空
    pub fn read(&mut self, count: usize) -> Vec<u8> {
        let bytes = self.device.read_at(self.position, count);
        self.position += bytes.len();
        bytes
    }

    /// 设置读取位置
    pub fn seek(&mut self, offset: usize) -> usize {
        self.position = offset;
        self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 从当前位置读到末尾
    pub fn read_to_string(&mut self) -> String {
        let mut out = Vec::new();
        loop {
            let chunk = self.read(TextBuffer::CAPACITY);
            if chunk.is_empty() {
                break;
            }
            out.extend_from_slice(&chunk);
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        debug!(device = %self.device.name, "设备句柄已释放");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::{Piece, Position};

    fn device() -> Arc<Device> {
        Arc::new(Device::new("test", RandomBot::seeded(11)))
    }

    /// 模拟 `echo CMD > dev; cat dev`
    fn echo_cat(device: &Arc<Device>, line: &str) -> String {
        device.open().write(line.as_bytes());
        device.open().read_to_string()
    }

    #[test]
    fn test_initial_read_is_empty() {
        let device = device();
        assert!(device.open().read(64).is_empty());
    }

    #[test]
    fn test_status_after_write() {
        let device = device();
        assert_eq!(echo_cat(&device, "START X\n"), "OK");
        assert_eq!(echo_cat(&device, "START O\n"), "GAME_STARTED");
        assert_eq!(echo_cat(&device, "FOO\n"), "DEV_INVALID_COMMAND");
        assert_eq!(echo_cat(&device, "PLAY 1 1\n"), "OK");
        assert_eq!(echo_cat(&device, "PLAY 1 2\n"), "NOT_PLAYER_TURN");
    }

    #[test]
    fn test_rejected_write_still_consumes() {
        let device = device();
        let mut handle = device.open();
        assert_eq!(handle.write(b"BOT\n"), 4);
        assert_eq!(handle.read_to_string(), "GAME_NOT_STARTED");
        assert_eq!(device.snapshot(), GameState::new());

        assert_eq!(handle.write(b"NOPE\n"), 5);
        handle.seek(0);
        assert_eq!(handle.read_to_string(), "DEV_INVALID_COMMAND");
    }

    #[test]
    fn test_read_honors_offset_and_count() {
        let device = device();
        let mut handle = device.open();
        handle.write(b"PLAY 1 1\n");

        assert_eq!(handle.read(4), b"GAME");
        assert_eq!(handle.position(), 4);
        assert_eq!(handle.read(100), b"_NOT_STARTED");
        assert!(handle.read(100).is_empty());

        handle.seek(5);
        assert_eq!(handle.read(3), b"NOT");
    }

    #[test]
    fn test_board_then_status() {
        let device = device();
        echo_cat(&device, "START X\n");
        echo_cat(&device, "PLAY 2 2\n");

        let board = echo_cat(&device, "BOARD\n");
        assert_eq!(board, ". 1 2 3\n1 _ _ _\n2 _ X _\n3 _ _ _\n");

        // 同一次写入可以反复读取棋盘
        assert_eq!(device.open().read_to_string(), board);

        // 下一次写入后恢复为状态名
        assert_eq!(echo_cat(&device, "BOT\n"), "OK");
    }

    #[test]
    fn test_long_input_truncated() {
        let device = device();
        let mut line = b"START X".to_vec();
        line.extend(std::iter::repeat(b' ').take(200));
        line.extend_from_slice(b"EXTRA");

        assert_eq!(device.open().write(&line), MAX_COMMAND_LEN);
        // 截断后多余的词元被丢弃
        assert_eq!(device.output(), "OK");
        assert_eq!(device.snapshot().human_piece(), Some(Piece::X));
    }

    #[test]
    fn test_write_does_not_move_position() {
        let device = device();
        let mut handle = device.open();
        handle.write(b"BOARD");
        handle.read_to_string();
        let end = handle.position();

        handle.write(b"RESET");
        assert_eq!(handle.position(), end);
        assert!(handle.read(16).is_empty());
        handle.seek(0);
        assert_eq!(handle.read_to_string(), "INVALID_RESET");
    }

    #[test]
    fn test_concurrent_handles() {
        let device = device();
        echo_cat(&device, "START X\n");

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let device = Arc::clone(&device);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let mut handle = device.open();
                        handle.write(b"BOARD\n");
                        handle.write(b"BOT\n");
                        handle.write(b"PLAY 1 1\n");
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        // 无论如何交错，棋盘上两种棋子的数量相差不超过 1
        let state = device.snapshot();
        let x = state.board().count(Piece::X);
        let o = state.board().count(Piece::O);
        assert!(x == o || x == o + 1, "x={} o={}", x, o);
        assert!(state.board().get(Position::new_unchecked(0, 0)).is_some());
    }
}

//! 定长文本缓冲区
//!
//! 状态消息和棋盘文本都写入同一种容量固定的缓冲区，
//! 写入超出容量时返回 `fmt::Error`，已有内容保持不变。

use std::fmt;

use crate::constants::STATUS_BUFFER_SIZE;

/// 容量固定的文本缓冲区
#[derive(Clone, PartialEq, Eq, Default)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    /// 容量（字节）
    pub const CAPACITY: usize = STATUS_BUFFER_SIZE;

    /// 创建空缓冲区
    pub fn new() -> Self {
        Self {
            text: String::with_capacity(Self::CAPACITY),
        }
    }

    /// 用给定文本替换内容，超出容量的部分被截断
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        let mut end = text.len().min(Self::CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.text.push_str(&text[..end]);
    }

    /// 当前内容
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 当前内容（字节）
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// 已用字节数
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 剩余容量
    pub fn remaining(&self) -> usize {
        Self::CAPACITY - self.text.len()
    }

    /// 从 `offset` 起读取至多 `count` 字节，越过末尾时返回空切片
    pub fn read_at(&self, offset: usize, count: usize) -> &[u8] {
        let bytes = self.as_bytes();
        if offset >= bytes.len() {
            return &[];
        }
        let end = offset.saturating_add(count).min(bytes.len());
        &bytes[offset..end]
    }
}

impl fmt::Write for TextBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.len() > self.remaining() {
            return Err(fmt::Error);
        }
        self.text.push_str(s);
        Ok(())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextBuffer").field(&self.text).finish()
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

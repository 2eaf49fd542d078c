//! 传输层抽象
//!
//! 提供 Connector/Connection/Listener traits 使设备服务与具体传输实现解耦，
//! 以及带版本号和长度前缀的帧编解码。

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{ProtocolError, Result};
use crate::{CONNECT_TIMEOUT, DEFAULT_PORT, MAX_FRAME_SIZE, PROTOCOL_VERSION};

/// 设备服务地址
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
}

impl NetworkConfig {
    /// 监听/连接地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// 双向帧连接，设备服务与客户端都只依赖这个抽象
#[async_trait]
pub trait Connection: Send + Sync {
    /// 发送消息
    async fn send<M: Serialize + Send + Sync>(&mut self, msg: &M) -> Result<()>;

    /// 接收消息
    async fn recv<M: DeserializeOwned>(&mut self) -> Result<M>;

    /// 关闭连接
    async fn close(&mut self) -> Result<()>;

    /// 获取远端地址
    fn peer_addr(&self) -> Option<String>;
}

/// 主动建立连接（客户端）
#[async_trait]
pub trait Connector: Send + Sync {
    type Conn: Connection;

    /// 建立连接
    async fn connect(&self, addr: &str) -> Result<Self::Conn>;
}

/// 被动接受连接（设备服务）
#[async_trait]
pub trait Listener: Send + Sync + Sized {
    type Conn: Connection;

    /// 绑定地址
    async fn bind(addr: &str) -> Result<Self>;

    /// 接受连接
    async fn accept(&mut self) -> Result<Self::Conn>;

    /// 获取本地地址
    fn local_addr(&self) -> Option<String>;
}

// ============================================================================
// TCP 实现
// ============================================================================

/// 带连接超时的 TCP 连接器
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Conn = StreamConnection<TcpStream>;

    async fn connect(&self, addr: &str) -> Result<Self::Conn> {
        let stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
            .await
            .map_err(|_| ProtocolError::ConnectionTimeout)??;
        StreamConnection::from_tcp(stream)
    }
}

/// TCP 监听器
pub struct TcpListener {
    listener: tokio::net::TcpListener,
}

#[async_trait]
impl Listener for TcpListener {
    type Conn = StreamConnection<TcpStream>;

    async fn bind(addr: &str) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    async fn accept(&mut self) -> Result<Self::Conn> {
        let (stream, _addr) = self.listener.accept().await?;
        StreamConnection::from_tcp(stream)
    }

    fn local_addr(&self) -> Option<String> {
        self.listener.local_addr().ok().map(|a| a.to_string())
    }
}

/// TCP 上的帧连接
pub type TcpConnection = StreamConnection<TcpStream>;

/// 基于任意双向字节流的帧连接
pub struct StreamConnection<S> {
    reader: FrameReader<ReadHalf<S>>,
    writer: FrameWriter<WriteHalf<S>>,
    peer_addr: Option<String>,
}

impl StreamConnection<TcpStream> {
    /// 从 TcpStream 创建
    pub fn from_tcp(stream: TcpStream) -> Result<Self> {
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr().ok().map(|a| a.to_string());
        Ok(Self::new(stream, peer_addr))
    }
}

impl<S: AsyncRead + AsyncWrite + Send + Sync> StreamConnection<S> {
    /// 包装字节流
    pub fn new(stream: S, peer_addr: Option<String>) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: FrameReader::new(read_half),
            writer: FrameWriter::new(write_half),
            peer_addr,
        }
    }
}

#[async_trait]
impl<S: AsyncRead + AsyncWrite + Send + Sync + 'static> Connection for StreamConnection<S> {
    async fn send<M: Serialize + Send + Sync>(&mut self, msg: &M) -> Result<()> {
        self.writer.write_frame(msg).await
    }

    async fn recv<M: DeserializeOwned>(&mut self) -> Result<M> {
        self.reader.read_frame().await
    }

    async fn close(&mut self) -> Result<()> {
        self.writer.shutdown().await
    }

    fn peer_addr(&self) -> Option<String> {
        self.peer_addr.clone()
    }
}

// ============================================================================
// 帧格式: [版本 u8][负载长度 u32 大端][bincode 负载]
// ============================================================================

/// 帧头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameHeader {
    version: u8,
    length: usize,
}

impl FrameHeader {
    const SIZE: usize = 5;

    fn for_payload(length: usize) -> Result<Self> {
        check_length(length)?;
        Ok(Self {
            version: PROTOCOL_VERSION,
            length,
        })
    }

    fn encode(&self) -> [u8; Self::SIZE] {
        let mut bytes = [self.version, 0, 0, 0, 0];
        bytes[1..].copy_from_slice(&(self.length as u32).to_be_bytes());
        bytes
    }

    /// 解析并校验帧头
    fn decode(bytes: [u8; Self::SIZE]) -> Result<Self> {
        let [version, len @ ..] = bytes;
        if version != PROTOCOL_VERSION {
            return Err(ProtocolError::VersionMismatch {
                expected: PROTOCOL_VERSION,
                actual: version,
            });
        }
        let length = u32::from_be_bytes(len) as usize;
        check_length(length)?;
        Ok(Self { version, length })
    }
}

fn check_length(length: usize) -> Result<()> {
    if length > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: length,
            max: MAX_FRAME_SIZE,
        });
    }
    Ok(())
}

/// 对端在帧中途关闭视为连接关闭
fn closed_on_eof(e: std::io::Error) -> ProtocolError {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => ProtocolError::ConnectionClosed,
        _ => ProtocolError::Io(e),
    }
}

/// 从字节流中逐帧读取消息
pub struct FrameReader<R> {
    inner: R,
    payload: Vec<u8>,
}

impl<R: AsyncRead + Unpin + Send> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            payload: Vec::new(),
        }
    }

    /// 读取一帧并反序列化
    pub async fn read_frame<M: DeserializeOwned>(&mut self) -> Result<M> {
        let mut raw = [0u8; FrameHeader::SIZE];
        self.inner.read_exact(&mut raw).await.map_err(closed_on_eof)?;
        let header = FrameHeader::decode(raw)?;

        self.payload.resize(header.length, 0);
        self.inner
            .read_exact(&mut self.payload)
            .await
            .map_err(closed_on_eof)?;
        Ok(bincode::deserialize(&self.payload)?)
    }
}

/// 向字节流逐帧写入消息
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin + Send> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// 序列化并写入一帧，帧头与负载一次写出
    pub async fn write_frame<M: Serialize>(&mut self, msg: &M) -> Result<()> {
        let payload = bincode::serialize(msg)?;
        let header = FrameHeader::for_payload(payload.len())?;

        let mut frame = Vec::with_capacity(FrameHeader::SIZE + payload.len());
        frame.extend_from_slice(&header.encode());
        frame.extend_from_slice(&payload);

        self.inner.write_all(&frame).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// 关闭写端，对端随后读到 EOF
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.shutdown().await?;
        Ok(())
    }
}

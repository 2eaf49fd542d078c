//! 设备客户端

use protocol::{
    Connection, Connector, DeviceRequest, DeviceResponse, ProtocolError, Result, TcpConnection,
    TcpConnector, TextBuffer,
};

/// 远程设备客户端，等价于持有一个打开的设备句柄
pub struct DeviceClient<C: Connection> {
    conn: C,
}

impl DeviceClient<TcpConnection> {
    /// 连接设备服务
    pub async fn connect(addr: &str) -> Result<Self> {
        let conn = TcpConnector.connect(addr).await?;
        Ok(Self::new(conn))
    }
}

impl<C: Connection> DeviceClient<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn request(&mut self, request: DeviceRequest) -> Result<DeviceResponse> {
        self.conn.send(&request).await?;
        let response: DeviceResponse = self.conn.recv().await?;
        match response {
            DeviceResponse::Error { message } => Err(ProtocolError::Device(message)),
            response => Ok(response),
        }
    }

    /// 写入数据，返回设备消耗的字节数
    pub async fn write(&mut self, data: &[u8]) -> Result<usize> {
        match self.request(DeviceRequest::Write { data: data.to_vec() }).await? {
            DeviceResponse::Written { count } => Ok(count),
            other => Err(ProtocolError::UnexpectedResponse(other.kind().to_string())),
        }
    }

    /// 从当前读取位置读取至多 `count` 字节
    pub async fn read(&mut self, count: usize) -> Result<Vec<u8>> {
        match self.request(DeviceRequest::Read { count }).await? {
            DeviceResponse::Data { bytes } => Ok(bytes),
            other => Err(ProtocolError::UnexpectedResponse(other.kind().to_string())),
        }
    }

    /// 设置读取位置
    pub async fn seek(&mut self, offset: usize) -> Result<usize> {
        match self.request(DeviceRequest::Seek { offset }).await? {
            DeviceResponse::Seeked { offset } => Ok(offset),
            other => Err(ProtocolError::UnexpectedResponse(other.kind().to_string())),
        }
    }

    /// 心跳
    pub async fn ping(&mut self) -> Result<()> {
        match self.request(DeviceRequest::Ping).await? {
            DeviceResponse::Pong => Ok(()),
            other => Err(ProtocolError::UnexpectedResponse(other.kind().to_string())),
        }
    }

    /// 从头读到末尾
    pub async fn read_all(&mut self) -> Result<Vec<u8>> {
        self.seek(0).await?;
        let mut out = Vec::new();
        loop {
            let chunk = self.read(TextBuffer::CAPACITY).await?;
            if chunk.is_empty() {
                return Ok(out);
            }
            out.extend_from_slice(&chunk);
        }
    }

    /// 发送一条命令并读取结果
    pub async fn command(&mut self, line: &str) -> Result<String> {
        let mut data = line.as_bytes().to_vec();
        if !line.ends_with('\n') {
            data.push(b'\n');
        }
        self.write(&data).await?;
        let output = self.read_all().await?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// 关闭连接
    pub async fn close(mut self) -> Result<()> {
        self.conn.close().await
    }
}

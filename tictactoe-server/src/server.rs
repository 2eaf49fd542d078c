//! 设备服务
//!
//! 每个连接对应一个打开的设备句柄，在独立任务中处理；
//! 所有连接共享同一个设备。

use std::future::Future;
use std::sync::Arc;

use protocol::{
    Connection, DeviceRequest, DeviceResponse, Listener, ProtocolError, TcpListener,
    MAX_CONNECTIONS,
};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::device::{Device, DeviceHandle};

/// 处理一条设备请求
pub fn handle_request(handle: &mut DeviceHandle, request: DeviceRequest) -> DeviceResponse {
    match request {
        DeviceRequest::Write { data } => DeviceResponse::Written {
            count: handle.write(&data),
        },
        DeviceRequest::Read { count } => DeviceResponse::Data {
            bytes: handle.read(count),
        },
        DeviceRequest::Seek { offset } => DeviceResponse::Seeked {
            offset: handle.seek(offset),
        },
        DeviceRequest::Ping => DeviceResponse::Pong,
    }
}

/// 在一个连接上持续处理请求，直到对端关闭
pub async fn serve_connection<C: Connection>(
    mut conn: C,
    mut handle: DeviceHandle,
) -> protocol::Result<()> {
    loop {
        let request: DeviceRequest = match conn.recv().await {
            Ok(request) => request,
            Err(ProtocolError::ConnectionClosed) => return Ok(()),
            Err(ProtocolError::Bincode(e)) => {
                // 无法解码的请求只影响本条
                warn!("无法解码请求: {}", e);
                conn.send(&DeviceResponse::Error {
                    message: format!("malformed request: {}", e),
                })
                .await?;
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!(?request, "收到设备请求");
        let response = handle_request(&mut handle, request);
        conn.send(&response).await?;
    }
}

/// 设备服务器
pub struct DeviceServer<L: Listener> {
    listener: L,
    device: Arc<Device>,
    sessions: Arc<Semaphore>,
}

impl DeviceServer<TcpListener> {
    /// 绑定 TCP 地址
    pub async fn bind(addr: &str, device: Arc<Device>) -> protocol::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::new(listener, device))
    }
}

impl<L: Listener> DeviceServer<L>
where
    L::Conn: 'static,
{
    pub fn new(listener: L, device: Arc<Device>) -> Self {
        Self {
            listener,
            device,
            sessions: Arc::new(Semaphore::new(MAX_CONNECTIONS)),
        }
    }

    pub fn local_addr(&self) -> Option<String> {
        self.listener.local_addr()
    }

    /// 运行直到 `shutdown` 完成
    pub async fn run_until<F: Future<Output = ()>>(mut self, shutdown: F) {
        info!(
            device = %self.device.name(),
            addr = ?self.local_addr(),
            "设备服务已启动"
        );
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("设备服务正在关闭");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => self.spawn_session(conn),
                    Err(e) => error!("接受连接失败: {}", e),
                },
            }
        }
    }

    fn spawn_session(&self, conn: L::Conn) {
        let peer = conn.peer_addr();
        let Ok(permit) = Arc::clone(&self.sessions).try_acquire_owned() else {
            warn!(?peer, max = MAX_CONNECTIONS, "连接数已满，拒绝连接");
            return;
        };

        let handle = self.device.open();
        info!(?peer, "客户端已连接");
        tokio::spawn(async move {
            match serve_connection(conn, handle).await {
                Ok(()) => info!(?peer, "客户端已断开"),
                Err(e) => warn!(?peer, "连接异常断开: {}", e),
            }
            drop(permit);
        });
    }
}

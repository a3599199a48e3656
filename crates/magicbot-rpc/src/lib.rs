//! MagicBot RPC 传输抽象层
//!
//! 本 crate 定义机器人本体与上位机之间的请求/应答与遥测流模型：
//!
//! - [`Request`] / [`Response`]: 控制通道上的请求与应答消息
//! - [`TelemetryEvent`] / [`StreamKind`]: 遥测通道上的推送事件
//! - [`Transport`]: 传输层 trait，真实后端与 Mock 后端都实现它
//! - `MockTransport`: 进程内模拟后端（`mock` feature 下的 `mock` 模块）
//!
//! # 设计
//!
//! 控制通道是同步的请求/应答（每次 `call` 带超时）；遥测通道是有界
//! 的 crossbeam 通道，后端通过 `try_send` 推送，队列满时丢弃最新事件
//! 并累计丢弃计数，绝不阻塞数据源。
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use magicbot_rpc::{Request, Response, Transport};
//! use std::time::Duration;
//!
//! fn volume(transport: &dyn Transport) -> Result<i32, magicbot_rpc::RpcError> {
//!     match transport.call(Request::GetVolume, Duration::from_millis(500))? {
//!         Response::Volume(v) => Ok(v),
//!         other => Err(magicbot_rpc::RpcError::UnexpectedResponse {
//!             request: "GetVolume",
//!             actual: other.name(),
//!         }),
//!     }
//! }
//! ```

pub mod message;
pub mod stream;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::MockTransport;

pub use message::{Request, Response};
pub use stream::{StreamKind, TelemetryEvent};

use crossbeam_channel::Receiver;
use magicbot_types::Status;
use std::net::IpAddr;
use std::time::Duration;

/// RPC 传输层错误
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// 未连接（`connect` 尚未调用或已断开）
    #[error("Transport not connected")]
    NotConnected,

    /// 请求在超时时间内未得到应答
    #[error("Request timed out")]
    Timeout,

    /// 遥测通道已关闭
    #[error("Telemetry channel closed")]
    ChannelClosed,

    /// 后端拒绝了请求（携带后端返回的状态）
    #[error("Request rejected: {0}")]
    Rejected(Status),

    /// 应答类型与请求不匹配
    #[error("Unexpected response for {request}: got {actual}")]
    UnexpectedResponse {
        /// 请求名（见 [`Request::name`]）
        request: &'static str,
        /// 实际收到的应答名（见 [`Response::name`]）
        actual: &'static str,
    },
}

/// 传输层 trait
///
/// 抽象上位机到机器人的双通道链路：
///
/// - **控制通道**: [`call`](Transport::call) 同步发送请求并等待应答
/// - **遥测通道**: [`telemetry`](Transport::telemetry) 返回事件接收端
///
/// 实现必须线程安全：多个控制器会并发调用 `call`，遥测分发线程
/// 同时消费 `telemetry` 接收端。
///
/// # 连接生命周期
///
/// `connect` 建立链路并创建新的遥测通道；`disconnect` 关闭链路并
/// 丢弃遥测发送端，使所有接收端自然耗尽后返回 `Disconnected`。
/// 断开后允许再次 `connect`（重连语义）。
pub trait Transport: Send + Sync {
    /// 建立到机器人的连接
    ///
    /// `local_ip` 为上位机本地网卡地址（机器人只接受来自配对网段的
    /// 连接）。超过 `timeout` 未完成握手返回 [`RpcError::Timeout`]。
    fn connect(&self, local_ip: IpAddr, timeout: Duration) -> Result<(), RpcError>;

    /// 断开连接
    ///
    /// 幂等：对未连接的传输层调用返回 `Ok(())`。
    fn disconnect(&self) -> Result<(), RpcError>;

    /// 当前是否已连接
    fn is_connected(&self) -> bool;

    /// 发送请求并等待应答
    ///
    /// 未连接时返回 [`RpcError::NotConnected`]；超时返回
    /// [`RpcError::Timeout`]；后端拒绝返回 [`RpcError::Rejected`]。
    fn call(&self, request: Request, timeout: Duration) -> Result<Response, RpcError>;

    /// 获取遥测事件接收端
    ///
    /// 返回有界 crossbeam 通道的接收端。连接断开后通道耗尽即关闭，
    /// 消费线程据此退出。未连接时返回一个已关闭的接收端。
    fn telemetry(&self) -> Receiver<TelemetryEvent>;
}

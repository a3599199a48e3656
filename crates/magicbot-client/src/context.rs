//! 门面与控制器共享的内部上下文

use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use magicbot_rpc::{Request, Response, RpcError, Transport};
use parking_lot::Mutex;

use crate::error::ClientError;
use crate::stats::DispatchStats;
use crate::subscription::TelemetryRouter;

/// 客户端共享状态
///
/// 门面持有 `Arc<RobotContext>`，六个控制器各持一份克隆。同步调用的默认
/// 超时用原子毫秒数存储，`set_timeout` 对后续调用即时生效。
pub(crate) struct RobotContext {
    pub(crate) transport: Arc<dyn Transport>,
    timeout_ms: AtomicU64,
    initialized: AtomicBool,
    connected: AtomicBool,
    local_ip: Mutex<Option<IpAddr>>,
    pub(crate) router: Arc<TelemetryRouter>,
    pub(crate) stats: Arc<DispatchStats>,
}

impl RobotContext {
    pub(crate) fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self {
            transport,
            timeout_ms: AtomicU64::new(timeout.as_millis() as u64),
            initialized: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            local_ip: Mutex::new(None),
            router: Arc::new(TelemetryRouter::new()),
            stats: Arc::new(DispatchStats::new()),
        }
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.load(Ordering::Relaxed))
    }

    pub(crate) fn set_timeout(&self, timeout: Duration) {
        self.timeout_ms
            .store(timeout.as_millis() as u64, Ordering::Relaxed);
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// 标记已初始化，返回之前是否已经初始化过
    pub(crate) fn mark_initialized(&self) -> bool {
        self.initialized.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn clear_initialized(&self) {
        self.initialized.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub(crate) fn set_local_ip(&self, addr: Option<IpAddr>) {
        *self.local_ip.lock() = addr;
    }

    pub(crate) fn local_ip(&self) -> Option<IpAddr> {
        *self.local_ip.lock()
    }

    /// 按给定超时发起同步调用
    ///
    /// 传输层错误经 `From` 上抛，`Rejected` 展开为 [`ClientError::Rejected`]。
    pub(crate) fn call(&self, request: Request, timeout: Duration) -> Result<Response, ClientError> {
        Ok(self.transport.call(request, timeout)?)
    }

    /// 发起调用并要求 `Ack` 响应
    pub(crate) fn expect_ack(&self, request: Request, timeout: Duration) -> Result<(), ClientError> {
        let name = request.name();
        match self.call(request, timeout)? {
            Response::Ack => Ok(()),
            other => Err(unexpected(name, &other)),
        }
    }
}

/// 响应类型与请求不匹配
pub(crate) fn unexpected(request: &'static str, actual: &Response) -> ClientError {
    ClientError::Rpc(RpcError::UnexpectedResponse {
        request,
        actual: actual.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicbot_rpc::MockTransport;
    use magicbot_types::ErrorCode;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn connected_ctx() -> (RobotContext, MockTransport) {
        let mock = MockTransport::new();
        mock.connect("192.168.54.111".parse().unwrap(), TIMEOUT)
            .unwrap();
        let ctx = RobotContext::new(Arc::new(mock.clone()), TIMEOUT);
        (ctx, mock)
    }

    #[test]
    fn test_call_before_connect_is_not_connected() {
        let ctx = RobotContext::new(Arc::new(MockTransport::new()), TIMEOUT);
        let err = ctx.call(Request::GetVolume, TIMEOUT).unwrap_err();
        assert_eq!(err, ClientError::Rpc(RpcError::NotConnected));
        assert_eq!(err.code(), ErrorCode::ServiceNotReady);
    }

    #[test]
    fn test_expect_ack_on_ack_response() {
        let (ctx, _mock) = connected_ctx();
        ctx.expect_ack(Request::SetVolume(40), TIMEOUT).unwrap();
    }

    #[test]
    fn test_rejected_call_is_flattened() {
        let (ctx, _mock) = connected_ctx();
        let err = ctx.expect_ack(Request::SetVolume(500), TIMEOUT).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Rejected {
                code: ErrorCode::ServiceError,
                ..
            }
        ));
    }

    #[test]
    fn test_unexpected_names_both_sides() {
        let err = unexpected("GetVolume", &Response::Ack);
        assert_eq!(
            err.to_string(),
            "Unexpected response for GetVolume: got Ack"
        );
    }

    #[test]
    fn test_timeout_is_adjustable() {
        let ctx = RobotContext::new(Arc::new(MockTransport::new()), TIMEOUT);
        assert_eq!(ctx.timeout(), TIMEOUT);
        ctx.set_timeout(Duration::from_secs(1));
        assert_eq!(ctx.timeout(), Duration::from_secs(1));
    }
}

//! 机器人构造器

use std::sync::Arc;

use magicbot_rpc::Transport;

use crate::config::RobotConfig;
use crate::error::ClientError;
use crate::robot::MagicRobot;

/// [`MagicRobot`] 的链式构造器
///
/// ```no_run
/// use magicbot_client::RobotBuilder;
/// # use std::sync::Arc;
/// # fn transport() -> Arc<dyn magicbot_rpc::Transport> { unimplemented!() }
/// let robot = RobotBuilder::new()
///     .transport(transport())
///     .timeout_ms(3000)
///     .build()
///     .unwrap();
/// ```
#[derive(Default)]
pub struct RobotBuilder {
    transport: Option<Arc<dyn Transport>>,
    config: RobotConfig,
}

impl RobotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定传输层实现
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// 整体替换配置
    pub fn config(mut self, config: RobotConfig) -> Self {
        self.config = config;
        self
    }

    /// 覆盖配置中的本机 IP
    pub fn local_ip(mut self, local_ip: impl Into<String>) -> Self {
        self.config.local_ip = local_ip.into();
        self
    }

    /// 覆盖默认调用超时（毫秒）
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// 覆盖遥测通道容量
    ///
    /// 只在构造器自建传输层（如 [`build_mock`](Self::build_mock)）时生效；
    /// 外部传入的传输层自带容量。
    pub fn telemetry_capacity(mut self, capacity: usize) -> Self {
        self.config.telemetry_capacity = capacity;
        self
    }

    /// 用外部传输层构造机器人
    pub fn build(self) -> Result<MagicRobot, ClientError> {
        let transport = self
            .transport
            .ok_or_else(|| ClientError::InvalidArgument("transport is required".to_string()))?;
        Ok(MagicRobot::with_transport(transport, self.config))
    }

    /// 构造机器人并配套一个进程内模拟传输层
    ///
    /// 返回的 [`MockTransport`](magicbot_rpc::MockTransport) 句柄与机器人
    /// 共享同一后端，用于测试中注入遥测、检查命令落点。
    #[cfg(any(test, feature = "mock"))]
    pub fn build_mock(self) -> (MagicRobot, magicbot_rpc::MockTransport) {
        let mock = magicbot_rpc::MockTransport::with_capacity(self.config.telemetry_capacity);
        let robot = MagicRobot::with_transport(Arc::new(mock.clone()), self.config);
        (robot, mock)
    }
}

//! 机器人门面
//!
//! [`MagicRobot`] 聚合六个控制器并管理连接生命周期。连接时在传输层的
//! 遥测接收端上启动分发线程；断开时传输层丢弃发送端，线程排空余量后
//! 自行退出，随后被 join。所有方法都取 `&self`，可跨线程共享。

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use magicbot_rpc::{Request, Response, TelemetryEvent};
use magicbot_types::ControllerLevel;
use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::context::{RobotContext, unexpected};
use crate::controllers::{
    AudioController, HighLevelMotionController, LowLevelMotionController, SensorController,
    SlamNavController, StateMonitorController,
};
use crate::error::ClientError;
use crate::stats::{DispatchStats, DispatchStatsSnapshot};
use crate::subscription::TelemetryRouter;

/// 等待分发线程退出的时间预算
const DISPATCH_JOIN_BUDGET: Duration = Duration::from_secs(2);

/// MagicBot Z1 客户端门面
///
/// 通过 [`RobotBuilder`](crate::builder::RobotBuilder) 构造。使用顺序：
/// `initialize` → `connect` → 各控制器操作 → `disconnect` / `shutdown`。
/// `shutdown` 之后可以重新 `initialize`。
pub struct MagicRobot {
    ctx: Arc<RobotContext>,
    audio: AudioController,
    high_level_motion: HighLevelMotionController,
    low_level_motion: LowLevelMotionController,
    sensor: SensorController,
    slam_nav: SlamNavController,
    state_monitor: StateMonitorController,
    default_local_ip: String,
    dispatch: Mutex<Option<JoinHandle<()>>>,
}

impl MagicRobot {
    pub(crate) fn with_transport(
        transport: Arc<dyn magicbot_rpc::Transport>,
        config: crate::config::RobotConfig,
    ) -> Self {
        let ctx = Arc::new(RobotContext::new(transport, config.timeout()));
        Self {
            audio: AudioController::new(ctx.clone()),
            high_level_motion: HighLevelMotionController::new(ctx.clone()),
            low_level_motion: LowLevelMotionController::new(ctx.clone()),
            sensor: SensorController::new(ctx.clone()),
            slam_nav: SlamNavController::new(ctx.clone()),
            state_monitor: StateMonitorController::new(ctx.clone()),
            default_local_ip: config.local_ip,
            ctx,
            dispatch: Mutex::new(None),
        }
    }

    /// 绑定本机地址并武装全部控制器
    ///
    /// 地址非法或重复初始化返回 `false` 并记录错误日志。
    pub fn initialize(&self, local_ip: &str) -> bool {
        let addr: IpAddr = match local_ip.parse() {
            Ok(addr) => addr,
            Err(err) => {
                error!(local_ip, %err, "invalid local ip");
                return false;
            }
        };
        if self.ctx.mark_initialized() {
            error!("robot already initialized");
            return false;
        }
        self.ctx.set_local_ip(Some(addr));
        self.audio.initialize();
        self.high_level_motion.initialize();
        self.low_level_motion.initialize();
        self.sensor.initialize();
        self.slam_nav.initialize();
        self.state_monitor.initialize();
        info!(%addr, "robot initialized");
        true
    }

    /// 以配置文件中的 `local_ip` 初始化
    pub fn initialize_from_config(&self) -> bool {
        let local_ip = self.default_local_ip.clone();
        self.initialize(&local_ip)
    }

    /// 连接机器人并启动遥测分发线程
    ///
    /// 连接成功后控制级别统一复位为 `HighLevel`。复位失败时回滚连接并
    /// 返回错误。
    pub fn connect(&self) -> Result<(), ClientError> {
        if !self.ctx.is_initialized() {
            return Err(ClientError::NotInitialized);
        }
        if self.ctx.is_connected() {
            return Err(ClientError::AlreadyConnected);
        }
        let addr = self.ctx.local_ip().ok_or(ClientError::NotInitialized)?;
        let timeout = self.ctx.timeout();
        self.ctx.transport.connect(addr, timeout)?;

        let receiver = self.ctx.transport.telemetry();
        let router = self.ctx.router.clone();
        let stats = self.ctx.stats.clone();
        let handle = thread::spawn(move || dispatch_loop(receiver, router, stats));
        *self.dispatch.lock() = Some(handle);

        if let Err(err) = self.ctx.expect_ack(
            Request::SetMotionControlLevel(ControllerLevel::HighLevel),
            timeout,
        ) {
            warn!(%err, "control level reset failed, rolling back connection");
            let _ = self.ctx.transport.disconnect();
            self.join_dispatch();
            return Err(err);
        }

        self.ctx.set_connected(true);
        info!(%addr, "robot connected");
        Ok(())
    }

    /// 断开连接并回收分发线程，重复调用是空操作
    pub fn disconnect(&self) -> Result<(), ClientError> {
        if !self.ctx.is_connected() {
            return Ok(());
        }
        self.ctx.transport.disconnect()?;
        self.join_dispatch();
        self.ctx.set_connected(false);
        info!("robot disconnected");
        Ok(())
    }

    /// 完整收尾：断开连接、停用全部控制器、清空订阅
    ///
    /// 可以多次调用，也可以在部分初始化后调用。之后允许重新
    /// `initialize`。
    pub fn shutdown(&self) {
        if let Err(err) = self.disconnect() {
            warn!(%err, "disconnect during shutdown failed");
        }
        self.audio.shutdown();
        self.high_level_motion.shutdown();
        self.low_level_motion.shutdown();
        self.sensor.shutdown();
        self.slam_nav.shutdown();
        self.state_monitor.shutdown();
        self.ctx.set_local_ip(None);
        self.ctx.clear_initialized();
        info!("robot shut down");
    }

    /// 是否已初始化
    pub fn is_initialized(&self) -> bool {
        self.ctx.is_initialized()
    }

    /// 是否已连接
    pub fn is_connected(&self) -> bool {
        self.ctx.is_connected()
    }

    /// 调整后续同步调用的默认超时
    pub fn set_timeout(&self, timeout: Duration) {
        self.ctx.set_timeout(timeout);
    }

    /// SDK 版本号
    pub fn sdk_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// 查询当前控制授权级别
    pub fn motion_control_level(&self) -> Result<ControllerLevel, ClientError> {
        match self
            .ctx
            .call(Request::GetMotionControlLevel, self.ctx.timeout())?
        {
            Response::MotionControlLevel(level) => Ok(level),
            other => Err(unexpected("GetMotionControlLevel", &other)),
        }
    }

    /// 切换控制授权级别
    ///
    /// 前置条件：调用方先停掉当前级别的命令流。客户端不栅栏在途发布，
    /// 切换后发往非活动级别的命令由后端拒绝，不排队。
    pub fn set_motion_control_level(&self, level: ControllerLevel) -> Result<(), ClientError> {
        self.ctx.expect_ack(
            Request::SetMotionControlLevel(level),
            self.ctx.timeout(),
        )
    }

    /// 音频控制器
    pub fn audio(&self) -> &AudioController {
        &self.audio
    }

    /// 高层运动控制器
    pub fn high_level_motion(&self) -> &HighLevelMotionController {
        &self.high_level_motion
    }

    /// 低层运动控制器
    pub fn low_level_motion(&self) -> &LowLevelMotionController {
        &self.low_level_motion
    }

    /// 传感器控制器
    pub fn sensor(&self) -> &SensorController {
        &self.sensor
    }

    /// SLAM / 导航控制器
    pub fn slam_nav(&self) -> &SlamNavController {
        &self.slam_nav
    }

    /// 状态监控控制器
    pub fn state_monitor(&self) -> &StateMonitorController {
        &self.state_monitor
    }

    /// 遥测分发统计快照
    pub fn telemetry_stats(&self) -> DispatchStatsSnapshot {
        self.ctx.stats.snapshot()
    }

    /// 等待分发线程自行退出后 join
    ///
    /// 线程在遥测通道关闭后退出；超出预算仍未退出时放弃 join 并告警，
    /// 不阻塞调用方。
    fn join_dispatch(&self) {
        let handle = self.dispatch.lock().take();
        let Some(handle) = handle else {
            return;
        };
        let deadline = Instant::now() + DISPATCH_JOIN_BUDGET;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        if handle.is_finished() {
            if handle.join().is_err() {
                error!("telemetry dispatch thread panicked");
            }
        } else {
            warn!("telemetry dispatch thread did not exit in time");
        }
    }
}

impl fmt::Debug for MagicRobot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagicRobot")
            .field("initialized", &self.is_initialized())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Drop for MagicRobot {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// 遥测分发主循环
///
/// 逐条取事件并路由到订阅槽；通道关闭（传输断开）时退出。
fn dispatch_loop(
    receiver: Receiver<TelemetryEvent>,
    router: Arc<TelemetryRouter>,
    stats: Arc<DispatchStats>,
) {
    debug!("telemetry dispatch thread started");
    loop {
        match receiver.recv() {
            Ok(event) => {
                let kind = event.kind();
                if router.dispatch(event) {
                    stats.delivered.fetch_add(1, Ordering::Relaxed);
                } else {
                    stats.unhandled.fetch_add(1, Ordering::Relaxed);
                    trace!(?kind, "telemetry event without subscriber");
                }
            }
            Err(_) => {
                debug!("telemetry channel closed, dispatch thread exiting");
                break;
            }
        }
    }
}

//! Mock 传输层（无机器人硬件）
//!
//! [`MockTransport`] 在进程内模拟机器人后端：
//!
//! - 连接门控：未 `connect` 时所有 `call` 返回 `NotConnected`
//! - 人工延迟：`set_latency` 超过调用超时则返回 `Timeout`
//! - 故障注入：`inject_failure` 使下一次调用返回指定错误（一次性）
//! - 行为模型：音量/TTS 队列、控制级别权限、步态与特技前置条件、
//!   建图/定位/导航状态机、地图存储（断连后保留，对应真机磁盘）
//! - 遥测：`connect` 时创建有界通道，`emit` 经 `try_send` 推送，
//!   队列满丢弃最新事件并累计 [`dropped_events`](MockTransport::dropped_events)
//!
//! 用于客户端单元测试、集成测试与离线开发。

mod audio;
mod motion;
mod slam;

use crate::{Request, Response, RpcError, StreamKind, TelemetryEvent, Transport};
use audio::AudioModel;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use magicbot_types::{
    BmsData, BodyPart, ErrorCode, Fault, HandCommand, JointCommand, JoystickCommand, RobotState,
    Status, TtsCommand, TtsPriority,
};
use motion::MotionModel;
use parking_lot::Mutex;
use slam::SlamNavModel;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 默认遥测通道容量
pub const DEFAULT_TELEMETRY_CAPACITY: usize = 1024;

/// 构造后端拒绝错误
pub(crate) fn rejected(message: impl Into<String>) -> RpcError {
    RpcError::Rejected(Status::new(ErrorCode::ServiceError, message))
}

/// 各遥测流组的开关状态
///
/// 关节状态、灵巧手状态与躯干 IMU 不设开关，连接后常开。
#[derive(Debug, Default)]
struct StreamGates {
    audio: bool,
    wakeup: bool,
    lidar: bool,
    head_rgbd: bool,
    binocular: bool,
    odometry: bool,
}

struct MockState {
    connected: bool,
    local_ip: Option<IpAddr>,
    latency: Duration,
    inject: Option<RpcError>,
    capacity: usize,
    telemetry_tx: Option<Sender<TelemetryEvent>>,
    telemetry_rx: Option<Receiver<TelemetryEvent>>,
    gates: StreamGates,
    audio: AudioModel,
    motion: MotionModel,
    slam_nav: SlamNavModel,
    robot: RobotState,
}

impl MockState {
    fn new(capacity: usize) -> Self {
        Self {
            connected: false,
            local_ip: None,
            latency: Duration::ZERO,
            inject: None,
            capacity,
            telemetry_tx: None,
            telemetry_rx: None,
            gates: StreamGates::default(),
            audio: AudioModel::default(),
            motion: MotionModel::default(),
            slam_nav: SlamNavModel::default(),
            robot: RobotState::default(),
        }
    }

    fn stream_enabled(&self, kind: StreamKind) -> bool {
        match kind {
            StreamKind::OriginAudio | StreamKind::BfAudio => self.gates.audio,
            StreamKind::WakeupStatus => self.gates.wakeup,
            StreamKind::LidarImu | StreamKind::LidarPointCloud => self.gates.lidar,
            StreamKind::HeadRgbdColorImage
            | StreamKind::HeadRgbdDepthImage
            | StreamKind::HeadRgbdCameraInfo => self.gates.head_rgbd,
            StreamKind::BinocularImage | StreamKind::BinocularCameraInfo => self.gates.binocular,
            StreamKind::Odometry => self.gates.odometry,
            StreamKind::ArmJointState
            | StreamKind::LegJointState
            | StreamKind::HeadJointState
            | StreamKind::WaistJointState
            | StreamKind::HandState
            | StreamKind::BodyImu => true,
        }
    }

    fn handle(&mut self, request: Request) -> Result<Response, RpcError> {
        match request {
            Request::SetMotionControlLevel(level) => {
                self.motion.set_level(level)?;
                Ok(Response::Ack)
            }
            Request::GetMotionControlLevel => {
                Ok(Response::MotionControlLevel(self.motion.level()))
            }

            Request::PlayTts(cmd) => {
                self.audio.tts.play(cmd);
                Ok(Response::Ack)
            }
            Request::StopTts => {
                self.audio.tts.stop();
                Ok(Response::Ack)
            }
            Request::SetVolume(volume) => {
                self.audio.set_volume(volume)?;
                Ok(Response::Ack)
            }
            Request::GetVolume => Ok(Response::Volume(self.audio.volume())),
            Request::OpenAudioStream => {
                self.gates.audio = true;
                Ok(Response::Ack)
            }
            Request::CloseAudioStream => {
                self.gates.audio = false;
                Ok(Response::Ack)
            }
            Request::OpenWakeupStatusStream => {
                self.gates.wakeup = true;
                Ok(Response::Ack)
            }
            Request::CloseWakeupStatusStream => {
                self.gates.wakeup = false;
                Ok(Response::Ack)
            }

            Request::SetGait(mode) => {
                self.motion.set_gait(mode)?;
                Ok(Response::Ack)
            }
            Request::GetGait => Ok(Response::Gait(self.motion.gait())),
            Request::ExecuteTrick(action) => {
                self.motion.execute_trick(action)?;
                Ok(Response::Ack)
            }
            Request::SendJoystickCommand(cmd) => {
                self.motion.joystick(cmd)?;
                Ok(Response::Ack)
            }
            Request::HeadMove { shake_angle } => {
                self.motion.head_move(shake_angle)?;
                Ok(Response::Ack)
            }

            Request::PublishJointCommand { part, command } => {
                self.motion.publish_joint(part, command)?;
                Ok(Response::Ack)
            }
            Request::PublishHandCommand(command) => {
                self.motion.publish_hand(command)?;
                Ok(Response::Ack)
            }
            Request::SetPeriodMs(period_ms) => {
                self.motion.set_period_ms(period_ms)?;
                Ok(Response::Ack)
            }

            Request::OpenLidar => {
                self.gates.lidar = true;
                Ok(Response::Ack)
            }
            Request::CloseLidar => {
                self.gates.lidar = false;
                Ok(Response::Ack)
            }
            Request::OpenHeadRgbdCamera => {
                self.gates.head_rgbd = true;
                Ok(Response::Ack)
            }
            Request::CloseHeadRgbdCamera => {
                self.gates.head_rgbd = false;
                Ok(Response::Ack)
            }
            Request::OpenBinocularCamera => {
                self.gates.binocular = true;
                Ok(Response::Ack)
            }
            Request::CloseBinocularCamera => {
                self.gates.binocular = false;
                Ok(Response::Ack)
            }

            Request::ActivateSlamMode { mode, map_path } => {
                self.slam_nav.activate_slam(mode, &map_path)?;
                Ok(Response::Ack)
            }
            Request::StartMapping => {
                self.slam_nav.start_mapping()?;
                Ok(Response::Ack)
            }
            Request::CancelMapping => {
                self.slam_nav.cancel_mapping()?;
                Ok(Response::Ack)
            }
            Request::SaveMap { map_name } => {
                self.slam_nav.save_map(&map_name)?;
                Ok(Response::Ack)
            }
            Request::LoadMap { map_name } => {
                self.slam_nav.load_map(&map_name)?;
                Ok(Response::Ack)
            }
            Request::DeleteMap { map_name } => {
                self.slam_nav.delete_map(&map_name)?;
                Ok(Response::Ack)
            }
            Request::GetMapPath { map_name } => {
                Ok(Response::MapPath(self.slam_nav.map_path(&map_name)?))
            }
            Request::GetAllMapInfo => Ok(Response::AllMapInfo(self.slam_nav.all_map_info())),
            Request::InitPose(pose) => {
                self.slam_nav.init_pose(pose)?;
                Ok(Response::Ack)
            }
            Request::GetLocalizationInfo => {
                Ok(Response::LocalizationInfo(self.slam_nav.localization_info()))
            }
            Request::GetPointCloudMap => {
                Ok(Response::PointCloudMap(self.slam_nav.point_cloud_map()?))
            }

            Request::ActivateNavMode { mode, map_path } => {
                self.slam_nav.activate_nav(mode, &map_path)?;
                Ok(Response::Ack)
            }
            Request::SetNavTarget(target) => {
                self.slam_nav.set_nav_target(target)?;
                Ok(Response::Ack)
            }
            Request::PauseNavTask => {
                self.slam_nav.pause_nav()?;
                Ok(Response::Ack)
            }
            Request::ResumeNavTask => {
                self.slam_nav.resume_nav()?;
                Ok(Response::Ack)
            }
            Request::CancelNavTask => {
                self.slam_nav.cancel_nav()?;
                Ok(Response::Ack)
            }
            Request::GetNavTaskStatus => Ok(Response::NavTaskStatus(self.slam_nav.nav_status())),
            Request::OpenOdometryStream => {
                self.gates.odometry = true;
                Ok(Response::Ack)
            }
            Request::CloseOdometryStream => {
                self.gates.odometry = false;
                Ok(Response::Ack)
            }

            Request::GetRobotState => Ok(Response::RobotState(self.robot.clone())),
        }
    }
}

struct Shared {
    state: Mutex<MockState>,
    dropped_events: AtomicU64,
}

/// 进程内模拟传输层
///
/// 可克隆：克隆体共享同一后端状态，测试侧持有克隆用于注入与断言，
/// 客户端侧持有 `Arc<dyn Transport>`。
#[derive(Clone)]
pub struct MockTransport {
    shared: Arc<Shared>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TELEMETRY_CAPACITY)
    }

    /// 指定遥测通道容量
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(MockState::new(capacity)),
                dropped_events: AtomicU64::new(0),
            }),
        }
    }

    // ===== 故障与时序注入 =====

    /// 设置每次调用的人工延迟；超过调用超时将返回 `Timeout`
    pub fn set_latency(&self, latency: Duration) {
        self.shared.state.lock().latency = latency;
    }

    /// 使下一次 `connect`/`call` 返回指定错误（一次性）
    pub fn inject_failure(&self, error: RpcError) {
        self.shared.state.lock().inject = Some(error);
    }

    /// 因遥测队列满而被丢弃的事件总数
    pub fn dropped_events(&self) -> u64 {
        self.shared.dropped_events.load(Ordering::Relaxed)
    }

    // ===== 遥测推送 =====

    /// 推送遥测事件
    ///
    /// 返回事件是否实际入队：未连接、对应流未打开或队列已满时
    /// 返回 `false`（队列满同时累计丢弃计数）。
    pub fn emit(&self, event: TelemetryEvent) -> bool {
        let state = self.shared.state.lock();
        if !state.connected || !state.stream_enabled(event.kind()) {
            return false;
        }
        let Some(tx) = state.telemetry_tx.as_ref() else {
            return false;
        };
        match tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.shared.dropped_events.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(kind = ?event.kind(), "telemetry queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// 以固定频率推送 `count` 个事件（后台线程）
    ///
    /// 用 `spin_sleep` 控制节拍，适合验证高频流的分发与背压。
    pub fn spawn_feed<F>(&self, rate_hz: f64, count: u64, mut make: F) -> std::thread::JoinHandle<()>
    where
        F: FnMut(u64) -> TelemetryEvent + Send + 'static,
    {
        let mock = self.clone();
        std::thread::spawn(move || {
            let sleeper = spin_sleep::SpinSleeper::default();
            let period = if rate_hz > 0.0 {
                Duration::from_secs_f64(1.0 / rate_hz)
            } else {
                Duration::ZERO
            };
            for i in 0..count {
                mock.emit(make(i));
                if !period.is_zero() {
                    sleeper.sleep(period);
                }
            }
        })
    }

    // ===== 行为模型钩子 =====

    /// 标记当前 TTS 任务播放完成并推进队列
    pub fn finish_tts_playback(&self) -> Option<TtsCommand> {
        self.shared.state.lock().audio.tts.finish_playback()
    }

    /// 当前正在播放的 TTS 任务
    pub fn tts_playing(&self) -> Option<TtsCommand> {
        self.shared.state.lock().audio.tts.playing().cloned()
    }

    /// 指定优先级的待播 TTS 任务
    pub fn tts_pending(&self, priority: TtsPriority) -> Vec<TtsCommand> {
        self.shared.state.lock().audio.tts.pending(priority)
    }

    /// 终结当前导航任务，返回是否有任务被终结
    pub fn complete_nav_task(&self, success: bool) -> bool {
        self.shared.state.lock().slam_nav.complete(success)
    }

    /// 设置电池数据（`GetRobotState` 返回值的一部分）
    pub fn set_bms(&self, bms: BmsData) {
        self.shared.state.lock().robot.bms_data = bms;
    }

    /// 追加一条故障记录
    pub fn push_fault(&self, fault: Fault) {
        self.shared.state.lock().robot.faults.push(fault);
    }

    /// 清空故障记录
    pub fn clear_faults(&self) {
        self.shared.state.lock().robot.faults.clear();
    }

    // ===== 状态查询 =====

    /// 最近一次摇杆指令
    pub fn last_joystick(&self) -> Option<JoystickCommand> {
        self.shared.state.lock().motion.last_joystick()
    }

    /// 最近一次指定部位的关节指令
    pub fn last_joint_command(&self, part: BodyPart) -> Option<JointCommand> {
        self.shared.state.lock().motion.last_joint_command(part)
    }

    /// 最近一次灵巧手指令
    pub fn last_hand_command(&self) -> Option<HandCommand> {
        self.shared.state.lock().motion.last_hand_command()
    }

    /// 指定流当前是否放行
    pub fn stream_open(&self, kind: StreamKind) -> bool {
        self.shared.state.lock().stream_enabled(kind)
    }

    /// `connect` 时记录的本地 IP
    pub fn local_ip(&self) -> Option<IpAddr> {
        self.shared.state.lock().local_ip
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn connect(&self, local_ip: IpAddr, timeout: Duration) -> Result<(), RpcError> {
        let mut state = self.shared.state.lock();
        if let Some(err) = state.inject.take() {
            return Err(err);
        }
        if state.latency > timeout {
            return Err(RpcError::Timeout);
        }
        if state.connected {
            return Ok(());
        }
        let (tx, rx) = crossbeam_channel::bounded(state.capacity);
        state.telemetry_tx = Some(tx);
        state.telemetry_rx = Some(rx);
        state.local_ip = Some(local_ip);
        state.connected = true;
        tracing::debug!(%local_ip, "mock transport connected");
        Ok(())
    }

    fn disconnect(&self) -> Result<(), RpcError> {
        let mut state = self.shared.state.lock();
        if !state.connected {
            return Ok(());
        }
        // 丢弃发送端，接收端耗尽后自然关闭
        state.telemetry_tx = None;
        state.connected = false;
        tracing::debug!("mock transport disconnected");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.shared.state.lock().connected
    }

    fn call(&self, request: Request, timeout: Duration) -> Result<Response, RpcError> {
        let latency = {
            let mut state = self.shared.state.lock();
            if let Some(err) = state.inject.take() {
                return Err(err);
            }
            if !state.connected {
                return Err(RpcError::NotConnected);
            }
            state.latency
        };
        if latency > timeout {
            std::thread::sleep(timeout);
            return Err(RpcError::Timeout);
        }
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }

        let mut state = self.shared.state.lock();
        if !state.connected {
            return Err(RpcError::NotConnected);
        }
        state.handle(request)
    }

    fn telemetry(&self) -> Receiver<TelemetryEvent> {
        let state = self.shared.state.lock();
        if let Some(rx) = state.telemetry_rx.as_ref() {
            return rx.clone();
        }
        // 从未连接：返回已关闭的接收端
        let (_tx, rx) = crossbeam_channel::bounded(0);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicbot_types::{GaitMode, Imu, SlamMode};
    use std::net::Ipv4Addr;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn connected() -> MockTransport {
        let mock = MockTransport::new();
        mock.connect(IpAddr::V4(Ipv4Addr::new(192, 168, 54, 111)), TIMEOUT)
            .unwrap();
        mock
    }

    #[test]
    fn test_call_requires_connection() {
        let mock = MockTransport::new();
        let err = mock.call(Request::GetVolume, TIMEOUT).unwrap_err();
        assert_eq!(err, RpcError::NotConnected);
        assert!(!mock.is_connected());
    }

    #[test]
    fn test_connect_and_session_defaults() {
        let mock = connected();
        assert!(mock.is_connected());
        assert_eq!(
            mock.local_ip(),
            Some(IpAddr::V4(Ipv4Addr::new(192, 168, 54, 111)))
        );

        // 出厂默认：音量 30、高层控制、阻尼站立
        assert_eq!(
            mock.call(Request::GetVolume, TIMEOUT).unwrap(),
            Response::Volume(30)
        );
        assert_eq!(
            mock.call(Request::GetGait, TIMEOUT).unwrap(),
            Response::Gait(GaitMode::Passive)
        );
    }

    #[test]
    fn test_disconnect_idempotent_and_closes_telemetry() {
        let mock = connected();
        let rx = mock.telemetry();

        mock.emit(TelemetryEvent::BodyImu(Arc::new(Imu::default())));
        mock.disconnect().unwrap();
        mock.disconnect().unwrap();

        // 断开前入队的事件仍可排空，之后通道关闭
        assert!(rx.recv().is_ok());
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_latency_exceeding_timeout() {
        let mock = connected();
        mock.set_latency(Duration::from_millis(50));
        let err = mock
            .call(Request::GetVolume, Duration::from_millis(5))
            .unwrap_err();
        assert_eq!(err, RpcError::Timeout);

        // 恢复零延迟后调用成功
        mock.set_latency(Duration::ZERO);
        mock.call(Request::GetVolume, TIMEOUT).unwrap();
    }

    #[test]
    fn test_inject_failure_is_one_shot() {
        let mock = connected();
        mock.inject_failure(RpcError::ChannelClosed);
        let err = mock.call(Request::GetVolume, TIMEOUT).unwrap_err();
        assert_eq!(err, RpcError::ChannelClosed);
        mock.call(Request::GetVolume, TIMEOUT).unwrap();
    }

    #[test]
    fn test_backpressure_drops_newest() {
        let mock = MockTransport::with_capacity(2);
        mock.connect(IpAddr::V4(Ipv4Addr::LOCALHOST), TIMEOUT).unwrap();
        let rx = mock.telemetry();

        for _ in 0..5 {
            mock.emit(TelemetryEvent::BodyImu(Arc::new(Imu::default())));
        }
        assert_eq!(mock.dropped_events(), 3);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn test_stream_gating() {
        let mock = connected();
        let rx = mock.telemetry();

        // 雷达未打开，事件被丢弃
        assert!(!mock.emit(TelemetryEvent::LidarImu(Arc::new(Imu::default()))));
        mock.call(Request::OpenLidar, TIMEOUT).unwrap();
        assert!(mock.stream_open(StreamKind::LidarImu));
        assert!(mock.emit(TelemetryEvent::LidarImu(Arc::new(Imu::default()))));

        mock.call(Request::CloseLidar, TIMEOUT).unwrap();
        assert!(!mock.emit(TelemetryEvent::LidarImu(Arc::new(Imu::default()))));

        // 躯干 IMU 常开
        assert!(mock.emit(TelemetryEvent::BodyImu(Arc::new(Imu::default()))));
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn test_map_store_survives_reconnect() {
        let mock = connected();
        mock.call(
            Request::ActivateSlamMode {
                mode: SlamMode::Mapping,
                map_path: String::new(),
            },
            TIMEOUT,
        )
        .unwrap();
        mock.call(Request::StartMapping, TIMEOUT).unwrap();
        mock.call(
            Request::SaveMap {
                map_name: "office".to_string(),
            },
            TIMEOUT,
        )
        .unwrap();

        mock.disconnect().unwrap();
        mock.connect(IpAddr::V4(Ipv4Addr::LOCALHOST), TIMEOUT).unwrap();

        match mock.call(Request::GetAllMapInfo, TIMEOUT).unwrap() {
            Response::AllMapInfo(info) => {
                assert_eq!(info.map_infos.len(), 1);
                assert_eq!(info.map_infos[0].map_name, "office");
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn test_telemetry_before_connect_is_closed() {
        let mock = MockTransport::new();
        let rx = mock.telemetry();
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_spawn_feed_delivers_events() {
        let mock = connected();
        let rx = mock.telemetry();

        let handle = mock.spawn_feed(1000.0, 20, |_| {
            TelemetryEvent::BodyImu(Arc::new(Imu::default()))
        });
        handle.join().unwrap();

        assert_eq!(rx.try_iter().count(), 20);
        assert_eq!(mock.dropped_events(), 0);
    }

    #[test]
    fn test_robot_state_hooks() {
        let mock = connected();
        mock.push_fault(Fault {
            error_code: 0x1101,
            error_message: "IMU acceleration anomaly".to_string(),
        });

        match mock.call(Request::GetRobotState, TIMEOUT).unwrap() {
            Response::RobotState(state) => {
                assert_eq!(state.faults.len(), 1);
                assert_eq!(state.faults[0].error_code, 0x1101);
            }
            other => panic!("unexpected response {other:?}"),
        }

        mock.clear_faults();
        match mock.call(Request::GetRobotState, TIMEOUT).unwrap() {
            Response::RobotState(state) => assert!(state.faults.is_empty()),
            other => panic!("unexpected response {other:?}"),
        }
    }
}

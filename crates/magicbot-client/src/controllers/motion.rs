//! 运动控制器：高层步态/特技/摇杆与低层关节直控
//!
//! 两个控制器共用一套后端鉴权：高层命令只在 `HighLevel` 授权下被接受，
//! 低层发布只在 `LowLevel` 授权下被接受，发错级别由后端拒绝。切换授权
//! 级别走门面的 `set_motion_control_level`。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use magicbot_rpc::{Request, Response};
use magicbot_types::{
    BodyPart, GaitMode, HAND_CMD_DOF, HAND_NUM, HandCommand, HandState, Imu, JointCommand,
    JointState, JoystickCommand, TrickAction,
};
use tracing::debug;

use crate::context::{RobotContext, unexpected};
use crate::error::ClientError;

/// 头部摇头角度上限（弧度，约 ±40°）
pub const MAX_HEAD_SHAKE_RAD: f32 = 0.698;

/// 高层运动控制器
///
/// `send_joystick_command` 期望调用方以约 20 Hz 的节奏持续发送；轴值超出
/// `[-1.0, 1.0]` 时在客户端钳制后下发，不会拒绝。
pub struct HighLevelMotionController {
    ctx: Arc<RobotContext>,
    ready: AtomicBool,
}

impl HighLevelMotionController {
    pub(crate) fn new(ctx: Arc<RobotContext>) -> Self {
        Self {
            ctx,
            ready: AtomicBool::new(false),
        }
    }

    /// 启用控制器，幂等
    pub fn initialize(&self) -> bool {
        self.ready.store(true, Ordering::SeqCst);
        true
    }

    /// 停用控制器，幂等
    pub fn shutdown(&self) {
        self.ready.store(false, Ordering::SeqCst);
        debug!("high level motion controller shut down");
    }

    fn require_ready(&self) -> Result<(), ClientError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(ClientError::NotInitialized);
        }
        Ok(())
    }

    /// 切换步态
    pub fn set_gait(&self, mode: GaitMode) -> Result<(), ClientError> {
        self.set_gait_timeout(mode, self.ctx.timeout())
    }

    /// [`set_gait`](Self::set_gait) 的显式超时版本
    pub fn set_gait_timeout(&self, mode: GaitMode, timeout: Duration) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::SetGait(mode), timeout)
    }

    /// 查询当前步态
    pub fn get_gait(&self) -> Result<GaitMode, ClientError> {
        self.require_ready()?;
        match self.ctx.call(Request::GetGait, self.ctx.timeout())? {
            Response::Gait(mode) => Ok(mode),
            other => Err(unexpected("GetGait", &other)),
        }
    }

    /// 执行特技动作，后端要求当前步态为 `BalanceStand`
    pub fn execute_trick(&self, action: TrickAction) -> Result<(), ClientError> {
        self.execute_trick_timeout(action, self.ctx.timeout())
    }

    /// [`execute_trick`](Self::execute_trick) 的显式超时版本
    pub fn execute_trick_timeout(
        &self,
        action: TrickAction,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::ExecuteTrick(action), timeout)
    }

    /// 发送摇杆命令，超范围轴值钳制到 `[-1.0, 1.0]` 后下发
    pub fn send_joystick_command(&self, command: JoystickCommand) -> Result<(), ClientError> {
        self.require_ready()?;
        let clamped = command.clamped();
        if !command.is_normalized() {
            debug!(?command, "joystick axes clamped");
        }
        self.ctx
            .expect_ack(Request::SendJoystickCommand(clamped), self.ctx.timeout())
    }

    /// 头部摇头到指定角度，合法范围 ±[`MAX_HEAD_SHAKE_RAD`]
    pub fn head_move(&self, shake_angle: f32) -> Result<(), ClientError> {
        self.head_move_timeout(shake_angle, self.ctx.timeout())
    }

    /// [`head_move`](Self::head_move) 的显式超时版本
    pub fn head_move_timeout(
        &self,
        shake_angle: f32,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.require_ready()?;
        if !shake_angle.is_finite() || shake_angle.abs() > MAX_HEAD_SHAKE_RAD {
            return Err(ClientError::InvalidArgument(format!(
                "shake angle {shake_angle} out of range ±{MAX_HEAD_SHAKE_RAD}"
            )));
        }
        self.ctx
            .expect_ack(Request::HeadMove { shake_angle }, timeout)
    }
}

/// 低层运动控制器
///
/// 发布接口由调用方驱动约 500 Hz 的控制循环（见
/// [`CONTROL_PERIOD_MS`](magicbot_types::CONTROL_PERIOD_MS)），客户端只做
/// 形状校验并转发，不缓存也不重发。
pub struct LowLevelMotionController {
    ctx: Arc<RobotContext>,
    ready: AtomicBool,
}

impl LowLevelMotionController {
    pub(crate) fn new(ctx: Arc<RobotContext>) -> Self {
        Self {
            ctx,
            ready: AtomicBool::new(false),
        }
    }

    /// 启用控制器，幂等
    pub fn initialize(&self) -> bool {
        self.ready.store(true, Ordering::SeqCst);
        true
    }

    /// 停用控制器并清掉本控制器名下的订阅槽，幂等
    pub fn shutdown(&self) {
        self.ready.store(false, Ordering::SeqCst);
        self.ctx.router.arm_joint_state.unsubscribe();
        self.ctx.router.leg_joint_state.unsubscribe();
        self.ctx.router.head_joint_state.unsubscribe();
        self.ctx.router.waist_joint_state.unsubscribe();
        self.ctx.router.hand_state.unsubscribe();
        self.ctx.router.body_imu.unsubscribe();
        debug!("low level motion controller shut down");
    }

    fn require_ready(&self) -> Result<(), ClientError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(ClientError::NotInitialized);
        }
        Ok(())
    }

    fn publish(&self, part: BodyPart, command: &JointCommand) -> Result<(), ClientError> {
        self.require_ready()?;
        if !part.valid_joint_count(command.joints.len()) {
            return Err(ClientError::InvalidArgument(format!(
                "{} command carries {} joints",
                part.name(),
                command.joints.len()
            )));
        }
        self.ctx.expect_ack(
            Request::PublishJointCommand {
                part,
                command: command.clone(),
            },
            self.ctx.timeout(),
        )
    }

    /// 发布手臂关节命令（14 关节）
    pub fn publish_arm_command(&self, command: &JointCommand) -> Result<(), ClientError> {
        self.publish(BodyPart::Arm, command)
    }

    /// 发布腿部关节命令（12 关节）
    pub fn publish_leg_command(&self, command: &JointCommand) -> Result<(), ClientError> {
        self.publish(BodyPart::Leg, command)
    }

    /// 发布头部关节命令（2 关节）
    pub fn publish_head_command(&self, command: &JointCommand) -> Result<(), ClientError> {
        self.publish(BodyPart::Head, command)
    }

    /// 发布腰部关节命令（1 或 3 关节，视 SKU）
    pub fn publish_waist_command(&self, command: &JointCommand) -> Result<(), ClientError> {
        self.publish(BodyPart::Waist, command)
    }

    /// 发布双手命令，左右各 7 自由度
    pub fn publish_hand_command(&self, command: &HandCommand) -> Result<(), ClientError> {
        self.require_ready()?;
        if command.cmd.len() != HAND_NUM {
            return Err(ClientError::InvalidArgument(format!(
                "hand command carries {} hands, expected {HAND_NUM}",
                command.cmd.len()
            )));
        }
        for (index, hand) in command.cmd.iter().enumerate() {
            if hand.pos.len() != HAND_CMD_DOF {
                return Err(ClientError::InvalidArgument(format!(
                    "hand {index} carries {} positions, expected {HAND_CMD_DOF}",
                    hand.pos.len()
                )));
            }
        }
        self.ctx.expect_ack(
            Request::PublishHandCommand(command.clone()),
            self.ctx.timeout(),
        )
    }

    /// 设置控制周期提示（毫秒），必须非零
    pub fn set_period_ms(&self, period_ms: u64) -> Result<(), ClientError> {
        self.require_ready()?;
        if period_ms == 0 {
            return Err(ClientError::InvalidArgument(
                "control period must be non-zero".to_string(),
            ));
        }
        self.ctx
            .expect_ack(Request::SetPeriodMs(period_ms), self.ctx.timeout())
    }

    /// 订阅手臂关节状态
    pub fn subscribe_arm_state<F>(&self, callback: F)
    where
        F: Fn(Arc<JointState>) + Send + Sync + 'static,
    {
        self.ctx.router.arm_joint_state.subscribe(callback);
    }

    pub fn unsubscribe_arm_state(&self) {
        self.ctx.router.arm_joint_state.unsubscribe();
    }

    /// 订阅腿部关节状态
    pub fn subscribe_leg_state<F>(&self, callback: F)
    where
        F: Fn(Arc<JointState>) + Send + Sync + 'static,
    {
        self.ctx.router.leg_joint_state.subscribe(callback);
    }

    pub fn unsubscribe_leg_state(&self) {
        self.ctx.router.leg_joint_state.unsubscribe();
    }

    /// 订阅头部关节状态
    pub fn subscribe_head_state<F>(&self, callback: F)
    where
        F: Fn(Arc<JointState>) + Send + Sync + 'static,
    {
        self.ctx.router.head_joint_state.subscribe(callback);
    }

    pub fn unsubscribe_head_state(&self) {
        self.ctx.router.head_joint_state.unsubscribe();
    }

    /// 订阅腰部关节状态
    pub fn subscribe_waist_state<F>(&self, callback: F)
    where
        F: Fn(Arc<JointState>) + Send + Sync + 'static,
    {
        self.ctx.router.waist_joint_state.subscribe(callback);
    }

    pub fn unsubscribe_waist_state(&self) {
        self.ctx.router.waist_joint_state.unsubscribe();
    }

    /// 订阅双手状态
    pub fn subscribe_hand_state<F>(&self, callback: F)
    where
        F: Fn(Arc<HandState>) + Send + Sync + 'static,
    {
        self.ctx.router.hand_state.subscribe(callback);
    }

    pub fn unsubscribe_hand_state(&self) {
        self.ctx.router.hand_state.unsubscribe();
    }

    /// 订阅机体 IMU（约 1 kHz，回调内请抽样消费）
    pub fn subscribe_body_imu<F>(&self, callback: F)
    where
        F: Fn(Arc<Imu>) + Send + Sync + 'static,
    {
        self.ctx.router.body_imu.subscribe(callback);
    }

    pub fn unsubscribe_body_imu(&self) {
        self.ctx.router.body_imu.unsubscribe();
    }
}

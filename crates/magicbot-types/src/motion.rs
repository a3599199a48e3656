//! 运动控制类型
//!
//! 包含高层运动（步态、特技、摇杆）与低层运动（关节/手部命令与状态）。
//! 步态与特技的整数编码由协议固定且不连续，序列化时必须逐位保持。

use crate::constants::{
    ARM_JOINT_NUM, HAND_CMD_DOF, HEAD_JOINT_NUM, LEG_JOINT_NUM, WAIST_JOINT_NUM,
};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 运动控制级别
///
/// 高层（步态/特技/摇杆）与低层（关节伺服）互斥，
/// 激活一方即剥夺另一方的命令权限。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum ControllerLevel {
    #[default]
    Unknown = 0,
    HighLevel = 1,
    LowLevel = 2,
}

/// 步态模式（协议固定稀疏编码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum GaitMode {
    /// 空闲模式
    Passive = 0,
    /// 站立锁定/站立恢复
    RecoveryStand = 1,
    /// 平衡站立（支持移动）
    BalanceStand = 46,
    /// 摆臂行走
    ArmSwingWalk = 78,
    /// 拟人行走
    HumanoidWalk = 79,
    /// 低层控制 SDK 模式
    LowLevelSdk = 200,
}

/// 特技动作（对应预定义动作序列 ID，编码不连续）
///
/// 执行特技要求当前步态为 [`GaitMode::BalanceStand`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum TrickAction {
    /// 无动作（默认）
    None = 0,
    /// 左手握手·伸出
    ShakeLeftHandReachout = 215,
    /// 左手握手·收回
    ShakeLeftHandWithdraw = 216,
    /// 右手握手·伸出
    ShakeRightHandReachout = 217,
    /// 右手握手·收回
    ShakeRightHandWithdraw = 218,
    /// 摇头
    ShakeHead = 220,
    /// 左手打招呼
    LeftGreeting = 300,
    /// 右手打招呼
    RightGreeting = 301,
    /// 左转介绍·高位
    TurnLeftIntroduceHigh = 304,
    /// 左转介绍·低位
    TurnLeftIntroduceLow = 305,
    /// 右转介绍·高位
    TurnRightIntroduceHigh = 306,
    /// 右转介绍·低位
    TurnRightIntroduceLow = 307,
    /// 欢迎
    Welcome = 340,
}

/// 摇杆命令，四轴均为归一化值
///
/// 合法范围 `[-1.0, 1.0]`。越界值的处理策略是钳制（clamp）而非拒绝，
/// 发送路径统一经过 [`JoystickCommand::clamped`]。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoystickCommand {
    pub left_x_axis: f32,
    pub left_y_axis: f32,
    pub right_x_axis: f32,
    pub right_y_axis: f32,
}

impl JoystickCommand {
    pub fn new(left_x: f32, left_y: f32, right_x: f32, right_y: f32) -> Self {
        Self {
            left_x_axis: left_x,
            left_y_axis: left_y,
            right_x_axis: right_x,
            right_y_axis: right_y,
        }
    }

    /// 返回各轴钳制到 `[-1.0, 1.0]` 后的副本
    ///
    /// NaN 视为 0.0（无输入）。
    pub fn clamped(&self) -> Self {
        fn clamp_axis(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
        }
        Self {
            left_x_axis: clamp_axis(self.left_x_axis),
            left_y_axis: clamp_axis(self.left_y_axis),
            right_x_axis: clamp_axis(self.right_x_axis),
            right_y_axis: clamp_axis(self.right_y_axis),
        }
    }

    /// 四轴是否全部已在合法范围内
    pub fn is_normalized(&self) -> bool {
        [
            self.left_x_axis,
            self.left_y_axis,
            self.right_x_axis,
            self.right_y_axis,
        ]
        .iter()
        .all(|v| (-1.0..=1.0).contains(v))
    }
}

/// 关节运行模式字：就绪/空闲
pub const JOINT_MODE_READY: i16 = 200;

/// 关节运行模式字：串联 PID 主动控制
pub const JOINT_MODE_SERIES_PID: i16 = 4;

/// 单关节控制命令
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleJointCommand {
    /// 运行模式字（默认 200 就绪，4 为串联 PID 主动控制）
    pub operation_mode: i16,
    /// 目标位置（rad 或 m，取决于关节类型）
    pub pos: f32,
    /// 目标速度（rad/s 或 m/s）
    pub vel: f32,
    /// 目标力矩（Nm）
    pub toq: f32,
    /// 位置环增益（比例项）
    pub kp: f32,
    /// 速度环增益（微分项）
    pub kd: f32,
}

impl Default for SingleJointCommand {
    fn default() -> Self {
        Self {
            operation_mode: JOINT_MODE_READY,
            pos: 0.0,
            vel: 0.0,
            toq: 0.0,
            kp: 0.0,
            kd: 0.0,
        }
    }
}

/// 某一身体部位的全部关节控制命令
///
/// 序列下标必须与后端文档约定的物理关节顺序一致，客户端不得重排。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointCommand {
    /// 时间戳（纳秒）
    pub timestamp: i64,
    pub joints: Vec<SingleJointCommand>,
}

impl JointCommand {
    /// 构造 `count` 个就绪模式关节的命令
    pub fn with_joint_count(count: usize) -> Self {
        Self {
            timestamp: 0,
            joints: vec![SingleJointCommand::default(); count],
        }
    }
}

/// 单关节状态反馈
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleJointState {
    /// 关节状态字（自定义状态机编码）
    pub status_word: i16,
    /// 实际位置（高可靠编码器通道）
    pub pos_h: f32,
    /// 实际位置（低可靠编码器通道）
    pub pos_l: f32,
    /// 当前速度（rad/s 或 m/s）
    pub vel: f32,
    /// 当前力矩（Nm）
    pub toq: f32,
    /// 当前电流（A）
    pub current: f32,
    /// 错误码（0 为正常）
    pub err_code: i16,
}

/// 某一身体部位的全部关节状态
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointState {
    /// 时间戳（纳秒）
    pub timestamp: i64,
    pub joints: Vec<SingleJointState>,
}

/// 单手控制命令
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleHandJointCommand {
    /// 控制模式（位置/力矩/阻抗等，默认 0）
    pub operation_mode: i16,
    /// 期望位置数组（7 自由度）
    pub pos: Vec<f32>,
}

impl SingleHandJointCommand {
    /// 构造 7 自由度零位命令
    pub fn zeroed() -> Self {
        Self {
            operation_mode: 0,
            pos: vec![0.0; HAND_CMD_DOF],
        }
    }
}

/// 双手控制命令，`cmd` 依次为左手、右手
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandCommand {
    /// 时间戳（纳秒）
    pub timestamp: i64,
    pub cmd: Vec<SingleHandJointCommand>,
}

/// 单手状态反馈
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleHandJointState {
    pub status_word: i16,
    /// 实际位置
    pub pos: Vec<f32>,
    /// 实际力矩（Nm）
    pub toq: Vec<f32>,
    /// 实际电流（A）
    pub cur: Vec<f32>,
    /// 错误码（0 为正常）
    pub error_code: i16,
}

/// 双手状态，`state` 依次为左手、右手
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandState {
    /// 时间戳（纳秒）
    pub timestamp: i64,
    pub state: Vec<SingleHandJointState>,
}

/// 身体部位，用于低层关节命令/状态的路由与校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyPart {
    Arm,
    Leg,
    Head,
    Waist,
}

impl BodyPart {
    /// 校验关节数量是否符合该部位的协议约定
    ///
    /// 腰部存在 1 关节与 3 关节两种 SKU，两者都合法。
    pub fn valid_joint_count(&self, count: usize) -> bool {
        match self {
            BodyPart::Arm => count == ARM_JOINT_NUM,
            BodyPart::Leg => count == LEG_JOINT_NUM,
            BodyPart::Head => count == HEAD_JOINT_NUM,
            BodyPart::Waist => count == WAIST_JOINT_NUM || count == 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BodyPart::Arm => "arm",
            BodyPart::Leg => "leg",
            BodyPart::Head => "head",
            BodyPart::Waist => "waist",
        }
    }
}

/// 状态估计器输出快照
///
/// `w_` 前缀为世界系，`b_` 前缀为机体系。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimatorState {
    /// 世界系基座位置
    pub w_base_pos: [f64; 3],
    /// 世界系质心位置
    pub w_com_pos: [f64; 3],
    /// 世界系质心速度
    pub w_com_vel: [f64; 3],
    /// 世界系基座速度
    pub w_base_vel: [f64; 3],
    /// 机体系基座速度
    pub b_base_vel: [f64; 3],
}

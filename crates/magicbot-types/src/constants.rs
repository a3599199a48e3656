//! 机器人本体常量定义
//!
//! 集中定义各身体部位的关节数量与控制周期，避免在代码中散落"魔法数"。
//! 关节数量与物理关节顺序由后端固定，客户端不得重排。

/// 单手自由度（状态反馈）
pub const HAND_JOINT_NUM: usize = 6;

/// 手的数量（左右各一）
pub const HAND_NUM: usize = 2;

/// 单手命令位置数组长度
///
/// 命令侧每只手携带 7 个位置量，与状态反馈的 6 自由度不同。
pub const HAND_CMD_DOF: usize = 7;

/// 头部关节数量
pub const HEAD_JOINT_NUM: usize = 2;

/// 手臂关节数量（左右臂合计）
pub const ARM_JOINT_NUM: usize = 14;

/// 腰部关节数量（基础 SKU）
///
/// 部分 SKU 为 3 关节腰部，命令校验同时接受 1 或 3。
pub const WAIST_JOINT_NUM: usize = 1;

/// 腿部关节数量（左右腿合计）
pub const LEG_JOINT_NUM: usize = 12;

/// 低层控制周期（毫秒），约 500 Hz
///
/// 低层关节命令由调用方按该周期驱动，SDK 内部不做调度。
pub const CONTROL_PERIOD_MS: u64 = 2;

/// 机器人型号标识
pub const ROBOT_MODEL: &str = "magicbot_z1";

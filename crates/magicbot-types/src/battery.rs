//! 电池管理系统（BMS）遥测类型

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 电池健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum BatteryState {
    /// 未知
    #[default]
    Unknown = 0,
    /// 正常
    Good = 1,
    /// 过热
    Overheat = 2,
    /// 损坏
    Dead = 3,
    /// 过压
    Overvoltage = 4,
    /// 未知故障
    UnspecFailure = 5,
    /// 过冷
    Cold = 6,
    /// 看门狗定时器超时
    WatchdogTimerExpire = 7,
    /// 安全定时器超时
    SafetyTimerExpire = 8,
}

/// 电源供电状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum PowerSupplyStatus {
    /// 未知
    #[default]
    Unknown = 0,
    /// 充电中
    Charging = 1,
    /// 放电中
    Discharging = 2,
    /// 未充电
    NotCharging = 3,
    /// 已充满
    Full = 4,
}

/// BMS 遥测数据
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BmsData {
    /// 电量百分比（0-100）
    pub battery_percentage: f32,
    /// 电池健康度（实现自定义刻度）
    pub battery_health: f32,
    /// 电池健康状态
    pub battery_state: BatteryState,
    /// 供电状态
    pub power_supply_status: PowerSupplyStatus,
}

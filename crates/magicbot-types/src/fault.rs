//! 故障与机器人整体状态快照
//!
//! `RobotState` 由状态监控器按需拉取（非推送），
//! 故障序列保持后端上报顺序，不做去重。

use crate::battery::BmsData;

/// 单条故障记录
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fault {
    pub error_code: i32,
    pub error_message: String,
}

impl Fault {
    pub fn new(error_code: i32, error_message: impl Into<String>) -> Self {
        Self {
            error_code,
            error_message: error_message.into(),
        }
    }
}

/// 机器人整体状态快照
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotState {
    /// 当前活跃故障（有序，数量不限）
    pub faults: Vec<Fault>,
    /// 电池管理系统遥测
    pub bms_data: BmsData,
}

/// 查询协议故障码对应的英文描述
///
/// 故障码按子系统分段：0x11xx 服务调用、0x13xx 节点丢失、
/// 0x22xx 传感器数据、0x31xx App 连接、0x42xx 头部串口、
/// 0x52xx 导航、0x61xx/0x62xx SLAM、0x72xx LCM、
/// 0x82xx 硬件、0x92xx EtherCAT、0xA2xx 运动控制。
/// 未知码返回 `None`。
pub fn fault_description(code: u16) -> Option<&'static str> {
    let desc = match code {
        0x0000 => "No fault",

        0x1101 => "Service invocation failed",
        0x1301 => "Central control node lost",
        0x1302 => "App node lost",
        0x1303 => "Audio node lost",
        0x1304 => "Stereo camera node lost",
        0x1305 => "LIDAR node lost",
        0x1306 => "SLAM node lost",
        0x1307 => "Navigation node lost",
        0x1308 => "AI node lost",
        0x1309 => "Head node lost",
        0x130A => "Point cloud node lost",

        0x2201 => "No LIDAR data received",
        0x2202 => "No stereo camera data received",
        0x2203 => "Stereo camera data error",
        0x2204 => "Stereo camera initialization failed",
        0x220B => "No odometry data received",
        0x220C => "No IMU data received",
        0x2215 => "Depth camera not detected",

        0x3101 => "Failed to connect robot to app",
        0x3102 => "Heartbeat lost - assertion failed",

        0x4201 => "Failed to open head serial port",
        0x4202 => "No head data received",

        0x5201 => "No navigation TF data",
        0x5202 => "No navigation map data",
        0x5203 => "No navigation localization data",
        0x5204 => "No navigation LIDAR data",
        0x5205 => "No navigation depth camera data",
        0x5206 => "No navigation multi-line LIDAR data",
        0x5207 => "No navigation odometry data",

        0x6201 => "SLAM localization error",
        0x6102 => "No SLAM LIDAR data",
        0x6103 => "No SLAM odometry data",
        0x6104 => "SLAM map data error",

        0x7201 => "LCM connection timeout",

        0x8201 => "Left leg hardware error",
        0x8202 => "Right leg hardware error",
        0x8203 => "Left arm hardware error",
        0x8204 => "Right arm hardware error",
        0x8205 => "Waist hardware error",
        0x8206 => "Head hardware error",
        0x8207 => "Hand hardware error",
        0x8208 => "Gripper hardware error",
        0x8209 => "IMU hardware error",
        0x820A => "Power system hardware error",
        0x820B => "Leg force sensor hardware error",
        0x820C => "Arm force sensor hardware error",

        0x9201 => "ECAT (EtherCAT) hardware error",

        0xA201 => "Motion posture error",
        0xA202 => "Foot position deviation during movement",
        0xA203 => "Joint velocity error during motion",

        _ => return None,
    };
    Some(desc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_description_known_codes() {
        assert_eq!(fault_description(0x0000), Some("No fault"));
        assert_eq!(fault_description(0x1101), Some("Service invocation failed"));
        assert_eq!(fault_description(0x130A), Some("Point cloud node lost"));
        assert_eq!(fault_description(0x7201), Some("LCM connection timeout"));
        assert_eq!(
            fault_description(0x9201),
            Some("ECAT (EtherCAT) hardware error")
        );
        assert_eq!(
            fault_description(0xA203),
            Some("Joint velocity error during motion")
        );
    }

    #[test]
    fn test_fault_description_unknown_code() {
        // 分段之间的空洞不应命中任何描述
        assert_eq!(fault_description(0x1102), None);
        assert_eq!(fault_description(0xFFFF), None);
    }

    #[test]
    fn test_robot_state_default() {
        let state = RobotState::default();
        assert!(state.faults.is_empty());
    }

    #[test]
    fn test_fault_ordering_preserved() {
        // 故障序列保持上报顺序
        let state = RobotState {
            faults: vec![
                Fault::new(0x8201, "Left leg hardware error"),
                Fault::new(0x2201, "No LIDAR data received"),
                Fault::new(0x8201, "Left leg hardware error"),
            ],
            bms_data: Default::default(),
        };
        assert_eq!(state.faults.len(), 3);
        assert_eq!(state.faults[0].error_code, 0x8201);
        assert_eq!(state.faults[1].error_code, 0x2201);
        // 不去重
        assert_eq!(state.faults[0], state.faults[2]);
    }
}

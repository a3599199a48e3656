//! SLAM 与导航类型
//!
//! 建图/定位/导航模式、地图元数据、位姿与里程计。
//! 地图栅格图像为行主序 8 位灰度，外部持久化格式为二进制 PGM（见 [`crate::pgm`]）。

use crate::TypeError;
use crate::sensor::Header;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// SLAM 工作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum SlamMode {
    #[default]
    Idle = 0,
    /// 建图模式，进入后通过 StartMapping/SaveMap 驱动
    Mapping = 1,
    /// 定位模式，激活时必须给定已有地图路径
    Localization = 2,
}

/// 导航工作模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum NavMode {
    #[default]
    Idle = 0,
    /// 栅格地图导航，激活时复用已有地图
    GridMap = 1,
}

/// 导航任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum NavStatusType {
    /// 无任务
    #[default]
    None = 0,
    /// 执行中
    Running = 1,
    /// 成功结束
    EndSuccess = 2,
    /// 失败结束
    EndFailed = 3,
    /// 已暂停
    Pause = 4,
    /// 恢复执行
    Continue = 5,
    /// 已取消
    Cancel = 6,
}

/// 三维位姿（欧拉角表示）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose3DEuler {
    /// 位置 (x, y, z)，单位米
    pub position: [f64; 3],
    /// 姿态 (roll, pitch, yaw)，单位弧度
    pub orientation: [f64; 3],
}

/// 地图栅格图像数据
///
/// 8 位灰度、行主序；`format` 固定为 "P5"（二进制 PGM 魔数）。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapImageData {
    /// 图像格式魔数，线上字段名为 `type`
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub format: String,
    /// 宽度（像素）
    pub width: i32,
    /// 高度（像素）
    pub height: i32,
    /// 最大灰度值（通常 255）
    pub max_gray_value: i32,
    /// 像素数据，长度必须等于 width * height
    pub image: Vec<u8>,
}

impl MapImageData {
    /// PGM 魔数
    pub const MAGIC: &'static str = "P5";

    pub fn new(width: i32, height: i32, max_gray_value: i32, image: Vec<u8>) -> Self {
        Self {
            format: Self::MAGIC.to_string(),
            width,
            height,
            max_gray_value,
            image,
        }
    }

    /// 校验格式魔数、灰度上限与像素缓冲区尺寸
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.format != Self::MAGIC {
            return Err(TypeError::Malformed(format!(
                "unsupported map image format {:?}, expected \"P5\"",
                self.format
            )));
        }
        if self.width < 0 || self.height < 0 {
            return Err(TypeError::Malformed(
                "map image dimensions must be non-negative".to_string(),
            ));
        }
        if !(1..=255).contains(&self.max_gray_value) {
            return Err(TypeError::InvalidValue {
                field: "MapImageData.max_gray_value",
                value: self.max_gray_value as i64,
            });
        }
        let expected = self.width as usize * self.height as usize;
        if self.image.len() != expected {
            return Err(TypeError::SizeMismatch {
                field: "MapImageData.image",
                expected,
                actual: self.image.len(),
            });
        }
        Ok(())
    }
}

impl Default for MapImageData {
    fn default() -> Self {
        Self {
            format: Self::MAGIC.to_string(),
            width: 0,
            height: 0,
            max_gray_value: 255,
            image: Vec::new(),
        }
    }
}

/// 地图元数据
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapMetaData {
    /// 分辨率（米/像素）
    pub resolution: f64,
    /// 地图原点位姿
    pub origin: Pose3DEuler,
    pub map_image_data: MapImageData,
}

/// 单张地图信息
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapInfo {
    pub map_name: String,
    pub map_meta_data: MapMetaData,
}

/// 地图库信息
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllMapInfo {
    /// 当前使用的地图名
    pub current_map_name: String,
    pub map_infos: Vec<MapInfo>,
}

/// 定位结果
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalizationInfo {
    /// 定位是否有效
    pub is_localization: bool,
    pub pose: Pose3DEuler,
}

/// 导航目标点
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavTarget {
    /// 目标 ID，用于在状态查询中关联
    pub id: i32,
    /// 目标位姿所在坐标系
    pub frame_id: String,
    pub goal: Pose3DEuler,
}

/// 导航任务状态查询结果
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavStatus {
    /// 对应 NavTarget 的 ID，无任务时为 -1
    pub id: i32,
    pub status: NavStatusType,
    pub error_code: i32,
    pub error_desc: String,
}

impl Default for NavStatus {
    fn default() -> Self {
        Self {
            id: -1,
            status: NavStatusType::None,
            error_code: 0,
            error_desc: String::new(),
        }
    }
}

/// 里程计遥测
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Odometry {
    pub header: Header,
    /// 子坐标系名称
    pub child_frame_id: String,
    /// 位置 (x, y, z)
    pub position: [f64; 3],
    /// 姿态四元数 (w, x, y, z)
    pub orientation: [f64; 4],
    /// 线速度（m/s）
    pub linear_velocity: [f64; 3],
    /// 角速度（rad/s）
    pub angular_velocity: [f64; 3],
}

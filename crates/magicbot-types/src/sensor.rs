//! 传感器遥测类型
//!
//! IMU、点云、图像、相机内参等结构与 ROS2 sensor_msgs 对齐。
//! 缓冲区解释前必须先通过 `validate` 做尺寸校验。

use crate::TypeError;

/// 通用消息头
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// 时间戳（纳秒）
    pub stamp: i64,
    /// 坐标系名称
    pub frame_id: String,
}

/// IMU 遥测数据
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Imu {
    /// 时间戳（纳秒）
    pub timestamp: i64,
    /// 姿态四元数，顺序 (w, x, y, z)
    pub orientation: [f64; 4],
    /// 角速度（rad/s）
    pub angular_velocity: [f64; 3],
    /// 线加速度（m/s²）
    pub linear_acceleration: [f64; 3],
    /// 温度（摄氏度）
    pub temperature: f32,
}

/// 点云字段描述
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointField {
    /// 字段名，如 "x"、"y"、"z"、"intensity"
    pub name: String,
    /// 起始字节偏移
    pub offset: i32,
    /// 数据类型常量（见关联常量）
    pub datatype: i8,
    /// 该字段包含的元素个数
    pub count: i32,
}

impl PointField {
    pub const INT8: i8 = 1;
    pub const UINT8: i8 = 2;
    pub const INT16: i8 = 3;
    pub const UINT16: i8 = 4;
    pub const INT32: i8 = 5;
    pub const UINT32: i8 = 6;
    pub const FLOAT32: i8 = 7;
    pub const FLOAT64: i8 = 8;
}

/// 通用点云数据，对齐 ROS2 sensor_msgs::msg::PointCloud2
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointCloud2 {
    pub header: Header,
    /// 行数
    pub height: i32,
    /// 列数
    pub width: i32,
    pub fields: Vec<PointField>,
    /// 字节序
    pub is_bigendian: bool,
    /// 每个点占用字节数
    pub point_step: i32,
    /// 每行占用字节数
    pub row_step: i32,
    /// 原始点云数据（按字段打包）
    pub data: Vec<u8>,
    /// 是否稠密（无无效点）
    pub is_dense: bool,
}

impl PointCloud2 {
    /// 校验缓冲区尺寸
    ///
    /// 要求 `data.len() == height * row_step` 且 `row_step >= width * point_step`；
    /// 不满足时缓冲区不可解释，禁止继续按字段读取。
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.height < 0 || self.width < 0 || self.point_step < 0 || self.row_step < 0 {
            return Err(TypeError::Malformed(
                "point cloud dimensions must be non-negative".to_string(),
            ));
        }
        let expected = self.height as usize * self.row_step as usize;
        if self.data.len() != expected {
            return Err(TypeError::SizeMismatch {
                field: "PointCloud2.data",
                expected,
                actual: self.data.len(),
            });
        }
        if (self.row_step as i64) < self.width as i64 * self.point_step as i64 {
            return Err(TypeError::Malformed(format!(
                "row_step {} smaller than width {} * point_step {}",
                self.row_step, self.width, self.point_step
            )));
        }
        Ok(())
    }
}

/// 图像数据，支持多种编码格式（"rgb8"、"mono8"、"bgr8" 等）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Image {
    pub header: Header,
    /// 图像高度（像素）
    pub height: i32,
    /// 图像宽度（像素）
    pub width: i32,
    /// 编码类型
    pub encoding: String,
    /// 是否大端字节序
    pub is_bigendian: bool,
    /// 每行占用字节数
    pub step: i32,
    pub data: Vec<u8>,
}

impl Image {
    /// 校验缓冲区尺寸：`data.len() == height * step`
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.height < 0 || self.step < 0 {
            return Err(TypeError::Malformed(
                "image dimensions must be non-negative".to_string(),
            ));
        }
        let expected = self.height as usize * self.step as usize;
        if self.data.len() != expected {
            return Err(TypeError::SizeMismatch {
                field: "Image.data",
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// 相机内参与畸变信息，通常与 Image 一同发布
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraInfo {
    pub header: Header,
    pub height: i32,
    pub width: i32,
    /// 畸变模型，如 "plumb_bob"
    pub distortion_model: String,
    /// 畸变参数数组
    pub d: Vec<f64>,
    /// 内参矩阵
    pub k: [f64; 9],
    /// 矫正矩阵
    pub r: [f64; 9],
    /// 投影矩阵
    pub p: [f64; 12],
    pub binning_x: i32,
    pub binning_y: i32,
    pub roi_x_offset: i32,
    pub roi_y_offset: i32,
    pub roi_height: i32,
    pub roi_width: i32,
    pub roi_do_rectify: bool,
}

/// 双目相机帧，左右眼图像水平拼接
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinocularCameraFrame {
    pub header: Header,
    pub format: String,
    /// 左半为左眼、右半为右眼
    pub data: Vec<u8>,
}

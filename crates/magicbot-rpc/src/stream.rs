//! 遥测流模型
//!
//! 机器人以固定频率推送遥测数据（关节状态 500Hz、IMU 1000Hz、
//! 点云 10Hz 等）。每条推送在传输层表达为一个 [`TelemetryEvent`]，
//! 载荷用 `Arc` 包裹，分发到多个订阅者时只复制指针。
//!
//! [`StreamKind`] 是事件的无载荷判别标签，客户端用它做路由。

use magicbot_types::{
    AudioStream, BinocularCameraFrame, CameraInfo, HandState, Image, Imu, JointState, Odometry,
    PointCloud2, WakeupStatus,
};
use std::sync::Arc;

/// 遥测流类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// 原始麦克风音频
    OriginAudio,
    /// 波束成形（降噪）音频
    BfAudio,
    /// 语音唤醒状态
    WakeupStatus,
    /// 手臂关节状态（14 关节）
    ArmJointState,
    /// 腿部关节状态（12 关节）
    LegJointState,
    /// 头部关节状态（2 关节）
    HeadJointState,
    /// 腰部关节状态
    WaistJointState,
    /// 灵巧手状态
    HandState,
    /// 躯干 IMU
    BodyImu,
    /// 激光雷达 IMU
    LidarImu,
    /// 激光雷达点云
    LidarPointCloud,
    /// 头部 RGBD 彩色图
    HeadRgbdColorImage,
    /// 头部 RGBD 深度图
    HeadRgbdDepthImage,
    /// 头部 RGBD 相机内参
    HeadRgbdCameraInfo,
    /// 双目相机帧
    BinocularImage,
    /// 双目相机内参
    BinocularCameraInfo,
    /// 里程计
    Odometry,
}

impl StreamKind {
    /// 全部流类别，按固定顺序
    pub const ALL: [StreamKind; 17] = [
        StreamKind::OriginAudio,
        StreamKind::BfAudio,
        StreamKind::WakeupStatus,
        StreamKind::ArmJointState,
        StreamKind::LegJointState,
        StreamKind::HeadJointState,
        StreamKind::WaistJointState,
        StreamKind::HandState,
        StreamKind::BodyImu,
        StreamKind::LidarImu,
        StreamKind::LidarPointCloud,
        StreamKind::HeadRgbdColorImage,
        StreamKind::HeadRgbdDepthImage,
        StreamKind::HeadRgbdCameraInfo,
        StreamKind::BinocularImage,
        StreamKind::BinocularCameraInfo,
        StreamKind::Odometry,
    ];
}

/// 遥测事件
///
/// 载荷统一为 `Arc<T>`：传输层构造一次，客户端层分发给任意多个
/// 订阅回调而不复制数据。
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    OriginAudio(Arc<AudioStream>),
    BfAudio(Arc<AudioStream>),
    WakeupStatus(Arc<WakeupStatus>),
    ArmJointState(Arc<JointState>),
    LegJointState(Arc<JointState>),
    HeadJointState(Arc<JointState>),
    WaistJointState(Arc<JointState>),
    HandState(Arc<HandState>),
    BodyImu(Arc<Imu>),
    LidarImu(Arc<Imu>),
    LidarPointCloud(Arc<PointCloud2>),
    HeadRgbdColorImage(Arc<Image>),
    HeadRgbdDepthImage(Arc<Image>),
    HeadRgbdCameraInfo(Arc<CameraInfo>),
    BinocularImage(Arc<BinocularCameraFrame>),
    BinocularCameraInfo(Arc<CameraInfo>),
    Odometry(Arc<Odometry>),
}

impl TelemetryEvent {
    /// 事件所属的流类别
    pub fn kind(&self) -> StreamKind {
        match self {
            TelemetryEvent::OriginAudio(_) => StreamKind::OriginAudio,
            TelemetryEvent::BfAudio(_) => StreamKind::BfAudio,
            TelemetryEvent::WakeupStatus(_) => StreamKind::WakeupStatus,
            TelemetryEvent::ArmJointState(_) => StreamKind::ArmJointState,
            TelemetryEvent::LegJointState(_) => StreamKind::LegJointState,
            TelemetryEvent::HeadJointState(_) => StreamKind::HeadJointState,
            TelemetryEvent::WaistJointState(_) => StreamKind::WaistJointState,
            TelemetryEvent::HandState(_) => StreamKind::HandState,
            TelemetryEvent::BodyImu(_) => StreamKind::BodyImu,
            TelemetryEvent::LidarImu(_) => StreamKind::LidarImu,
            TelemetryEvent::LidarPointCloud(_) => StreamKind::LidarPointCloud,
            TelemetryEvent::HeadRgbdColorImage(_) => StreamKind::HeadRgbdColorImage,
            TelemetryEvent::HeadRgbdDepthImage(_) => StreamKind::HeadRgbdDepthImage,
            TelemetryEvent::HeadRgbdCameraInfo(_) => StreamKind::HeadRgbdCameraInfo,
            TelemetryEvent::BinocularImage(_) => StreamKind::BinocularImage,
            TelemetryEvent::BinocularCameraInfo(_) => StreamKind::BinocularCameraInfo,
            TelemetryEvent::Odometry(_) => StreamKind::Odometry,
        }
    }
}

//! 传感器控制器：激光雷达、头部 RGBD、双目相机的开关与订阅

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use magicbot_rpc::Request;
use magicbot_types::{BinocularCameraFrame, CameraInfo, Image, Imu, PointCloud2};
use tracing::debug;

use crate::context::RobotContext;
use crate::error::ClientError;

/// 传感器控制器
///
/// 开关控制的是机器人侧的推流；订阅控制的是本地回调。两者独立：
/// 先订阅后开流、先开流后订阅都可以，未开流时订阅的回调收不到数据。
pub struct SensorController {
    ctx: Arc<RobotContext>,
    ready: AtomicBool,
}

impl SensorController {
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
        self.ctx.router.lidar_imu.unsubscribe();
        self.ctx.router.lidar_point_cloud.unsubscribe();
        self.ctx.router.head_rgbd_color_image.unsubscribe();
        self.ctx.router.head_rgbd_depth_image.unsubscribe();
        self.ctx.router.head_rgbd_camera_info.unsubscribe();
        self.ctx.router.binocular_image.unsubscribe();
        self.ctx.router.binocular_camera_info.unsubscribe();
        debug!("sensor controller shut down");
    }

    fn require_ready(&self) -> Result<(), ClientError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(ClientError::NotInitialized);
        }
        Ok(())
    }

    /// 打开激光雷达推流（IMU + 点云）
    pub fn open_lidar(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::OpenLidar, self.ctx.timeout())
    }

    /// 关闭激光雷达推流
    pub fn close_lidar(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::CloseLidar, self.ctx.timeout())
    }

    /// 打开头部 RGBD 相机推流（彩色 + 深度 + 内参）
    pub fn open_head_rgbd_camera(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::OpenHeadRgbdCamera, self.ctx.timeout())
    }

    /// 关闭头部 RGBD 相机推流
    pub fn close_head_rgbd_camera(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::CloseHeadRgbdCamera, self.ctx.timeout())
    }

    /// 打开双目相机推流
    pub fn open_binocular_camera(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::OpenBinocularCamera, self.ctx.timeout())
    }

    /// 关闭双目相机推流
    pub fn close_binocular_camera(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::CloseBinocularCamera, self.ctx.timeout())
    }

    /// 订阅激光雷达 IMU
    pub fn subscribe_lidar_imu<F>(&self, callback: F)
    where
        F: Fn(Arc<Imu>) + Send + Sync + 'static,
    {
        self.ctx.router.lidar_imu.subscribe(callback);
    }

    pub fn unsubscribe_lidar_imu(&self) {
        self.ctx.router.lidar_imu.unsubscribe();
    }

    /// 订阅激光雷达点云
    pub fn subscribe_lidar_point_cloud<F>(&self, callback: F)
    where
        F: Fn(Arc<PointCloud2>) + Send + Sync + 'static,
    {
        self.ctx.router.lidar_point_cloud.subscribe(callback);
    }

    pub fn unsubscribe_lidar_point_cloud(&self) {
        self.ctx.router.lidar_point_cloud.unsubscribe();
    }

    /// 订阅头部 RGBD 彩色图
    pub fn subscribe_head_rgbd_color_image<F>(&self, callback: F)
    where
        F: Fn(Arc<Image>) + Send + Sync + 'static,
    {
        self.ctx.router.head_rgbd_color_image.subscribe(callback);
    }

    pub fn unsubscribe_head_rgbd_color_image(&self) {
        self.ctx.router.head_rgbd_color_image.unsubscribe();
    }

    /// 订阅头部 RGBD 深度图
    pub fn subscribe_head_rgbd_depth_image<F>(&self, callback: F)
    where
        F: Fn(Arc<Image>) + Send + Sync + 'static,
    {
        self.ctx.router.head_rgbd_depth_image.subscribe(callback);
    }

    pub fn unsubscribe_head_rgbd_depth_image(&self) {
        self.ctx.router.head_rgbd_depth_image.unsubscribe();
    }

    /// 订阅头部 RGBD 相机内参
    pub fn subscribe_head_rgbd_camera_info<F>(&self, callback: F)
    where
        F: Fn(Arc<CameraInfo>) + Send + Sync + 'static,
    {
        self.ctx.router.head_rgbd_camera_info.subscribe(callback);
    }

    pub fn unsubscribe_head_rgbd_camera_info(&self) {
        self.ctx.router.head_rgbd_camera_info.unsubscribe();
    }

    /// 订阅双目图像（左右拼接帧）
    pub fn subscribe_binocular_image<F>(&self, callback: F)
    where
        F: Fn(Arc<BinocularCameraFrame>) + Send + Sync + 'static,
    {
        self.ctx.router.binocular_image.subscribe(callback);
    }

    pub fn unsubscribe_binocular_image(&self) {
        self.ctx.router.binocular_image.unsubscribe();
    }

    /// 订阅双目相机内参
    pub fn subscribe_binocular_camera_info<F>(&self, callback: F)
    where
        F: Fn(Arc<CameraInfo>) + Send + Sync + 'static,
    {
        self.ctx.router.binocular_camera_info.subscribe(callback);
    }

    pub fn unsubscribe_binocular_camera_info(&self) {
        self.ctx.router.binocular_camera_info.unsubscribe();
    }
}

//! SLAM 与导航控制器：建图、地图管理、重定位、目标点导航、里程计

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use magicbot_rpc::{Request, Response};
use magicbot_types::{
    AllMapInfo, LocalizationInfo, NavMode, NavStatus, NavTarget, Odometry, PointCloud2,
    Pose3DEuler, SlamMode,
};
use tracing::debug;

use crate::context::{RobotContext, unexpected};
use crate::error::ClientError;

/// SLAM / 导航控制器
///
/// 模式切换与任务控制全部是同步调用；任务的执行进度通过轮询
/// [`get_nav_task_status`](Self::get_nav_task_status) 获取。
pub struct SlamNavController {
    ctx: Arc<RobotContext>,
    ready: AtomicBool,
}

impl SlamNavController {
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
        self.ctx.router.odometry.unsubscribe();
        debug!("slam nav controller shut down");
    }

    fn require_ready(&self) -> Result<(), ClientError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(ClientError::NotInitialized);
        }
        Ok(())
    }

    /// 切换 SLAM 模式
    ///
    /// `Localization` 模式必须携带非空 `map_path`，该校验在客户端完成，
    /// 不会发往后端。
    pub fn activate_slam_mode(&self, mode: SlamMode, map_path: &str) -> Result<(), ClientError> {
        self.activate_slam_mode_timeout(mode, map_path, self.ctx.timeout())
    }

    /// [`activate_slam_mode`](Self::activate_slam_mode) 的显式超时版本
    pub fn activate_slam_mode_timeout(
        &self,
        mode: SlamMode,
        map_path: &str,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.require_ready()?;
        if mode == SlamMode::Localization && map_path.is_empty() {
            return Err(ClientError::InvalidArgument(
                "localization mode requires a map path".to_string(),
            ));
        }
        self.ctx.expect_ack(
            Request::ActivateSlamMode {
                mode,
                map_path: map_path.to_string(),
            },
            timeout,
        )
    }

    /// 开始建图，要求当前处于 `Mapping` 模式
    pub fn start_mapping(&self) -> Result<(), ClientError> {
        self.start_mapping_timeout(self.ctx.timeout())
    }

    pub fn start_mapping_timeout(&self, timeout: Duration) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::StartMapping, timeout)
    }

    /// 放弃当前建图会话
    pub fn cancel_mapping(&self) -> Result<(), ClientError> {
        self.cancel_mapping_timeout(self.ctx.timeout())
    }

    pub fn cancel_mapping_timeout(&self, timeout: Duration) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::CancelMapping, timeout)
    }

    /// 结束建图会话并以 `map_name` 保存地图
    pub fn save_map(&self, map_name: &str) -> Result<(), ClientError> {
        self.save_map_timeout(map_name, self.ctx.timeout())
    }

    pub fn save_map_timeout(&self, map_name: &str, timeout: Duration) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(
            Request::SaveMap {
                map_name: map_name.to_string(),
            },
            timeout,
        )
    }

    /// 加载已保存的地图为当前地图
    pub fn load_map(&self, map_name: &str) -> Result<(), ClientError> {
        self.load_map_timeout(map_name, self.ctx.timeout())
    }

    pub fn load_map_timeout(&self, map_name: &str, timeout: Duration) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(
            Request::LoadMap {
                map_name: map_name.to_string(),
            },
            timeout,
        )
    }

    /// 删除已保存的地图
    pub fn delete_map(&self, map_name: &str) -> Result<(), ClientError> {
        self.delete_map_timeout(map_name, self.ctx.timeout())
    }

    pub fn delete_map_timeout(&self, map_name: &str, timeout: Duration) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(
            Request::DeleteMap {
                map_name: map_name.to_string(),
            },
            timeout,
        )
    }

    /// 查询地图的存储路径
    pub fn get_map_path(&self, map_name: &str) -> Result<Vec<String>, ClientError> {
        self.get_map_path_timeout(map_name, self.ctx.timeout())
    }

    pub fn get_map_path_timeout(
        &self,
        map_name: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, ClientError> {
        self.require_ready()?;
        let request = Request::GetMapPath {
            map_name: map_name.to_string(),
        };
        match self.ctx.call(request, timeout)? {
            Response::MapPath(paths) => Ok(paths),
            other => Err(unexpected("GetMapPath", &other)),
        }
    }

    /// 查询全部地图的元信息
    pub fn get_all_map_info(&self) -> Result<AllMapInfo, ClientError> {
        self.get_all_map_info_timeout(self.ctx.timeout())
    }

    pub fn get_all_map_info_timeout(&self, timeout: Duration) -> Result<AllMapInfo, ClientError> {
        self.require_ready()?;
        match self.ctx.call(Request::GetAllMapInfo, timeout)? {
            Response::AllMapInfo(info) => Ok(info),
            other => Err(unexpected("GetAllMapInfo", &other)),
        }
    }

    /// 下发重定位初始位姿，要求当前处于 `Localization` 模式
    pub fn init_pose(&self, pose: &Pose3DEuler) -> Result<(), ClientError> {
        self.init_pose_timeout(pose, self.ctx.timeout())
    }

    pub fn init_pose_timeout(
        &self,
        pose: &Pose3DEuler,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::InitPose(*pose), timeout)
    }

    /// 查询当前重定位结果
    pub fn get_current_localization_info(&self) -> Result<LocalizationInfo, ClientError> {
        self.require_ready()?;
        match self
            .ctx
            .call(Request::GetLocalizationInfo, self.ctx.timeout())?
        {
            Response::LocalizationInfo(info) => Ok(info),
            other => Err(unexpected("GetLocalizationInfo", &other)),
        }
    }

    /// 获取当前地图的点云形式
    pub fn get_point_cloud_map(&self) -> Result<PointCloud2, ClientError> {
        self.get_point_cloud_map_timeout(self.ctx.timeout())
    }

    pub fn get_point_cloud_map_timeout(
        &self,
        timeout: Duration,
    ) -> Result<PointCloud2, ClientError> {
        self.require_ready()?;
        match self.ctx.call(Request::GetPointCloudMap, timeout)? {
            Response::PointCloudMap(cloud) => Ok(cloud),
            other => Err(unexpected("GetPointCloudMap", &other)),
        }
    }

    /// 切换导航模式
    ///
    /// `GridMap` 模式必须携带非空 `map_path`，该校验在客户端完成。
    pub fn activate_nav_mode(&self, mode: NavMode, map_path: &str) -> Result<(), ClientError> {
        self.activate_nav_mode_timeout(mode, map_path, self.ctx.timeout())
    }

    /// [`activate_nav_mode`](Self::activate_nav_mode) 的显式超时版本
    pub fn activate_nav_mode_timeout(
        &self,
        mode: NavMode,
        map_path: &str,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.require_ready()?;
        if mode == NavMode::GridMap && map_path.is_empty() {
            return Err(ClientError::InvalidArgument(
                "grid map navigation requires a map path".to_string(),
            ));
        }
        self.ctx.expect_ack(
            Request::ActivateNavMode {
                mode,
                map_path: map_path.to_string(),
            },
            timeout,
        )
    }

    /// 下发导航目标点，任务进入 `Running`
    pub fn set_nav_target(&self, target: &NavTarget) -> Result<(), ClientError> {
        self.set_nav_target_timeout(target, self.ctx.timeout())
    }

    pub fn set_nav_target_timeout(
        &self,
        target: &NavTarget,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::SetNavTarget(target.clone()), timeout)
    }

    /// 暂停进行中的导航任务
    pub fn pause_nav_task(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::PauseNavTask, self.ctx.timeout())
    }

    /// 恢复已暂停的导航任务
    pub fn resume_nav_task(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::ResumeNavTask, self.ctx.timeout())
    }

    /// 取消导航任务
    pub fn cancel_nav_task(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::CancelNavTask, self.ctx.timeout())
    }

    /// 查询导航任务状态
    pub fn get_nav_task_status(&self) -> Result<NavStatus, ClientError> {
        self.require_ready()?;
        match self.ctx.call(Request::GetNavTaskStatus, self.ctx.timeout())? {
            Response::NavTaskStatus(status) => Ok(status),
            other => Err(unexpected("GetNavTaskStatus", &other)),
        }
    }

    /// 打开里程计推流
    pub fn open_odometry_stream(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::OpenOdometryStream, self.ctx.timeout())
    }

    /// 关闭里程计推流
    pub fn close_odometry_stream(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::CloseOdometryStream, self.ctx.timeout())
    }

    /// 订阅里程计
    pub fn subscribe_odometry<F>(&self, callback: F)
    where
        F: Fn(Arc<Odometry>) + Send + Sync + 'static,
    {
        self.ctx.router.odometry.subscribe(callback);
    }

    pub fn unsubscribe_odometry(&self) {
        self.ctx.router.odometry.unsubscribe();
    }
}

//! 控制通道消息
//!
//! [`Request`] 覆盖机器人控制通道上的全部同步操作；[`Response`] 是
//! 对应的应答载荷。无返回数据的操作统一应答 [`Response::Ack`]。
//!
//! 连接与断开不是消息：它们是 [`Transport`](crate::Transport) 的
//! 生命周期方法，不走 `call` 通道。

use magicbot_types::{
    AllMapInfo, BodyPart, ControllerLevel, GaitMode, HandCommand, JointCommand, JoystickCommand,
    LocalizationInfo, NavMode, NavStatus, NavTarget, PointCloud2, Pose3DEuler, RobotState,
    SlamMode, TrickAction, TtsCommand,
};

/// 控制通道请求
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Request {
    // ===== 控制级别 =====
    /// 切换运动控制级别（高层语义指令 / 低层关节流）
    SetMotionControlLevel(ControllerLevel),
    /// 查询当前运动控制级别
    GetMotionControlLevel,

    // ===== 音频 =====
    /// 播报 TTS 任务
    PlayTts(TtsCommand),
    /// 停止播报并清空全部队列
    StopTts,
    /// 设置音量（0-100）
    SetVolume(i32),
    /// 查询音量
    GetVolume,
    /// 打开原始/降噪音频推流
    OpenAudioStream,
    /// 关闭音频推流
    CloseAudioStream,
    /// 打开语音唤醒状态推流
    OpenWakeupStatusStream,
    /// 关闭语音唤醒状态推流
    CloseWakeupStatusStream,

    // ===== 高层运动 =====
    /// 切换步态
    SetGait(GaitMode),
    /// 查询当前步态
    GetGait,
    /// 执行特技动作
    ExecuteTrick(TrickAction),
    /// 下发摇杆指令（各轴 [-1.0, 1.0]）
    SendJoystickCommand(JoystickCommand),
    /// 头部摆动到指定角度
    HeadMove {
        /// 摆动角度（弧度，合法范围约 ±0.698）
        shake_angle: f32,
    },

    // ===== 低层运动 =====
    /// 下发部位关节指令
    PublishJointCommand {
        part: BodyPart,
        command: JointCommand,
    },
    /// 下发灵巧手指令
    PublishHandCommand(HandCommand),
    /// 设置低层控制周期（毫秒）
    SetPeriodMs(u64),

    // ===== 传感器开关 =====
    /// 打开激光雷达（IMU + 点云推流）
    OpenLidar,
    /// 关闭激光雷达
    CloseLidar,
    /// 打开头部 RGBD 相机（彩色/深度图 + 内参推流）
    OpenHeadRgbdCamera,
    /// 关闭头部 RGBD 相机
    CloseHeadRgbdCamera,
    /// 打开双目相机
    OpenBinocularCamera,
    /// 关闭双目相机
    CloseBinocularCamera,

    // ===== SLAM =====
    /// 切换 SLAM 模式（定位模式必须携带非空地图路径）
    ActivateSlamMode { mode: SlamMode, map_path: String },
    /// 开始建图（要求处于建图模式）
    StartMapping,
    /// 取消当前建图
    CancelMapping,
    /// 结束建图并以指定名称保存地图
    SaveMap { map_name: String },
    /// 加载已保存的地图
    LoadMap { map_name: String },
    /// 删除已保存的地图
    DeleteMap { map_name: String },
    /// 查询地图存储路径
    GetMapPath { map_name: String },
    /// 查询全部地图信息
    GetAllMapInfo,
    /// 设置定位初始位姿（要求处于定位模式）
    InitPose(Pose3DEuler),
    /// 查询定位状态
    GetLocalizationInfo,
    /// 获取当前地图的点云
    GetPointCloudMap,

    // ===== 导航 =====
    /// 切换导航模式（栅格导航必须携带非空地图路径）
    ActivateNavMode { mode: NavMode, map_path: String },
    /// 下发导航目标点
    SetNavTarget(NavTarget),
    /// 暂停当前导航任务
    PauseNavTask,
    /// 恢复当前导航任务
    ResumeNavTask,
    /// 取消当前导航任务
    CancelNavTask,
    /// 查询导航任务状态
    GetNavTaskStatus,
    /// 打开里程计推流
    OpenOdometryStream,
    /// 关闭里程计推流
    CloseOdometryStream,

    // ===== 状态监控 =====
    /// 查询机器人故障与电池状态
    GetRobotState,
}

impl Request {
    /// 请求名，用于日志与错误信息
    pub fn name(&self) -> &'static str {
        match self {
            Request::SetMotionControlLevel(_) => "SetMotionControlLevel",
            Request::GetMotionControlLevel => "GetMotionControlLevel",
            Request::PlayTts(_) => "PlayTts",
            Request::StopTts => "StopTts",
            Request::SetVolume(_) => "SetVolume",
            Request::GetVolume => "GetVolume",
            Request::OpenAudioStream => "OpenAudioStream",
            Request::CloseAudioStream => "CloseAudioStream",
            Request::OpenWakeupStatusStream => "OpenWakeupStatusStream",
            Request::CloseWakeupStatusStream => "CloseWakeupStatusStream",
            Request::SetGait(_) => "SetGait",
            Request::GetGait => "GetGait",
            Request::ExecuteTrick(_) => "ExecuteTrick",
            Request::SendJoystickCommand(_) => "SendJoystickCommand",
            Request::HeadMove { .. } => "HeadMove",
            Request::PublishJointCommand { .. } => "PublishJointCommand",
            Request::PublishHandCommand(_) => "PublishHandCommand",
            Request::SetPeriodMs(_) => "SetPeriodMs",
            Request::OpenLidar => "OpenLidar",
            Request::CloseLidar => "CloseLidar",
            Request::OpenHeadRgbdCamera => "OpenHeadRgbdCamera",
            Request::CloseHeadRgbdCamera => "CloseHeadRgbdCamera",
            Request::OpenBinocularCamera => "OpenBinocularCamera",
            Request::CloseBinocularCamera => "CloseBinocularCamera",
            Request::ActivateSlamMode { .. } => "ActivateSlamMode",
            Request::StartMapping => "StartMapping",
            Request::CancelMapping => "CancelMapping",
            Request::SaveMap { .. } => "SaveMap",
            Request::LoadMap { .. } => "LoadMap",
            Request::DeleteMap { .. } => "DeleteMap",
            Request::GetMapPath { .. } => "GetMapPath",
            Request::GetAllMapInfo => "GetAllMapInfo",
            Request::InitPose(_) => "InitPose",
            Request::GetLocalizationInfo => "GetLocalizationInfo",
            Request::GetPointCloudMap => "GetPointCloudMap",
            Request::ActivateNavMode { .. } => "ActivateNavMode",
            Request::SetNavTarget(_) => "SetNavTarget",
            Request::PauseNavTask => "PauseNavTask",
            Request::ResumeNavTask => "ResumeNavTask",
            Request::CancelNavTask => "CancelNavTask",
            Request::GetNavTaskStatus => "GetNavTaskStatus",
            Request::OpenOdometryStream => "OpenOdometryStream",
            Request::CloseOdometryStream => "CloseOdometryStream",
            Request::GetRobotState => "GetRobotState",
        }
    }
}

/// 控制通道应答
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Response {
    /// 操作成功且无返回数据
    Ack,
    /// 当前运动控制级别
    MotionControlLevel(ControllerLevel),
    /// 当前音量
    Volume(i32),
    /// 当前步态
    Gait(GaitMode),
    /// 机器人故障与电池状态
    RobotState(RobotState),
    /// 地图存储路径列表
    MapPath(Vec<String>),
    /// 全部地图信息
    AllMapInfo(AllMapInfo),
    /// 定位状态
    LocalizationInfo(LocalizationInfo),
    /// 导航任务状态
    NavTaskStatus(NavStatus),
    /// 当前地图点云
    PointCloudMap(PointCloud2),
}

impl Response {
    /// 应答名，用于日志与错误信息
    pub fn name(&self) -> &'static str {
        match self {
            Response::Ack => "Ack",
            Response::MotionControlLevel(_) => "MotionControlLevel",
            Response::Volume(_) => "Volume",
            Response::Gait(_) => "Gait",
            Response::RobotState(_) => "RobotState",
            Response::MapPath(_) => "MapPath",
            Response::AllMapInfo(_) => "AllMapInfo",
            Response::LocalizationInfo(_) => "LocalizationInfo",
            Response::NavTaskStatus(_) => "NavTaskStatus",
            Response::PointCloudMap(_) => "PointCloudMap",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_name() {
        assert_eq!(Request::GetVolume.name(), "GetVolume");
        assert_eq!(
            Request::SaveMap {
                map_name: "office".into()
            }
            .name(),
            "SaveMap"
        );
        assert_eq!(
            Request::SetMotionControlLevel(ControllerLevel::HighLevel).name(),
            "SetMotionControlLevel"
        );
    }

    #[test]
    fn test_response_name() {
        assert_eq!(Response::Ack.name(), "Ack");
        assert_eq!(Response::Volume(30).name(), "Volume");
        assert_eq!(
            Response::Gait(GaitMode::BalanceStand).name(),
            "Gait"
        );
    }

    #[test]
    fn test_request_equality() {
        assert_eq!(
            Request::SetGait(GaitMode::HumanoidWalk),
            Request::SetGait(GaitMode::HumanoidWalk)
        );
        assert_ne!(
            Request::SetGait(GaitMode::HumanoidWalk),
            Request::SetGait(GaitMode::Passive)
        );
    }
}

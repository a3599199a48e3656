//! 建图 / 定位 / 导航场景测试
//!
//! 按真机操作顺序走完整条链路：建图模式 → 开始建图 → 保存地图 →
//! 定位模式 → 初始位姿 → 导航模式 → 下发目标 → 暂停 / 恢复 / 取消，
//! 外加地图库管理与点云地图获取。

use magicbot_sdk::ClientError;
use magicbot_sdk::prelude::*;
use magicbot_sdk::rpc::MockTransport;
use magicbot_sdk::types::{NavStatusType, NavTarget, Pose3DEuler};

const LOCAL_IP: &str = "192.168.54.111";

fn connected() -> (MagicRobot, MockTransport) {
    let (robot, mock) = RobotBuilder::new().build_mock();
    assert!(robot.initialize(LOCAL_IP));
    robot.connect().unwrap();
    (robot, mock)
}

/// 建图模式下录一张地图并保存
fn build_map(robot: &MagicRobot, name: &str) {
    let slam = robot.slam_nav();
    slam.activate_slam_mode(SlamMode::Mapping, "").unwrap();
    slam.start_mapping().unwrap();
    slam.save_map(name).unwrap();
}

#[test]
fn test_mapping_to_localization_flow() {
    let (robot, _mock) = connected();
    let slam = robot.slam_nav();

    build_map(&robot, "office");

    assert_eq!(
        slam.get_map_path("office").unwrap(),
        vec!["/home/magic/maps/office".to_string()]
    );
    assert!(slam.get_map_path("unknown").is_err());
    let info = slam.get_all_map_info().unwrap();
    assert_eq!(info.current_map_name, "office");
    assert_eq!(info.map_infos.len(), 1);

    slam.activate_slam_mode(SlamMode::Localization, "/home/magic/maps/office")
        .unwrap();
    let pose = Pose3DEuler {
        position: [1.0, 2.0, 0.0],
        orientation: [0.0, 0.0, 0.5],
    };
    slam.init_pose(&pose).unwrap();

    let loc = slam.get_current_localization_info().unwrap();
    assert!(loc.is_localization);
    assert_eq!(loc.pose, pose);
}

#[test]
fn test_empty_map_path_fails_without_mode_change() {
    let (robot, _mock) = connected();
    let slam = robot.slam_nav();

    let err = slam
        .activate_slam_mode(SlamMode::Localization, "")
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
    assert_eq!(err.code(), ErrorCode::InternalError);

    // 模式未被改动：初始位姿仍因不在定位模式被后端拒绝
    let err = slam.init_pose(&Pose3DEuler::default()).unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }));
}

#[test]
fn test_save_map_requires_active_session() {
    let (robot, _mock) = connected();
    let slam = robot.slam_nav();

    slam.activate_slam_mode(SlamMode::Mapping, "").unwrap();
    let err = slam.save_map("premature").unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }));
}

#[test]
fn test_point_cloud_map_requires_loaded_map() {
    let (robot, _mock) = connected();
    let slam = robot.slam_nav();

    assert!(slam.get_point_cloud_map().is_err());

    build_map(&robot, "hall");
    let cloud = slam.get_point_cloud_map().unwrap();
    assert_eq!(cloud.header.frame_id, "hall");
    assert!(cloud.validate().is_ok());
}

#[test]
fn test_map_library_management() {
    let (robot, _mock) = connected();
    let slam = robot.slam_nav();

    build_map(&robot, "a");
    build_map(&robot, "b");

    let info = slam.get_all_map_info().unwrap();
    assert_eq!(info.map_infos.len(), 2);
    assert_eq!(info.current_map_name, "b");

    slam.load_map("a").unwrap();
    assert_eq!(slam.get_all_map_info().unwrap().current_map_name, "a");

    slam.delete_map("b").unwrap();
    assert_eq!(slam.get_all_map_info().unwrap().map_infos.len(), 1);

    // 已删除的地图不能再载入
    let err = slam.load_map("b").unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }));
}

#[test]
fn test_navigation_task_progression() {
    let (robot, mock) = connected();
    let slam = robot.slam_nav();

    build_map(&robot, "floor2");
    slam.activate_nav_mode(NavMode::GridMap, "/home/magic/maps/floor2")
        .unwrap();

    let target = NavTarget {
        id: 7,
        frame_id: "map".to_string(),
        goal: Pose3DEuler::default(),
    };
    slam.set_nav_target(&target).unwrap();
    assert_eq!(
        slam.get_nav_task_status().unwrap().status,
        NavStatusType::Running
    );

    slam.pause_nav_task().unwrap();
    assert_eq!(
        slam.get_nav_task_status().unwrap().status,
        NavStatusType::Pause
    );
    slam.resume_nav_task().unwrap();
    assert_eq!(
        slam.get_nav_task_status().unwrap().status,
        NavStatusType::Continue
    );

    assert!(mock.complete_nav_task(true));
    let status = slam.get_nav_task_status().unwrap();
    assert_eq!(status.status, NavStatusType::EndSuccess);
    assert_eq!(status.id, 7);
    assert_eq!(status.error_code, 0);
}

#[test]
fn test_failed_navigation_reports_error() {
    let (robot, mock) = connected();
    let slam = robot.slam_nav();

    build_map(&robot, "yard");
    slam.activate_nav_mode(NavMode::GridMap, "/home/magic/maps/yard")
        .unwrap();
    slam.set_nav_target(&NavTarget::default()).unwrap();

    assert!(mock.complete_nav_task(false));
    let status = slam.get_nav_task_status().unwrap();
    assert_eq!(status.status, NavStatusType::EndFailed);
    assert_eq!(status.error_code, 1);
    assert!(!status.error_desc.is_empty());
}

#[test]
fn test_cancel_terminates_task() {
    let (robot, _mock) = connected();
    let slam = robot.slam_nav();

    build_map(&robot, "lab");
    slam.activate_nav_mode(NavMode::GridMap, "/home/magic/maps/lab")
        .unwrap();
    slam.set_nav_target(&NavTarget::default()).unwrap();

    slam.cancel_nav_task().unwrap();
    assert_eq!(
        slam.get_nav_task_status().unwrap().status,
        NavStatusType::Cancel
    );

    // 已取消的任务不能暂停
    assert!(slam.pause_nav_task().is_err());
}

#[test]
fn test_grid_map_activation_requires_path() {
    let (robot, _mock) = connected();
    let slam = robot.slam_nav();

    let err = slam.activate_nav_mode(NavMode::GridMap, "").unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));

    // 空路径未触达后端，目标下发仍因导航模式未激活被拒绝
    let err = slam.set_nav_target(&NavTarget::default()).unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }));
}

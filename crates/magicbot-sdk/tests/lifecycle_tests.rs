//! 生命周期集成测试
//!
//! 覆盖门面的完整使用路径：
//! - initialize / connect / disconnect / shutdown / 重新初始化
//! - 错误分类（未初始化、未连接、超时、后端拒绝）
//! - 故障注入与恢复

use std::time::Duration;

use magicbot_sdk::ClientError;
use magicbot_sdk::prelude::*;
use magicbot_sdk::rpc::{MockTransport, RpcError};

const LOCAL_IP: &str = "192.168.54.111";

fn mock_robot() -> (MagicRobot, MockTransport) {
    RobotBuilder::new().timeout_ms(500).build_mock()
}

fn connected() -> (MagicRobot, MockTransport) {
    let (robot, mock) = mock_robot();
    assert!(robot.initialize(LOCAL_IP));
    robot.connect().unwrap();
    (robot, mock)
}

#[test]
fn test_end_to_end_volume_roundtrip() {
    let (robot, _mock) = mock_robot();
    assert!(robot.initialize(LOCAL_IP));
    robot.connect().unwrap();

    robot.audio().set_volume(50).unwrap();
    assert_eq!(robot.audio().get_volume().unwrap(), 50);

    robot.disconnect().unwrap();
}

#[test]
fn test_connect_before_initialize_is_rejected() {
    let (robot, _mock) = mock_robot();
    let err = robot.connect().unwrap_err();
    assert_eq!(err, ClientError::NotInitialized);
    assert_eq!(err.code(), ErrorCode::ServiceNotReady);
}

#[test]
fn test_calls_before_connect_map_to_service_not_ready() {
    let (robot, _mock) = mock_robot();
    assert!(robot.initialize(LOCAL_IP));

    let err = robot.audio().get_volume().unwrap_err();
    assert!(matches!(err, ClientError::Rpc(RpcError::NotConnected)));
    assert_eq!(err.code(), ErrorCode::ServiceNotReady);
}

#[test]
fn test_double_initialize_and_double_connect() {
    let (robot, _mock) = mock_robot();
    assert!(robot.initialize(LOCAL_IP));
    assert!(!robot.initialize(LOCAL_IP));

    robot.connect().unwrap();
    assert_eq!(robot.connect().unwrap_err(), ClientError::AlreadyConnected);
}

#[test]
fn test_injected_connect_failure_propagates() {
    let (robot, mock) = mock_robot();
    assert!(robot.initialize(LOCAL_IP));

    mock.inject_failure(RpcError::Timeout);
    let err = robot.connect().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Timeout);
    assert!(!robot.is_connected());

    // 注入是一次性的，重试成功
    robot.connect().unwrap();
    assert!(robot.is_connected());
}

#[test]
fn test_latency_beyond_timeout_yields_timeout() {
    let (robot, mock) = connected();

    mock.set_latency(Duration::from_millis(100));
    robot.set_timeout(Duration::from_millis(20));
    let err = robot.audio().get_volume().unwrap_err();
    assert_eq!(err.code(), ErrorCode::Timeout);
    assert_eq!(err.to_status().code, ErrorCode::Timeout);

    mock.set_latency(Duration::ZERO);
    assert_eq!(robot.audio().get_volume().unwrap(), 30);
}

#[test]
fn test_backend_rejection_surfaces_status() {
    let (robot, _mock) = connected();

    // 不在建图模式时开始建图被后端拒绝
    let err = robot.slam_nav().start_mapping().unwrap_err();
    match &err {
        ClientError::Rejected { code, message } => {
            assert_eq!(*code, ErrorCode::ServiceError);
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.code(), ErrorCode::ServiceError);
}

#[test]
fn test_shutdown_allows_fresh_session() {
    let (robot, _mock) = connected();

    robot.shutdown();
    robot.shutdown();
    assert!(!robot.is_initialized());
    assert!(!robot.is_connected());

    assert!(robot.initialize(LOCAL_IP));
    robot.connect().unwrap();
    assert_eq!(robot.audio().get_volume().unwrap(), 30);
}

#[test]
fn test_sdk_version_is_exposed() {
    let (robot, _mock) = mock_robot();
    assert!(robot.sdk_version().split('.').count() >= 3);
}

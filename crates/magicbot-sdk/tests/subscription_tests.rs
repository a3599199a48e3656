//! 遥测订阅集成测试
//!
//! 单槽回调语义：注册即替换、注销即静默；后台分发线程按流路由事件；
//! 控制器 shutdown 只清空本控制器持有的槽位。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use magicbot_sdk::prelude::*;
use magicbot_sdk::rpc::{MockTransport, TelemetryEvent};
use magicbot_sdk::types::{Imu, JointState, Odometry, SingleJointState};
use rand::{Rng, SeedableRng, rngs::StdRng};

const LOCAL_IP: &str = "192.168.54.111";

fn connected() -> (MagicRobot, MockTransport) {
    let (robot, mock) = RobotBuilder::new().build_mock();
    assert!(robot.initialize(LOCAL_IP));
    robot.connect().unwrap();
    (robot, mock)
}

fn wait_for(mut satisfied: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !satisfied() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
    true
}

fn imu_event() -> TelemetryEvent {
    TelemetryEvent::BodyImu(Arc::new(Imu::default()))
}

fn arm_event(joints: usize) -> TelemetryEvent {
    TelemetryEvent::ArmJointState(Arc::new(JointState {
        timestamp: 0,
        joints: vec![SingleJointState::default(); joints],
    }))
}

#[test]
fn test_events_route_to_matching_callback() {
    let (robot, mock) = connected();

    let arm_count = Arc::new(AtomicU64::new(0));
    let imu_count = Arc::new(AtomicU64::new(0));
    let odom_count = Arc::new(AtomicU64::new(0));

    {
        let arm_count = arm_count.clone();
        robot.low_level_motion().subscribe_arm_state(move |state| {
            assert_eq!(state.joints.len(), 14);
            arm_count.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let imu_count = imu_count.clone();
        robot.low_level_motion().subscribe_body_imu(move |_| {
            imu_count.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let odom_count = odom_count.clone();
        robot.slam_nav().subscribe_odometry(move |_| {
            odom_count.fetch_add(1, Ordering::SeqCst);
        });
    }
    robot.slam_nav().open_odometry_stream().unwrap();

    for _ in 0..2 {
        assert!(mock.emit(arm_event(14)));
    }
    for _ in 0..3 {
        assert!(mock.emit(imu_event()));
    }
    assert!(mock.emit(TelemetryEvent::Odometry(Arc::new(Odometry::default()))));

    assert!(wait_for(|| robot.telemetry_stats().delivered == 6));
    assert_eq!(arm_count.load(Ordering::SeqCst), 2);
    assert_eq!(imu_count.load(Ordering::SeqCst), 3);
    assert_eq!(odom_count.load(Ordering::SeqCst), 1);
    assert_eq!(robot.telemetry_stats().unhandled, 0);
}

#[test]
fn test_payloads_arrive_unmodified_in_order() {
    let (robot, mock) = connected();
    let (tx, rx) = crossbeam_channel::unbounded();

    // 回调只入队不阻塞，载荷校验放在测试线程
    robot.low_level_motion().subscribe_body_imu(move |imu| {
        let _ = tx.send(imu);
    });

    let mut rng = StdRng::seed_from_u64(42);
    let sent: Vec<Imu> = (0..20i64)
        .map(|i| Imu {
            timestamp: i,
            orientation: [rng.r#gen(), rng.r#gen(), rng.r#gen(), rng.r#gen()],
            angular_velocity: [rng.r#gen(), rng.r#gen(), rng.r#gen()],
            linear_acceleration: [0.0, 0.0, 9.81],
            temperature: 36.5,
        })
        .collect();
    for imu in &sent {
        assert!(mock.emit(TelemetryEvent::BodyImu(Arc::new(*imu))));
    }

    for expected in &sent {
        let received = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(*received, *expected);
    }
}

#[test]
fn test_second_subscribe_replaces_first() {
    let (robot, mock) = connected();

    let first = Arc::new(AtomicU64::new(0));
    let second = Arc::new(AtomicU64::new(0));

    {
        let first = first.clone();
        robot.low_level_motion().subscribe_body_imu(move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        });
    }
    assert!(mock.emit(imu_event()));
    assert!(wait_for(|| first.load(Ordering::SeqCst) == 1));

    {
        let second = second.clone();
        robot.low_level_motion().subscribe_body_imu(move |_| {
            second.fetch_add(1, Ordering::SeqCst);
        });
    }
    assert!(mock.emit(imu_event()));
    assert!(wait_for(|| second.load(Ordering::SeqCst) == 1));
    assert_eq!(first.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsubscribe_silences_stream() {
    let (robot, mock) = connected();

    let count = Arc::new(AtomicU64::new(0));
    {
        let count = count.clone();
        robot.low_level_motion().subscribe_body_imu(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
    }
    assert!(mock.emit(imu_event()));
    assert!(wait_for(|| count.load(Ordering::SeqCst) == 1));

    robot.low_level_motion().unsubscribe_body_imu();
    assert!(mock.emit(imu_event()));
    assert!(wait_for(|| robot.telemetry_stats().unhandled == 1));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_subscribe_before_connect_takes_effect() {
    let (robot, mock) = RobotBuilder::new().build_mock();

    let count = Arc::new(AtomicU64::new(0));
    {
        let count = count.clone();
        robot.low_level_motion().subscribe_body_imu(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert!(robot.initialize(LOCAL_IP));
    robot.connect().unwrap();
    assert!(mock.emit(imu_event()));
    assert!(wait_for(|| count.load(Ordering::SeqCst) == 1));
}

#[test]
fn test_every_nth_sampling_pattern() {
    let (robot, mock) = connected();

    let seen = Arc::new(AtomicU64::new(0));
    let kept = Arc::new(AtomicU64::new(0));
    {
        let seen = seen.clone();
        let kept = kept.clone();
        // 高频流在回调里抽帧：每 5 帧保留 1 帧
        robot.low_level_motion().subscribe_body_imu(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) % 5 == 0 {
                kept.fetch_add(1, Ordering::SeqCst);
            }
        });
    }

    for _ in 0..50 {
        assert!(mock.emit(imu_event()));
    }
    assert!(wait_for(|| seen.load(Ordering::SeqCst) == 50));
    assert_eq!(kept.load(Ordering::SeqCst), 10);
}

#[test]
fn test_controller_shutdown_clears_only_its_slots() {
    let (robot, mock) = connected();

    let imu_count = Arc::new(AtomicU64::new(0));
    let odom_count = Arc::new(AtomicU64::new(0));
    {
        let imu_count = imu_count.clone();
        robot.low_level_motion().subscribe_body_imu(move |_| {
            imu_count.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let odom_count = odom_count.clone();
        robot.slam_nav().subscribe_odometry(move |_| {
            odom_count.fetch_add(1, Ordering::SeqCst);
        });
    }
    robot.slam_nav().open_odometry_stream().unwrap();

    robot.low_level_motion().shutdown();

    assert!(mock.emit(imu_event()));
    assert!(mock.emit(TelemetryEvent::Odometry(Arc::new(Odometry::default()))));

    assert!(wait_for(|| odom_count.load(Ordering::SeqCst) == 1));
    assert!(wait_for(|| robot.telemetry_stats().unhandled == 1));
    assert_eq!(imu_count.load(Ordering::SeqCst), 0);
}

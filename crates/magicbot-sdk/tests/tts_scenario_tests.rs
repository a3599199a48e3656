//! TTS 播报场景测试
//!
//! 通过门面下发 TTS 任务，经模拟后端的队列引擎验证三种插播模式
//! （ClearTop / Add / ClearBuffer）与三级优先级的交互。播放完成不自动
//! 发生，用 `finish_tts_playback` 显式推进。

use magicbot_sdk::prelude::*;
use magicbot_sdk::rpc::MockTransport;
use magicbot_sdk::ClientError;

const LOCAL_IP: &str = "192.168.54.111";

fn connected() -> (MagicRobot, MockTransport) {
    let (robot, mock) = RobotBuilder::new().build_mock();
    assert!(robot.initialize(LOCAL_IP));
    robot.connect().unwrap();
    (robot, mock)
}

fn tts(id: &str, priority: TtsPriority, mode: TtsMode) -> TtsCommand {
    TtsCommand::new(id, format!("speech {id}"), priority, mode)
}

fn playing_id(mock: &MockTransport) -> String {
    mock.tts_playing().map(|cmd| cmd.id).unwrap_or_default()
}

#[test]
fn test_add_queues_behind_current() {
    let (robot, mock) = connected();
    let audio = robot.audio();

    audio.play(&tts("a", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("b", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("c", TtsPriority::Middle, TtsMode::Add)).unwrap();

    assert_eq!(playing_id(&mock), "a");
    let pending: Vec<_> = mock
        .tts_pending(TtsPriority::Middle)
        .into_iter()
        .map(|cmd| cmd.id)
        .collect();
    assert_eq!(pending, ["b", "c"]);
}

#[test]
fn test_clear_top_replaces_same_priority() {
    let (robot, mock) = connected();
    let audio = robot.audio();

    audio.play(&tts("a", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("b", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("urgent", TtsPriority::Middle, TtsMode::ClearTop)).unwrap();

    assert_eq!(playing_id(&mock), "urgent");
    assert!(mock.tts_pending(TtsPriority::Middle).is_empty());
}

#[test]
fn test_high_priority_alert_preempts_and_resumes() {
    let (robot, mock) = connected();
    let audio = robot.audio();

    audio.play(&tts("story", TtsPriority::Low, TtsMode::Add)).unwrap();
    assert_eq!(playing_id(&mock), "story");

    audio
        .play(&tts("low-battery", TtsPriority::High, TtsMode::ClearTop))
        .unwrap();
    assert_eq!(playing_id(&mock), "low-battery");

    // 被抢占的任务退回队首，告警播完后续播
    mock.finish_tts_playback();
    assert_eq!(playing_id(&mock), "story");
}

#[test]
fn test_clear_top_waits_behind_higher_priority() {
    let (robot, mock) = connected();
    let audio = robot.audio();

    audio.play(&tts("alert", TtsPriority::High, TtsMode::Add)).unwrap();
    audio.play(&tts("notice", TtsPriority::Low, TtsMode::ClearTop)).unwrap();

    assert_eq!(playing_id(&mock), "alert");
    assert_eq!(mock.tts_pending(TtsPriority::Low).len(), 1);

    mock.finish_tts_playback();
    assert_eq!(playing_id(&mock), "notice");
}

#[test]
fn test_clear_buffer_keeps_current_playback() {
    let (robot, mock) = connected();
    let audio = robot.audio();

    audio.play(&tts("a", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("b", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("fresh", TtsPriority::Middle, TtsMode::ClearBuffer)).unwrap();

    assert_eq!(playing_id(&mock), "a");
    let pending: Vec<_> = mock
        .tts_pending(TtsPriority::Middle)
        .into_iter()
        .map(|cmd| cmd.id)
        .collect();
    assert_eq!(pending, ["fresh"]);

    mock.finish_tts_playback();
    assert_eq!(playing_id(&mock), "fresh");
}

#[test]
fn test_completion_serves_priority_order() {
    let (robot, mock) = connected();
    let audio = robot.audio();

    audio.play(&tts("first", TtsPriority::Low, TtsMode::Add)).unwrap();
    audio.play(&tts("mid", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("high", TtsPriority::High, TtsMode::Add)).unwrap();

    // 先到先播，Add 不抢占
    assert_eq!(playing_id(&mock), "first");
    mock.finish_tts_playback();
    assert_eq!(playing_id(&mock), "high");
    mock.finish_tts_playback();
    assert_eq!(playing_id(&mock), "mid");
    mock.finish_tts_playback();
    assert!(mock.tts_playing().is_none());
}

#[test]
fn test_stop_flushes_engine() {
    let (robot, mock) = connected();
    let audio = robot.audio();

    audio.play(&tts("a", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.play(&tts("b", TtsPriority::Middle, TtsMode::Add)).unwrap();
    audio.stop().unwrap();

    assert!(mock.tts_playing().is_none());
    assert!(mock.tts_pending(TtsPriority::Middle).is_empty());
}

#[test]
fn test_out_of_range_volume_stays_local() {
    let (robot, _mock) = connected();

    let err = robot.audio().set_volume(101).unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)));
    // 非法值未到达后端
    assert_eq!(robot.audio().get_volume().unwrap(), 30);
}

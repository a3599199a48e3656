//! 语音与音频类型
//!
//! TTS 的优先级控制不同任务之间的打断关系，模式控制同一优先级内部的排队行为。

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// TTS 播报优先级
///
/// 数值越小优先级越高，高优先级任务会打断低优先级任务的播放。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum TtsPriority {
    High = 0,
    Middle = 1,
    Low = 2,
}

/// 同优先级内的排队策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum TtsMode {
    /// 清空本优先级的当前播放与等待队列，立即播放本条
    ClearTop = 0,
    /// 追加到队尾，不打断当前播放
    Add = 1,
    /// 丢弃本优先级尚未播放的排队项，当前播放不受影响，之后播放本条
    ClearBuffer = 2,
}

/// TTS 播报命令
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TtsCommand {
    /// 任务唯一 ID，用于后续状态跟踪
    pub id: String,
    /// 播报文本（UTF-8）
    pub content: String,
    pub priority: TtsPriority,
    pub mode: TtsMode,
}

impl TtsCommand {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        priority: TtsPriority,
        mode: TtsMode,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            priority,
            mode,
        }
    }
}

/// 原始/处理后音频流数据块
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioStream {
    /// 有效数据长度
    pub data_length: i32,
    pub raw_data: Vec<u8>,
}

impl AudioStream {
    pub fn new(raw_data: Vec<u8>) -> Self {
        Self {
            data_length: raw_data.len() as i32,
            raw_data,
        }
    }
}

/// 语音唤醒状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WakeupStatus {
    /// 是否处于唤醒态
    pub is_wakeup: bool,
    /// 唤醒方位角是否有效
    pub enable_wakeup_orientation: bool,
    /// 唤醒方位角（弧度）
    pub wakeup_orientation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tts_priority_ordering() {
        // HIGH=0 数值最小、优先级最高
        assert_eq!(i8::from(TtsPriority::High), 0);
        assert_eq!(i8::from(TtsPriority::Middle), 1);
        assert_eq!(i8::from(TtsPriority::Low), 2);
        assert!(i8::from(TtsPriority::High) < i8::from(TtsPriority::Low));
    }

    #[test]
    fn test_tts_mode_roundtrip() {
        for (mode, raw) in [
            (TtsMode::ClearTop, 0i8),
            (TtsMode::Add, 1),
            (TtsMode::ClearBuffer, 2),
        ] {
            assert_eq!(i8::from(mode), raw);
            assert_eq!(TtsMode::try_from(raw).unwrap(), mode);
        }
        assert!(TtsMode::try_from(3i8).is_err());
        assert!(TtsPriority::try_from(3i8).is_err());
    }

    #[test]
    fn test_audio_stream_length() {
        let stream = AudioStream::new(vec![0u8; 320]);
        assert_eq!(stream.data_length, 320);
        assert_eq!(stream.raw_data.len(), 320);
    }

    #[test]
    fn test_tts_command_construction() {
        let cmd = TtsCommand::new("task-1", "你好，机器人", TtsPriority::High, TtsMode::Add);
        assert_eq!(cmd.id, "task-1");
        assert_eq!(cmd.priority, TtsPriority::High);
        assert_eq!(cmd.mode, TtsMode::Add);
    }
}

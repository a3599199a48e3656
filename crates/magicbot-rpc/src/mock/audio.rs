//! 音频子模型：音量存储与 TTS 播报队列
//!
//! TTS 引擎按优先级维护三条待播队列外加一个正在播放槽位：
//!
//! - `ClearTop`: 丢弃同优先级队列与同优先级当前播放，立即播放新任务；
//!   若当前播放优先级更低则抢占（被抢占任务退回其队列队首），
//!   优先级更高则新任务排其队列队首等待
//! - `Add`: 追加到队尾，不打断当前播放
//! - `ClearBuffer`: 丢弃同优先级待播队列，当前播放不受影响，新任务
//!   在其之后播放
//!
//! 播放完成不自动发生，由 [`finish_playback`](TtsEngine::finish_playback)
//! 显式推进（测试钩子经 `MockTransport` 暴露）。

use super::rejected;
use crate::RpcError;
use magicbot_types::{TtsCommand, TtsMode, TtsPriority};
use std::collections::VecDeque;

const PRIORITY_LEVELS: usize = 3;

fn slot(priority: TtsPriority) -> usize {
    i8::from(priority) as usize
}

/// TTS 播报引擎
#[derive(Debug, Default)]
pub(crate) struct TtsEngine {
    playing: Option<TtsCommand>,
    pending: [VecDeque<TtsCommand>; PRIORITY_LEVELS],
}

impl TtsEngine {
    pub(crate) fn play(&mut self, cmd: TtsCommand) {
        let p = cmd.priority;
        match cmd.mode {
            TtsMode::ClearTop => {
                self.pending[slot(p)].clear();
                match self.playing.take() {
                    Some(cur) if cur.priority == p => {
                        // 同优先级当前播放被丢弃
                    }
                    Some(cur) if slot(cur.priority) > slot(p) => {
                        // 抢占更低优先级播放，退回其队列队首
                        self.pending[slot(cur.priority)].push_front(cur);
                    }
                    other => self.playing = other,
                }
                if self.playing.is_none() {
                    self.playing = Some(cmd);
                } else {
                    // 更高优先级任务仍在播放，排队首等待
                    self.pending[slot(p)].push_front(cmd);
                }
            }
            TtsMode::Add => {
                self.pending[slot(p)].push_back(cmd);
                self.promote_if_idle();
            }
            TtsMode::ClearBuffer => {
                self.pending[slot(p)].clear();
                self.pending[slot(p)].push_back(cmd);
                self.promote_if_idle();
            }
        }
    }

    /// 停止播放并清空全部队列
    pub(crate) fn stop(&mut self) {
        self.playing = None;
        for queue in &mut self.pending {
            queue.clear();
        }
    }

    /// 标记当前任务播放完成，推进下一条（优先级高者先播）
    pub(crate) fn finish_playback(&mut self) -> Option<TtsCommand> {
        let done = self.playing.take();
        self.promote_if_idle();
        done
    }

    pub(crate) fn playing(&self) -> Option<&TtsCommand> {
        self.playing.as_ref()
    }

    pub(crate) fn pending(&self, priority: TtsPriority) -> Vec<TtsCommand> {
        self.pending[slot(priority)].iter().cloned().collect()
    }

    fn promote_if_idle(&mut self) {
        if self.playing.is_some() {
            return;
        }
        for queue in &mut self.pending {
            if let Some(next) = queue.pop_front() {
                self.playing = Some(next);
                return;
            }
        }
    }
}

/// 音频子模型
#[derive(Debug)]
pub(crate) struct AudioModel {
    volume: i32,
    pub(crate) tts: TtsEngine,
}

impl Default for AudioModel {
    fn default() -> Self {
        Self {
            // 出厂默认音量
            volume: 30,
            tts: TtsEngine::default(),
        }
    }
}

impl AudioModel {
    pub(crate) fn set_volume(&mut self, volume: i32) -> Result<(), RpcError> {
        if !(0..=100).contains(&volume) {
            return Err(rejected(format!("volume {volume} out of range [0, 100]")));
        }
        self.volume = volume;
        Ok(())
    }

    pub(crate) fn volume(&self) -> i32 {
        self.volume
    }
}

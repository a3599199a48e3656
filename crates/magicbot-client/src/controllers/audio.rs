//! 音频控制器：TTS 播报、音量、音频流与唤醒状态

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use magicbot_rpc::Request;
use magicbot_types::{AudioStream, TtsCommand, WakeupStatus};
use tracing::debug;

use crate::context::RobotContext;
use crate::error::ClientError;

/// 音频控制器
///
/// TTS 的插播/排队行为由 [`TtsCommand`] 的 `mode` 与 `priority` 决定，
/// 客户端原样转发，不在本地合并或去重。
pub struct AudioController {
    ctx: Arc<RobotContext>,
    ready: AtomicBool,
}

impl AudioController {
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
        self.ctx.router.origin_audio.unsubscribe();
        self.ctx.router.bf_audio.unsubscribe();
        self.ctx.router.wakeup_status.unsubscribe();
        debug!("audio controller shut down");
    }

    fn require_ready(&self) -> Result<(), ClientError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(ClientError::NotInitialized);
        }
        Ok(())
    }

    /// 下发 TTS 播报命令
    pub fn play(&self, command: &TtsCommand) -> Result<(), ClientError> {
        self.play_timeout(command, self.ctx.timeout())
    }

    /// [`play`](Self::play) 的显式超时版本
    pub fn play_timeout(
        &self,
        command: &TtsCommand,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::PlayTts(command.clone()), timeout)
    }

    /// 停止当前播报并清空全部待播队列
    pub fn stop(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx.expect_ack(Request::StopTts, self.ctx.timeout())
    }

    /// 设置播报音量，合法范围 `0..=100`
    pub fn set_volume(&self, volume: i32) -> Result<(), ClientError> {
        self.require_ready()?;
        if !(0..=100).contains(&volume) {
            return Err(ClientError::InvalidArgument(format!(
                "volume {volume} out of range 0..=100"
            )));
        }
        self.ctx
            .expect_ack(Request::SetVolume(volume), self.ctx.timeout())
    }

    /// 查询当前音量
    pub fn get_volume(&self) -> Result<i32, ClientError> {
        self.require_ready()?;
        match self.ctx.call(Request::GetVolume, self.ctx.timeout())? {
            magicbot_rpc::Response::Volume(volume) => Ok(volume),
            other => Err(crate::context::unexpected("GetVolume", &other)),
        }
    }

    /// 打开原始/BF 音频推流
    pub fn open_audio_stream(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::OpenAudioStream, self.ctx.timeout())
    }

    /// 关闭音频推流
    pub fn close_audio_stream(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::CloseAudioStream, self.ctx.timeout())
    }

    /// 订阅原始麦克风音频流
    pub fn subscribe_origin_audio_stream<F>(&self, callback: F)
    where
        F: Fn(Arc<AudioStream>) + Send + Sync + 'static,
    {
        self.ctx.router.origin_audio.subscribe(callback);
    }

    pub fn unsubscribe_origin_audio_stream(&self) {
        self.ctx.router.origin_audio.unsubscribe();
    }

    /// 订阅波束成形（BF）处理后的音频流
    pub fn subscribe_bf_audio_stream<F>(&self, callback: F)
    where
        F: Fn(Arc<AudioStream>) + Send + Sync + 'static,
    {
        self.ctx.router.bf_audio.subscribe(callback);
    }

    pub fn unsubscribe_bf_audio_stream(&self) {
        self.ctx.router.bf_audio.unsubscribe();
    }

    /// 打开唤醒状态推流
    pub fn open_wakeup_status_stream(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::OpenWakeupStatusStream, self.ctx.timeout())
    }

    /// 关闭唤醒状态推流
    pub fn close_wakeup_status_stream(&self) -> Result<(), ClientError> {
        self.require_ready()?;
        self.ctx
            .expect_ack(Request::CloseWakeupStatusStream, self.ctx.timeout())
    }

    /// 订阅语音唤醒状态
    pub fn subscribe_wakeup_status<F>(&self, callback: F)
    where
        F: Fn(Arc<WakeupStatus>) + Send + Sync + 'static,
    {
        self.ctx.router.wakeup_status.subscribe(callback);
    }

    pub fn unsubscribe_wakeup_status(&self) {
        self.ctx.router.wakeup_status.unsubscribe();
    }
}

//! 遥测分发计数器
//!
//! 零开销原子计数器，分发线程写入，任意线程可安全读取快照。

use std::sync::atomic::{AtomicU64, Ordering};

/// 遥测分发统计
///
/// `delivered` 为送达订阅回调的事件数，`unhandled` 为到达时无订阅者、
/// 被直接丢弃的事件数。计数器由分发线程以 `Relaxed` 序更新。
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// 已送达订阅回调的事件数
    pub delivered: AtomicU64,
    /// 到达时无订阅者的事件数
    pub unhandled: AtomicU64,
}

impl DispatchStats {
    /// 创建新的统计实例（计数器清零）
    pub fn new() -> Self {
        Self::default()
    }

    /// 原子读取当前快照
    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            delivered: self.delivered.load(Ordering::Relaxed),
            unhandled: self.unhandled.load(Ordering::Relaxed),
        }
    }

    /// 全部清零
    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.unhandled.store(0, Ordering::Relaxed);
    }
}

/// 分发统计快照（不可变读取值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStatsSnapshot {
    /// 已送达订阅回调的事件数
    pub delivered: u64,
    /// 到达时无订阅者的事件数
    pub unhandled: u64,
}

impl DispatchStatsSnapshot {
    /// 到达事件总数
    pub fn total(&self) -> u64 {
        self.delivered + self.unhandled
    }
}

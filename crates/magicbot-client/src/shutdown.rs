//! 退出令牌
//!
//! 可克隆的原子标志，代替进程级全局变量承接 Ctrl-C 等退出请求。
//! 任意持有者触发后，所有等待者被唤醒。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error};

/// 退出令牌
///
/// 克隆共享同一内部状态；触发是单向的，不可复位。
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    triggered: AtomicBool,
    lock: Mutex<()>,
    cond: Condvar,
}

impl ShutdownToken {
    /// 创建未触发的令牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发退出，唤醒所有等待者
    ///
    /// 多次触发只有第一次生效。
    pub fn trigger(&self) {
        if !self.inner.triggered.swap(true, Ordering::SeqCst) {
            let _guard = self.inner.lock.lock();
            self.inner.cond.notify_all();
            debug!("shutdown token triggered");
        }
    }

    /// 是否已触发
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// 阻塞直到触发
    pub fn wait(&self) {
        let mut guard = self.inner.lock.lock();
        while !self.is_triggered() {
            self.inner.cond.wait(&mut guard);
        }
    }

    /// 阻塞至多 `timeout`，返回是否已触发
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut guard = self.inner.lock.lock();
        while !self.is_triggered() {
            if self.inner.cond.wait_until(&mut guard, deadline).timed_out() {
                break;
            }
        }
        self.is_triggered()
    }

    /// 安装 Ctrl-C（SIGINT）处理器，收到信号时触发本令牌
    ///
    /// 进程级处理器只能安装一次，重复调用返回 `false` 并记录错误日志。
    pub fn hook_ctrlc(&self) -> bool {
        let token = self.clone();
        match ctrlc::set_handler(move || {
            token.trigger();
        }) {
            Ok(()) => {
                debug!("ctrl-c handler installed");
                true
            }
            Err(err) => {
                error!(%err, "failed to install ctrl-c handler");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_token_starts_untriggered() {
        let token = ShutdownToken::new();
        assert!(!token.is_triggered());
        assert!(!token.wait_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_trigger_is_visible_to_clones() {
        let token = ShutdownToken::new();
        let clone = token.clone();
        clone.trigger();
        assert!(token.is_triggered());
        // 已触发后 wait 立即返回
        token.wait();
        assert!(token.wait_timeout(Duration::from_millis(1)));
    }

    #[test]
    fn test_wait_wakes_on_trigger_from_other_thread() {
        let token = ShutdownToken::new();
        let waiter = token.clone();
        let handle = thread::spawn(move || waiter.wait_timeout(Duration::from_secs(5)));

        thread::sleep(Duration::from_millis(30));
        token.trigger();
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_trigger_twice_is_noop() {
        let token = ShutdownToken::new();
        token.trigger();
        token.trigger();
        assert!(token.is_triggered());
    }
}

//! 六大控制器
//!
//! 门面初始化时统一武装全部控制器；单个控制器也可以通过自身的
//! `initialize` / `shutdown` 重新启用或停用。停用的控制器拒绝发起后端
//! 调用（[`ClientError::NotInitialized`](crate::error::ClientError)，状态码
//! `ServiceNotReady`），并在停用时清掉自己名下的订阅槽。
//!
//! 订阅/退订只操作本地回调槽，不经过后端，始终可用且幂等。

pub mod audio;
pub mod monitor;
pub mod motion;
pub mod sensor;
pub mod slam_nav;

pub use audio::AudioController;
pub use monitor::StateMonitorController;
pub use motion::{HighLevelMotionController, LowLevelMotionController, MAX_HEAD_SHAKE_RAD};
pub use sensor::SensorController;
pub use slam_nav::SlamNavController;

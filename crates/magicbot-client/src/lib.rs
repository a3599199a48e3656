//! MagicBot Z1 客户端门面
//!
//! 本 crate 在 [`magicbot_rpc`] 的传输层之上提供面向用户的接口，包括：
//! - [`MagicRobot`] 门面（初始化 / 连接 / 关停生命周期）
//! - 六个控制器（音频、高层运动、低层运动、传感器、SLAM 导航、状态监控）
//! - 单槽遥测订阅与后台分发线程
//! - TOML 配置与 Ctrl-C 关停令牌
//!
//! # 使用场景
//!
//! 这是大多数用户应该使用的 crate。典型流程：
//!
//! ```no_run
//! use magicbot_client::RobotBuilder;
//! # use std::sync::Arc;
//! # fn transport() -> Arc<dyn magicbot_rpc::Transport> { unimplemented!() }
//! let robot = RobotBuilder::new().transport(transport()).build().unwrap();
//! assert!(robot.initialize("192.168.54.111"));
//! robot.connect().unwrap();
//! robot.audio().set_volume(50).unwrap();
//! robot.shutdown();
//! ```
//!
//! 需要自定义传输层或直接处理请求 / 遥测枚举时，使用 [`magicbot_rpc`]。

pub mod builder;
pub mod config;
pub mod controllers;
pub mod error;
pub mod robot;
pub mod shutdown;
pub mod stats;
pub mod subscription;

pub(crate) mod context;

// 重新导出常用类型
pub use builder::RobotBuilder;
pub use config::RobotConfig;
pub use controllers::{
    AudioController, HighLevelMotionController, LowLevelMotionController, MAX_HEAD_SHAKE_RAD,
    SensorController, SlamNavController, StateMonitorController,
};
pub use error::ClientError;
pub use robot::MagicRobot;
pub use shutdown::ShutdownToken;
pub use stats::{DispatchStats, DispatchStatsSnapshot};
pub use subscription::{CallbackSlot, SubscriberFn, TelemetryRouter};

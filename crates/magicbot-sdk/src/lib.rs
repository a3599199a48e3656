//! MagicBot Z1 SDK 总入口
//!
//! 聚合三个分层 crate 并提供统一的导入面：
//!
//! - [`types`]（数据模型：命令、遥测、枚举、校验）
//! - [`rpc`]（传输抽象与进程内模拟后端）
//! - [`client`]（门面、控制器、订阅分发）
//!
//! # 快速开始
//!
//! ```no_run
//! use magicbot_sdk::prelude::*;
//! # use std::sync::Arc;
//! # fn transport() -> Arc<dyn magicbot_sdk::rpc::Transport> { unimplemented!() }
//!
//! magicbot_sdk::init_logging();
//! let robot = RobotBuilder::new().transport(transport()).build().unwrap();
//! assert!(robot.initialize("192.168.54.111"));
//! robot.connect().unwrap();
//! robot.audio().set_volume(50).unwrap();
//!
//! let token = ShutdownToken::new();
//! token.hook_ctrlc();
//! token.wait();
//! robot.shutdown();
//! ```

pub use magicbot_client as client;
pub use magicbot_rpc as rpc;
pub use magicbot_types as types;

// 顶层平铺导出最常用的入口类型
pub use magicbot_client::{
    ClientError, DispatchStatsSnapshot, MagicRobot, RobotBuilder, RobotConfig, ShutdownToken,
};

#[cfg(feature = "mock")]
pub use magicbot_rpc::MockTransport;

// 日志门面重导出，下游与 SDK 使用同一套宏版本
pub use log;
pub use tracing;

/// 常用类型一揽子导入
pub mod prelude {
    pub use magicbot_client::{
        AudioController, ClientError, HighLevelMotionController, LowLevelMotionController,
        MagicRobot, RobotBuilder, RobotConfig, SensorController, ShutdownToken,
        SlamNavController, StateMonitorController,
    };
    pub use magicbot_types::{
        BodyPart, ControllerLevel, ErrorCode, GaitMode, JointCommand, JointState,
        JoystickCommand, NavMode, SlamMode, TrickAction, TtsCommand, TtsMode, TtsPriority,
    };
}

/// 安装全局日志订阅器
///
/// 过滤级别取 `RUST_LOG`，未设置时默认 `info`；同时桥接 `log` 宏。
/// 装好返回 `true`；进程内已有全局订阅器时返回 `false`，不覆盖。
pub fn init_logging() -> bool {
    // log 桥接失败说明进程已装过 logger，沿用即可
    let _ = tracing_log::LogTracer::init();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).is_ok()
}

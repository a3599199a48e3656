//! MagicBot 类型层模块
//!
//! 定义人形机器人 SDK 的全部命令/遥测数据结构与枚举：
//! 状态码、电池、运动控制、音频、传感器、SLAM/导航，以及地图 PGM 编解码。
//!
//! 所有枚举值均为协议固定的整数（多数不连续），不允许重新编号；
//! 与后端交换的整数通过 `num_enum` 做精确往返转换。
//! 本 crate 不含任何 IO，是纯数据模型层，供 rpc/client 层依赖。

pub mod audio;
pub mod battery;
pub mod constants;
pub mod fault;
pub mod motion;
pub mod pgm;
pub mod sensor;
pub mod slam;
pub mod status;

pub use audio::*;
pub use battery::*;
pub use constants::*;
pub use fault::*;
pub use motion::*;
pub use sensor::*;
pub use slam::*;
pub use status::*;

use thiserror::Error;

/// 类型层错误
///
/// 枚举整数转换失败、缓冲区尺寸校验失败、地图文件格式损坏时返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: &'static str, value: i64 },

    #[error("Size mismatch for {field}: expected {expected}, got {actual}")]
    SizeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed data: {0}")]
    Malformed(String),
}

//! 状态码与调用结果
//!
//! 每个同步操作在线上以 `Status` 表达结果，`OK` 是唯一的成功值，
//! 所有非 OK 码对该次调用都是终态失败（不存在部分成功）。

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// 调用结果码
///
/// 协议固定整数，区分三类失败来源：
/// 未就绪（未初始化/未连接）、超时（超出毫秒预算）、
/// 客户端内部错误、服务端拒绝或故障。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum ErrorCode {
    /// 成功
    Ok = 0,
    /// 服务未就绪（未初始化或未连接）
    ServiceNotReady = 1,
    /// 调用超时
    Timeout = 2,
    /// 客户端内部错误
    InternalError = 3,
    /// 服务端拒绝或故障
    ServiceError = 4,
}

/// 同步操作的线上返回值
///
/// 非 OK 时 `message` 携带后端给出的失败描述；
/// 调用方必须将任何非 OK 状态视为"目标状态未变更"。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    pub code: ErrorCode,
    pub message: String,
}

impl Status {
    /// 构造成功状态
    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            message: String::new(),
        }
    }

    /// 构造失败状态
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == ErrorCode::Ok
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ok()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{:?}", self.code)
        } else {
            write!(f, "{:?}: {}", self.code, self.message)
        }
    }
}

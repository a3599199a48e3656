//! 客户端层错误类型
//!
//! 所有公开操作返回 `Result<T, ClientError>`，错误以值传递，API 边界不发生
//! panic。[`ClientError::code`] 将错误归入线上状态码分类，便于上层统一处理。

use magicbot_rpc::RpcError;
use magicbot_types::{ErrorCode, Status};
use thiserror::Error;

/// 客户端错误
///
/// 传输层错误（[`RpcError`]）通过 `From` 自动上抛；其中 `Rejected` 在转换时
/// 被展开成 [`ClientError::Rejected`]，保留后端返回的状态码和消息。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// 传输层错误（未连接、超时、通道关闭、响应类型不符）
    #[error(transparent)]
    Rpc(RpcError),

    /// 后端拒绝了请求
    #[error("Request rejected: {code:?}: {message}")]
    Rejected {
        /// 后端返回的状态码
        code: ErrorCode,
        /// 后端返回的描述
        message: String,
    },

    /// 调用方参数非法（客户端侧校验，未发往后端）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 机器人尚未初始化（或控制器已停用）
    #[error("Robot not initialized")]
    NotInitialized,

    /// 重复连接
    #[error("Robot already connected")]
    AlreadyConnected,
}

impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Rejected(status) => ClientError::Rejected {
                code: status.code,
                message: status.message,
            },
            other => ClientError::Rpc(other),
        }
    }
}

impl ClientError {
    /// 错误对应的线上状态码
    ///
    /// 分类规则：
    /// - 未连接 / 未初始化 → [`ErrorCode::ServiceNotReady`]
    /// - 超时 → [`ErrorCode::Timeout`]
    /// - 后端拒绝 → 后端携带的码
    /// - 其余（通道关闭、响应不符、参数非法、重复连接）→ [`ErrorCode::InternalError`]
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Rpc(RpcError::NotConnected) | ClientError::NotInitialized => {
                ErrorCode::ServiceNotReady
            }
            ClientError::Rpc(RpcError::Timeout) => ErrorCode::Timeout,
            ClientError::Rejected { code, .. } => *code,
            _ => ErrorCode::InternalError,
        }
    }

    /// 渲染为线上 [`Status`]
    pub fn to_status(&self) -> Status {
        Status::new(self.code(), self.to_string())
    }
}

//! 客户端配置
//!
//! 支持 TOML 配置文件，所有字段都有默认值，可部分覆盖。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// 默认本机 IP（机器人局域网下的 SDK 侧地址）
pub const DEFAULT_LOCAL_IP: &str = "192.168.54.111";

/// 默认同步调用超时（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// 默认遥测通道容量
pub const DEFAULT_TELEMETRY_CAPACITY: usize = 1024;

/// 机器人客户端配置
///
/// `telemetry_capacity` 在 builder 自行构造传输后端（如 mock）时生效；
/// 注入外部 [`Transport`](magicbot_rpc::Transport) 时通道容量由该实现决定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// 本机 IP，`initialize` 未显式给出时使用
    pub local_ip: String,
    /// 同步调用的默认超时（毫秒）
    pub timeout_ms: u64,
    /// 遥测通道容量（条数）
    pub telemetry_capacity: usize,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            local_ip: DEFAULT_LOCAL_IP.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            telemetry_capacity: DEFAULT_TELEMETRY_CAPACITY,
        }
    }
}

impl RobotConfig {
    /// 默认超时的 `Duration` 形式
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 从 TOML 文本解析，缺省字段取默认值
    pub fn from_toml_str(text: &str) -> Result<Self, ClientError> {
        toml::from_str(text)
            .map_err(|err| ClientError::InvalidArgument(format!("invalid config: {err}")))
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            ClientError::InvalidArgument(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RobotConfig::default();
        assert_eq!(config.local_ip, "192.168.54.111");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.telemetry_capacity, 1024);
        assert_eq!(config.timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RobotConfig::from_toml_str("timeout_ms = 250\n").unwrap();
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.local_ip, DEFAULT_LOCAL_IP);
        assert_eq!(config.telemetry_capacity, DEFAULT_TELEMETRY_CAPACITY);
    }

    #[test]
    fn test_full_toml() {
        let text = r#"
            local_ip = "10.0.0.7"
            timeout_ms = 1000
            telemetry_capacity = 64
        "#;
        let config = RobotConfig::from_toml_str(text).unwrap();
        assert_eq!(config.local_ip, "10.0.0.7");
        assert_eq!(config.timeout_ms, 1000);
        assert_eq!(config.telemetry_capacity, 64);
    }

    #[test]
    fn test_malformed_toml_is_invalid_argument() {
        let err = RobotConfig::from_toml_str("timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = RobotConfig {
            local_ip: "192.168.54.200".to_string(),
            timeout_ms: 42,
            telemetry_capacity: 8,
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(RobotConfig::from_toml_str(&text).unwrap(), config);
    }
}

//! 状态监控控制器：整机故障与电池快照

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use magicbot_rpc::{Request, Response};
use magicbot_types::RobotState;
use tracing::debug;

use crate::context::{RobotContext, unexpected};
use crate::error::ClientError;

/// 状态监控控制器
///
/// 快照按需拉取，没有推流；故障码可用
/// [`fault_description`](magicbot_types::fault_description) 翻译。
pub struct StateMonitorController {
    ctx: Arc<RobotContext>,
    ready: AtomicBool,
}

impl StateMonitorController {
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

    /// 停用控制器，幂等
    pub fn shutdown(&self) {
        self.ready.store(false, Ordering::SeqCst);
        debug!("state monitor controller shut down");
    }

    fn require_ready(&self) -> Result<(), ClientError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(ClientError::NotInitialized);
        }
        Ok(())
    }

    /// 拉取整机状态快照（故障列表 + 电池数据）
    pub fn get_current_state(&self) -> Result<RobotState, ClientError> {
        self.require_ready()?;
        match self.ctx.call(Request::GetRobotState, self.ctx.timeout())? {
            Response::RobotState(state) => Ok(state),
            other => Err(unexpected("GetRobotState", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magicbot_rpc::{MockTransport, Transport};
    use magicbot_types::{BatteryState, BmsData, Fault, PowerSupplyStatus, fault_description};
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn controller() -> (StateMonitorController, MockTransport) {
        let mock = MockTransport::new();
        mock.connect("192.168.54.111".parse().unwrap(), TIMEOUT)
            .unwrap();
        let ctx = Arc::new(RobotContext::new(Arc::new(mock.clone()), TIMEOUT));
        let monitor = StateMonitorController::new(ctx);
        monitor.initialize();
        (monitor, mock)
    }

    #[test]
    fn test_state_snapshot_defaults() {
        let (monitor, _mock) = controller();
        let state = monitor.get_current_state().unwrap();
        assert!(state.faults.is_empty());
    }

    #[test]
    fn test_faults_and_bms_are_reflected() {
        let (monitor, mock) = controller();
        mock.push_fault(Fault {
            error_code: 0x1101,
            error_message: fault_description(0x1101).unwrap().to_string(),
        });
        mock.set_bms(BmsData {
            battery_percentage: 77.5,
            battery_health: 98.0,
            battery_state: BatteryState::Good,
            power_supply_status: PowerSupplyStatus::Discharging,
        });

        let state = monitor.get_current_state().unwrap();
        assert_eq!(state.faults.len(), 1);
        assert_eq!(state.faults[0].error_code, 0x1101);
        assert_eq!(state.bms_data.battery_percentage, 77.5);
        assert_eq!(state.bms_data.battery_state, BatteryState::Good);

        mock.clear_faults();
        assert!(monitor.get_current_state().unwrap().faults.is_empty());
    }

    #[test]
    fn test_inert_monitor_is_service_not_ready() {
        let (monitor, _mock) = controller();
        monitor.shutdown();
        let err = monitor.get_current_state().unwrap_err();
        assert_eq!(err, ClientError::NotInitialized);
    }
}

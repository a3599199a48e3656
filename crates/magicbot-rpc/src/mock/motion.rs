//! 运动子模型：控制级别、步态、特技与低层关节指令
//!
//! 级别权限与真机一致：高层指令（步态/特技/摇杆/头部）要求当前级别
//! 为 `HighLevel`，低层发布（关节/灵巧手）要求 `LowLevel`，级别不符
//! 一律拒绝。切换到低层后步态上报 `LowLevelSdk`，切回高层回到
//! `Passive`。

use super::rejected;
use crate::RpcError;
use magicbot_types::{
    BodyPart, ControllerLevel, GaitMode, HandCommand, JointCommand, JoystickCommand, TrickAction,
    HAND_CMD_DOF, HAND_NUM,
};
use std::collections::HashMap;

/// 运动子模型
#[derive(Debug)]
pub(crate) struct MotionModel {
    level: ControllerLevel,
    gait: GaitMode,
    period_ms: u64,
    last_joystick: Option<JoystickCommand>,
    last_joint_command: HashMap<BodyPart, JointCommand>,
    last_hand_command: Option<HandCommand>,
}

impl Default for MotionModel {
    fn default() -> Self {
        Self {
            // 上电默认高层控制、阻尼站立
            level: ControllerLevel::HighLevel,
            gait: GaitMode::Passive,
            period_ms: magicbot_types::CONTROL_PERIOD_MS as u64,
            last_joystick: None,
            last_joint_command: HashMap::new(),
            last_hand_command: None,
        }
    }
}

impl MotionModel {
    pub(crate) fn set_level(&mut self, level: ControllerLevel) -> Result<(), RpcError> {
        match level {
            ControllerLevel::Unknown => Err(rejected("cannot switch to unknown controller level")),
            _ if level == self.level => Ok(()),
            ControllerLevel::LowLevel => {
                self.level = ControllerLevel::LowLevel;
                self.gait = GaitMode::LowLevelSdk;
                Ok(())
            }
            ControllerLevel::HighLevel => {
                self.level = ControllerLevel::HighLevel;
                self.gait = GaitMode::Passive;
                Ok(())
            }
        }
    }

    pub(crate) fn level(&self) -> ControllerLevel {
        self.level
    }

    pub(crate) fn set_gait(&mut self, mode: GaitMode) -> Result<(), RpcError> {
        self.require_level(ControllerLevel::HighLevel)?;
        if mode == GaitMode::LowLevelSdk {
            return Err(rejected("gait LowLevelSdk is entered via controller level switch"));
        }
        self.gait = mode;
        Ok(())
    }

    pub(crate) fn gait(&self) -> GaitMode {
        self.gait
    }

    pub(crate) fn execute_trick(&mut self, action: TrickAction) -> Result<(), RpcError> {
        self.require_level(ControllerLevel::HighLevel)?;
        if self.gait != GaitMode::BalanceStand {
            return Err(rejected(format!(
                "trick {action:?} requires BalanceStand gait, current {:?}",
                self.gait
            )));
        }
        Ok(())
    }

    pub(crate) fn joystick(&mut self, cmd: JoystickCommand) -> Result<(), RpcError> {
        self.require_level(ControllerLevel::HighLevel)?;
        if !cmd.is_normalized() {
            return Err(rejected("joystick axis value out of [-1.0, 1.0]"));
        }
        self.last_joystick = Some(cmd);
        Ok(())
    }

    pub(crate) fn head_move(&mut self, shake_angle: f32) -> Result<(), RpcError> {
        self.require_level(ControllerLevel::HighLevel)?;
        if !shake_angle.is_finite() {
            return Err(rejected("head shake angle must be finite"));
        }
        Ok(())
    }

    pub(crate) fn publish_joint(
        &mut self,
        part: BodyPart,
        command: JointCommand,
    ) -> Result<(), RpcError> {
        self.require_level(ControllerLevel::LowLevel)?;
        if !part.valid_joint_count(command.joints.len()) {
            return Err(rejected(format!(
                "invalid joint count {} for {}",
                command.joints.len(),
                part.name()
            )));
        }
        self.last_joint_command.insert(part, command);
        Ok(())
    }

    pub(crate) fn publish_hand(&mut self, command: HandCommand) -> Result<(), RpcError> {
        self.require_level(ControllerLevel::LowLevel)?;
        if command.cmd.len() != HAND_NUM {
            return Err(rejected(format!(
                "hand command must cover {} hands, got {}",
                HAND_NUM,
                command.cmd.len()
            )));
        }
        for (i, hand) in command.cmd.iter().enumerate() {
            if hand.pos.len() != HAND_CMD_DOF {
                return Err(rejected(format!(
                    "hand {} position array must have {} entries, got {}",
                    i,
                    HAND_CMD_DOF,
                    hand.pos.len()
                )));
            }
        }
        self.last_hand_command = Some(command);
        Ok(())
    }

    pub(crate) fn set_period_ms(&mut self, period_ms: u64) -> Result<(), RpcError> {
        if period_ms == 0 {
            return Err(rejected("control period must be positive"));
        }
        self.period_ms = period_ms;
        Ok(())
    }

    pub(crate) fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub(crate) fn last_joystick(&self) -> Option<JoystickCommand> {
        self.last_joystick
    }

    pub(crate) fn last_joint_command(&self, part: BodyPart) -> Option<JointCommand> {
        self.last_joint_command.get(&part).cloned()
    }

    pub(crate) fn last_hand_command(&self) -> Option<HandCommand> {
        self.last_hand_command.clone()
    }

    fn require_level(&self, required: ControllerLevel) -> Result<(), RpcError> {
        if self.level != required {
            return Err(rejected(format!(
                "operation requires {required:?} control, current level {:?}",
                self.level
            )));
        }
        Ok(())
    }
}

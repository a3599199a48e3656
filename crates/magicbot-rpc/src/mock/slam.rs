//! SLAM 与导航子模型
//!
//! 建图状态机：`StartMapping` / `CancelMapping` / `SaveMap` 只在建图
//! 模式下接受，`SaveMap` 结束当前建图会话并把合成地图写入存储。
//! 地图存储在传输层生命周期内持久（断连不清除），对应真机的磁盘
//! 存储。导航任务经 `SetNavTarget` 进入 `Running`，由
//! [`complete`](SlamNavModel::complete) 测试钩子终结。

use super::rejected;
use crate::RpcError;
use magicbot_types::{
    AllMapInfo, Header, LocalizationInfo, MapImageData, MapInfo, MapMetaData, NavMode, NavStatus,
    NavStatusType, NavTarget, PointCloud2, PointField, Pose3DEuler, SlamMode,
};
use std::collections::BTreeMap;

/// 合成地图尺寸（像素）
const SYNTH_MAP_SIZE: i32 = 16;
/// PGM 未知区域灰度值
const SYNTH_MAP_GRAY: u8 = 205;
/// 合成地图分辨率（米/像素）
const SYNTH_MAP_RESOLUTION: f64 = 0.05;

/// SLAM 与导航子模型
#[derive(Debug, Default)]
pub(crate) struct SlamNavModel {
    slam_mode: SlamMode,
    nav_mode: NavMode,
    mapping_active: bool,
    localized: bool,
    init_pose: Pose3DEuler,
    maps: BTreeMap<String, MapInfo>,
    current_map: Option<String>,
    nav_status: NavStatus,
}

impl SlamNavModel {
    pub(crate) fn activate_slam(&mut self, mode: SlamMode, map_path: &str) -> Result<(), RpcError> {
        if mode == SlamMode::Localization && map_path.is_empty() {
            return Err(rejected("localization mode requires a map path"));
        }
        if self.slam_mode == SlamMode::Mapping && mode != SlamMode::Mapping {
            self.mapping_active = false;
        }
        if mode != SlamMode::Localization {
            self.localized = false;
        }
        self.slam_mode = mode;
        Ok(())
    }

    pub(crate) fn slam_mode(&self) -> SlamMode {
        self.slam_mode
    }

    pub(crate) fn start_mapping(&mut self) -> Result<(), RpcError> {
        self.require_mapping_mode()?;
        if self.mapping_active {
            return Err(rejected("mapping already in progress"));
        }
        self.mapping_active = true;
        Ok(())
    }

    pub(crate) fn cancel_mapping(&mut self) -> Result<(), RpcError> {
        self.require_mapping_mode()?;
        if !self.mapping_active {
            return Err(rejected("no active mapping session"));
        }
        self.mapping_active = false;
        Ok(())
    }

    pub(crate) fn save_map(&mut self, map_name: &str) -> Result<(), RpcError> {
        self.require_mapping_mode()?;
        if !self.mapping_active {
            return Err(rejected("no active mapping session"));
        }
        if map_name.is_empty() {
            return Err(rejected("map name is empty"));
        }
        self.maps.insert(map_name.to_string(), synth_map(map_name));
        self.current_map = Some(map_name.to_string());
        self.mapping_active = false;
        Ok(())
    }

    pub(crate) fn load_map(&mut self, map_name: &str) -> Result<(), RpcError> {
        if !self.maps.contains_key(map_name) {
            return Err(rejected(format!("map not found: {map_name}")));
        }
        self.current_map = Some(map_name.to_string());
        Ok(())
    }

    pub(crate) fn delete_map(&mut self, map_name: &str) -> Result<(), RpcError> {
        if self.maps.remove(map_name).is_none() {
            return Err(rejected(format!("map not found: {map_name}")));
        }
        if self.current_map.as_deref() == Some(map_name) {
            self.current_map = None;
        }
        Ok(())
    }

    pub(crate) fn map_path(&self, map_name: &str) -> Result<Vec<String>, RpcError> {
        if !self.maps.contains_key(map_name) {
            return Err(rejected(format!("map not found: {map_name}")));
        }
        Ok(vec![format!("/home/magic/maps/{map_name}")])
    }

    pub(crate) fn all_map_info(&self) -> AllMapInfo {
        AllMapInfo {
            current_map_name: self.current_map.clone().unwrap_or_default(),
            map_infos: self.maps.values().cloned().collect(),
        }
    }

    pub(crate) fn init_pose(&mut self, pose: Pose3DEuler) -> Result<(), RpcError> {
        if self.slam_mode != SlamMode::Localization {
            return Err(rejected("init pose requires localization mode"));
        }
        self.init_pose = pose;
        self.localized = true;
        Ok(())
    }

    pub(crate) fn localization_info(&self) -> LocalizationInfo {
        LocalizationInfo {
            is_localization: self.slam_mode == SlamMode::Localization && self.localized,
            pose: self.init_pose,
        }
    }

    pub(crate) fn point_cloud_map(&self) -> Result<PointCloud2, RpcError> {
        let Some(name) = self.current_map.as_deref() else {
            return Err(rejected("no map loaded"));
        };
        Ok(synth_point_cloud(name))
    }

    pub(crate) fn activate_nav(&mut self, mode: NavMode, map_path: &str) -> Result<(), RpcError> {
        if mode == NavMode::GridMap && map_path.is_empty() {
            return Err(rejected("grid map navigation requires a map path"));
        }
        if mode == NavMode::Idle {
            self.nav_status = NavStatus::default();
        }
        self.nav_mode = mode;
        Ok(())
    }

    pub(crate) fn nav_mode(&self) -> NavMode {
        self.nav_mode
    }

    pub(crate) fn set_nav_target(&mut self, target: NavTarget) -> Result<(), RpcError> {
        if self.nav_mode != NavMode::GridMap {
            return Err(rejected("navigation mode not active"));
        }
        self.nav_status = NavStatus {
            id: target.id,
            status: NavStatusType::Running,
            error_code: 0,
            error_desc: String::new(),
        };
        Ok(())
    }

    pub(crate) fn pause_nav(&mut self) -> Result<(), RpcError> {
        match self.nav_status.status {
            NavStatusType::Running | NavStatusType::Continue => {
                self.nav_status.status = NavStatusType::Pause;
                Ok(())
            }
            _ => Err(rejected("no active navigation task to pause")),
        }
    }

    pub(crate) fn resume_nav(&mut self) -> Result<(), RpcError> {
        if self.nav_status.status != NavStatusType::Pause {
            return Err(rejected("navigation task not paused"));
        }
        self.nav_status.status = NavStatusType::Continue;
        Ok(())
    }

    pub(crate) fn cancel_nav(&mut self) -> Result<(), RpcError> {
        match self.nav_status.status {
            NavStatusType::Running | NavStatusType::Pause | NavStatusType::Continue => {
                self.nav_status.status = NavStatusType::Cancel;
                Ok(())
            }
            _ => Err(rejected("no active navigation task to cancel")),
        }
    }

    pub(crate) fn nav_status(&self) -> NavStatus {
        self.nav_status.clone()
    }

    /// 终结当前任务（测试钩子），返回是否有任务被终结
    pub(crate) fn complete(&mut self, success: bool) -> bool {
        match self.nav_status.status {
            NavStatusType::Running | NavStatusType::Continue => {
                self.nav_status.status = if success {
                    NavStatusType::EndSuccess
                } else {
                    NavStatusType::EndFailed
                };
                if !success {
                    self.nav_status.error_code = 1;
                    self.nav_status.error_desc = "navigation failed".to_string();
                }
                true
            }
            _ => false,
        }
    }

    fn require_mapping_mode(&self) -> Result<(), RpcError> {
        if self.slam_mode != SlamMode::Mapping {
            return Err(rejected(format!(
                "operation requires mapping mode, current {:?}",
                self.slam_mode
            )));
        }
        Ok(())
    }
}

/// 合成一张全未知栅格地图
fn synth_map(map_name: &str) -> MapInfo {
    let pixels = (SYNTH_MAP_SIZE * SYNTH_MAP_SIZE) as usize;
    MapInfo {
        map_name: map_name.to_string(),
        map_meta_data: MapMetaData {
            resolution: SYNTH_MAP_RESOLUTION,
            origin: Pose3DEuler::default(),
            map_image_data: MapImageData::new(
                SYNTH_MAP_SIZE,
                SYNTH_MAP_SIZE,
                255,
                vec![SYNTH_MAP_GRAY; pixels],
            ),
        },
    }
}

/// 合成一帧 XYZ float32 点云
fn synth_point_cloud(frame_id: &str) -> PointCloud2 {
    let width = 4;
    let point_step = 12;
    PointCloud2 {
        header: Header {
            stamp: 0,
            frame_id: frame_id.to_string(),
        },
        height: 1,
        width,
        fields: vec![
            PointField {
                name: "x".to_string(),
                offset: 0,
                datatype: PointField::FLOAT32,
                count: 1,
            },
            PointField {
                name: "y".to_string(),
                offset: 4,
                datatype: PointField::FLOAT32,
                count: 1,
            },
            PointField {
                name: "z".to_string(),
                offset: 8,
                datatype: PointField::FLOAT32,
                count: 1,
            },
        ],
        is_bigendian: false,
        point_step,
        row_step: width * point_step,
        data: vec![0u8; (width * point_step) as usize],
        is_dense: true,
    }
}

//! 订阅槽与遥测路由
//!
//! 每路遥测流至多一个活跃回调。[`CallbackSlot`] 用 `ArcSwapOption` 做无锁
//! 原子替换：订阅覆盖旧回调，退订清空，二者都是幂等操作，和分发线程并发
//! 安全。正在执行中的旧回调会跑完当次调用，之后不再被触发。
//!
//! 回调在分发线程上执行，与调用方并发。回调体必须保持非阻塞；消费不过来
//! 时应在回调内做抽样（每 N 条取一条），而不是在回调里等待。

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use magicbot_rpc::TelemetryEvent;
use magicbot_types::{
    AudioStream, BinocularCameraFrame, CameraInfo, HandState, Image, Imu, JointState, Odometry,
    PointCloud2, WakeupStatus,
};

/// 订阅回调的装箱形式
pub type SubscriberFn<T> = Box<dyn Fn(Arc<T>) + Send + Sync>;

/// 单路遥测流的回调槽
pub struct CallbackSlot<T> {
    slot: ArcSwapOption<SubscriberFn<T>>,
}

impl<T> Default for CallbackSlot<T> {
    fn default() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }
}

impl<T> fmt::Debug for CallbackSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSlot")
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}

impl<T> CallbackSlot<T> {
    /// 创建空槽
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册回调，原子替换已有回调
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(Arc<T>) + Send + Sync + 'static,
    {
        self.slot.store(Some(Arc::new(Box::new(callback))));
    }

    /// 清空槽；未订阅时为空操作
    pub fn unsubscribe(&self) {
        self.slot.store(None);
    }

    /// 是否有活跃回调
    pub fn is_subscribed(&self) -> bool {
        self.slot.load().is_some()
    }

    /// 投递一条数据，返回是否有回调接收
    pub fn notify(&self, payload: Arc<T>) -> bool {
        match self.slot.load().as_ref() {
            Some(callback) => {
                callback(payload);
                true
            }
            None => false,
        }
    }
}

/// 遥测路由表
///
/// 每路流一个类型化的槽，控制器写、分发线程读，通过 `Arc` 共享。
#[derive(Debug, Default)]
pub struct TelemetryRouter {
    pub(crate) origin_audio: CallbackSlot<AudioStream>,
    pub(crate) bf_audio: CallbackSlot<AudioStream>,
    pub(crate) wakeup_status: CallbackSlot<WakeupStatus>,
    pub(crate) arm_joint_state: CallbackSlot<JointState>,
    pub(crate) leg_joint_state: CallbackSlot<JointState>,
    pub(crate) head_joint_state: CallbackSlot<JointState>,
    pub(crate) waist_joint_state: CallbackSlot<JointState>,
    pub(crate) hand_state: CallbackSlot<HandState>,
    pub(crate) body_imu: CallbackSlot<Imu>,
    pub(crate) lidar_imu: CallbackSlot<Imu>,
    pub(crate) lidar_point_cloud: CallbackSlot<PointCloud2>,
    pub(crate) head_rgbd_color_image: CallbackSlot<Image>,
    pub(crate) head_rgbd_depth_image: CallbackSlot<Image>,
    pub(crate) head_rgbd_camera_info: CallbackSlot<CameraInfo>,
    pub(crate) binocular_image: CallbackSlot<BinocularCameraFrame>,
    pub(crate) binocular_camera_info: CallbackSlot<CameraInfo>,
    pub(crate) odometry: CallbackSlot<Odometry>,
}

impl TelemetryRouter {
    /// 创建全空路由表
    pub fn new() -> Self {
        Self::default()
    }

    /// 按事件类型投递到对应槽，返回是否有订阅者接收
    pub fn dispatch(&self, event: TelemetryEvent) -> bool {
        match event {
            TelemetryEvent::OriginAudio(payload) => self.origin_audio.notify(payload),
            TelemetryEvent::BfAudio(payload) => self.bf_audio.notify(payload),
            TelemetryEvent::WakeupStatus(payload) => self.wakeup_status.notify(payload),
            TelemetryEvent::ArmJointState(payload) => self.arm_joint_state.notify(payload),
            TelemetryEvent::LegJointState(payload) => self.leg_joint_state.notify(payload),
            TelemetryEvent::HeadJointState(payload) => self.head_joint_state.notify(payload),
            TelemetryEvent::WaistJointState(payload) => self.waist_joint_state.notify(payload),
            TelemetryEvent::HandState(payload) => self.hand_state.notify(payload),
            TelemetryEvent::BodyImu(payload) => self.body_imu.notify(payload),
            TelemetryEvent::LidarImu(payload) => self.lidar_imu.notify(payload),
            TelemetryEvent::LidarPointCloud(payload) => self.lidar_point_cloud.notify(payload),
            TelemetryEvent::HeadRgbdColorImage(payload) => {
                self.head_rgbd_color_image.notify(payload)
            }
            TelemetryEvent::HeadRgbdDepthImage(payload) => {
                self.head_rgbd_depth_image.notify(payload)
            }
            TelemetryEvent::HeadRgbdCameraInfo(payload) => {
                self.head_rgbd_camera_info.notify(payload)
            }
            TelemetryEvent::BinocularImage(payload) => self.binocular_image.notify(payload),
            TelemetryEvent::BinocularCameraInfo(payload) => {
                self.binocular_camera_info.notify(payload)
            }
            TelemetryEvent::Odometry(payload) => self.odometry.notify(payload),
        }
    }

    /// 清空所有槽
    pub fn clear_all(&self) {
        self.origin_audio.unsubscribe();
        self.bf_audio.unsubscribe();
        self.wakeup_status.unsubscribe();
        self.arm_joint_state.unsubscribe();
        self.leg_joint_state.unsubscribe();
        self.head_joint_state.unsubscribe();
        self.waist_joint_state.unsubscribe();
        self.hand_state.unsubscribe();
        self.body_imu.unsubscribe();
        self.lidar_imu.unsubscribe();
        self.lidar_point_cloud.unsubscribe();
        self.head_rgbd_color_image.unsubscribe();
        self.head_rgbd_depth_image.unsubscribe();
        self.head_rgbd_camera_info.unsubscribe();
        self.binocular_image.unsubscribe();
        self.binocular_camera_info.unsubscribe();
        self.odometry.unsubscribe();
    }
}

//! 定义了服务生命周期管理的可配置参数。
//! Defines configurable parameters for service lifecycle management.

use crate::core::state::ErrorCode;

/// A structure containing all configurable parameters for a service manager.
///
/// 包含服务管理器所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct Config {
    /// The interface name every endpoint is registered under.
    /// 每个端点注册时使用的接口名。
    pub interface_name: String,

    /// Channel capacities used by the manager actor.
    /// 管理器 actor 使用的通道容量。
    pub channels: ChannelConfig,

    /// The reason reported when a pending Connect fails but the backend
    /// has no last error recorded.
    ///
    /// 当挂起的连接请求失败但后端没有记录最近错误时，所报告的原因。
    pub fallback_error: ErrorCode,
}

/// Channel capacities.
///
/// 通道容量参数。
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Capacity of the command channel from handles to the actor.
    /// 从句柄到 actor 的命令通道容量。
    pub command_capacity: usize,
    /// Capacity of the state event channel created by [`crate::manager::ServiceManager::event_channel`].
    /// 由 `event_channel` 创建的状态事件通道容量。
    pub event_capacity: usize,
    /// Capacity of the `status_changed` broadcast. Slow subscribers that
    /// fall further behind than this lose the oldest notifications.
    ///
    /// `status_changed` 广播的容量。落后超过此值的慢订阅者会丢失最旧的通知。
    pub status_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface_name: "org.bluez.Service1".to_string(),
            channels: ChannelConfig::default(),
            fallback_error: ErrorCode::EIO,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_capacity: 128,
            event_capacity: 128,
            status_capacity: 64,
        }
    }
}

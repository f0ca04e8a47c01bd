//! The service object a lifecycle controller drives.
//!
//! 生命周期控制器所驱动的服务对象。

use super::identity::ServiceId;
use crate::core::state::{ErrorCode, ServiceState};
use std::sync::Arc;

/// The owner of the raw per-service state machine and the transport-level
/// connect/disconnect operations.
///
/// `connect` and `disconnect` only start an operation. Their eventual
/// outcome is reported later as a state transition through a
/// [`StateEventSource`](super::events::StateEventSource).
///
/// 原始服务状态机以及传输层连接/断开操作的所有者。
///
/// `connect` 与 `disconnect` 只是发起操作，最终结果稍后通过状态转换事件报告。
pub trait ServiceBackend: Send + Sync + 'static {
    /// 当前原始状态。
    fn state(&self, id: &ServiceId) -> ServiceState;

    /// The last error recorded for the service, if any.
    /// 服务记录的最近错误（如有）。
    fn last_error(&self, id: &ServiceId) -> Option<ErrorCode>;

    /// Whether an automatic reconnect attempt is underway.
    /// 是否正在进行自动重连。
    fn is_reconnecting(&self, id: &ServiceId) -> bool;

    /// Starts connecting. An `Err` means the attempt was refused outright.
    /// 开始连接。返回 `Err` 表示尝试被直接拒绝。
    fn connect(&self, id: &ServiceId) -> Result<(), ErrorCode>;

    /// Starts disconnecting. An `Err` means the attempt was refused outright.
    /// 开始断开。返回 `Err` 表示尝试被直接拒绝。
    fn disconnect(&self, id: &ServiceId) -> Result<(), ErrorCode>;
}

impl<B: ServiceBackend + ?Sized> ServiceBackend for Arc<B> {
    fn state(&self, id: &ServiceId) -> ServiceState {
        (**self).state(id)
    }

    fn last_error(&self, id: &ServiceId) -> Option<ErrorCode> {
        (**self).last_error(id)
    }

    fn is_reconnecting(&self, id: &ServiceId) -> bool {
        (**self).is_reconnecting(id)
    }

    fn connect(&self, id: &ServiceId) -> Result<(), ErrorCode> {
        (**self).connect(id)
    }

    fn disconnect(&self, id: &ServiceId) -> Result<(), ErrorCode> {
        (**self).disconnect(id)
    }
}

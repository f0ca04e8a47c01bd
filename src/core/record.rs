//! The per-endpoint record kept by the lifecycle controller.
//!
//! 生命周期控制器为每个端点保存的记录。

use super::{pending::PendingRequests, projection::StatusLabel, state::ServiceState};
use crate::service::ServiceId;

/// One live remote-service binding.
///
/// 一个存活的远程服务绑定。
#[derive(Debug)]
pub struct EndpointRecord<R> {
    pub(crate) id: ServiceId,
    /// The object path the endpoint is registered under.
    /// 端点注册时使用的对象路径。
    pub(crate) path: String,
    /// The last raw state observed for the endpoint.
    /// 端点最近一次被观察到的原始状态。
    pub(crate) state: ServiceState,
    /// The most recently emitted label.
    /// 最近一次发出的标签。
    pub(crate) label: StatusLabel,
    pub(crate) pending: PendingRequests<R>,
}

impl<R> EndpointRecord<R> {
    pub(crate) fn new(id: ServiceId, path: String, state: ServiceState, label: StatusLabel) -> Self {
        Self {
            id,
            path,
            state,
            label,
            pending: PendingRequests::new(),
        }
    }

    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn label(&self) -> StatusLabel {
        self.label
    }

    pub fn pending(&self) -> &PendingRequests<R> {
        &self.pending
    }
}

//! State-change notifications delivered by the service owner.
//!
//! 由服务所有者投递的状态变化通知。

use super::identity::ServiceId;
use crate::core::state::ServiceState;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One raw state transition of one service.
/// 单个服务的一次原始状态转换。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateEvent {
    pub id: ServiceId,
    pub old_state: ServiceState,
    pub new_state: ServiceState,
}

impl StateEvent {
    pub fn new(id: ServiceId, old_state: ServiceState, new_state: ServiceState) -> Self {
        Self {
            id,
            old_state,
            new_state,
        }
    }
}

/// An asynchronous subscription of state events.
///
/// Implementations must deliver the events of any one service in the
/// order the transitions happened. Events of different services may
/// interleave freely.
///
/// 状态事件的异步订阅。
///
/// 实现必须按照转换发生的顺序投递同一服务的事件。不同服务的事件可以任意交错。
#[async_trait]
pub trait StateEventSource: Send + 'static {
    /// Waits for the next event. `None` means the source is exhausted.
    /// 等待下一个事件。`None` 表示事件源已耗尽。
    async fn next_event(&mut self) -> Option<StateEvent>;
}

#[async_trait]
impl StateEventSource for mpsc::Receiver<StateEvent> {
    async fn next_event(&mut self) -> Option<StateEvent> {
        self.recv().await
    }
}

#[async_trait]
impl StateEventSource for mpsc::UnboundedReceiver<StateEvent> {
    async fn next_event(&mut self) -> Option<StateEvent> {
        self.recv().await
    }
}

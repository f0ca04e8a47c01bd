//! 端点生命周期控制器 - 将状态变化与挂起的客户端请求关联起来
//! Endpoint lifecycle controller - correlates state changes with pending
//! client requests
//!
//! The controller owns one [`EndpointRecord`] per live endpoint. It is driven
//! by two event sources: client Connect/Disconnect requests and raw state
//! transitions reported by the service owner. Every accepted request is
//! answered exactly once, when the transition that settles it arrives.
//!
//! All methods take `&mut self`: the controller relies on its owner to
//! serialize every operation. [`crate::manager`] does so by running it inside
//! a single actor task.
//!
//! 控制器为每个存活端点持有一个 [`EndpointRecord`]。它由两个事件源驱动：
//! 客户端的连接/断开请求，以及服务所有者报告的原始状态转换。每个被接受的请求
//! 都会在决定其结果的状态转换到达时被恰好应答一次。
//!
//! 所有方法都接收 `&mut self`：控制器依赖其所有者串行化所有操作。

use super::{
    pending::{Outcome, RequestKind},
    projection::{StatusLabel, project},
    record::EndpointRecord,
    state::ServiceState,
};
use crate::{
    config::Config,
    error::{Error, Result},
    service::{ObjectRegistry, ServiceBackend, ServiceId, StateEvent},
};
use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, error, info, trace, warn};

/// The deferred reply to an accepted request.
///
/// 已接受请求的延迟应答。
pub trait Reply {
    /// Delivers the completion of the request. Consumes the reply so it can
    /// only be delivered once.
    ///
    /// 投递请求的完成结果。该方法会消耗应答对象，因此只能投递一次。
    fn complete(self, outcome: Outcome);
}

impl Reply for oneshot::Sender<Outcome> {
    fn complete(self, outcome: Outcome) {
        // The requester may have stopped waiting. 请求方可能已不再等待。
        let _ = self.send(outcome);
    }
}

/// Emitted whenever the projected label of an endpoint changes.
/// 每当端点的投影标签变化时发出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChanged {
    pub id: ServiceId,
    pub label: StatusLabel,
}

/// The state machine over endpoint records.
pub struct LifecycleController<B, G, R> {
    backend: B,
    registry: G,
    config: Arc<Config>,
    records: HashMap<ServiceId, EndpointRecord<R>>,
    status_tx: broadcast::Sender<StatusChanged>,
}

impl<B, G, R> std::fmt::Debug for LifecycleController<B, G, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleController")
            .field("records", &self.records.len())
            .field("status_subscribers", &self.status_tx.receiver_count())
            .finish()
    }
}

impl<B, G, R> LifecycleController<B, G, R>
where
    B: ServiceBackend,
    G: ObjectRegistry,
    R: Reply,
{
    pub fn new(
        config: Arc<Config>,
        backend: B,
        registry: G,
        status_tx: broadcast::Sender<StatusChanged>,
    ) -> Self {
        Self {
            backend,
            registry,
            config,
            records: HashMap::new(),
            status_tx,
        }
    }

    /// Starts a Connect. On `Ok` the request is pending and `request` will be
    /// completed by a later state change. A refusal by the service leaves
    /// nothing pending.
    ///
    /// 发起连接。返回 `Ok` 时请求处于挂起状态，`request` 将由之后的状态变化完成。
    /// 若服务拒绝，则不会留下挂起的请求。
    pub fn handle_connect_request(&mut self, id: &ServiceId, request: R) -> Result<()> {
        let record = self.record_entry(id)?;
        if let Err(rejected) = record.pending.accept_connect(request) {
            warn!(service = %id, "Connect already in progress, rejecting request");
            return Err(Error::InProgress(rejected.kind));
        }

        if let Err(code) = self.backend.connect(id) {
            if let Some(record) = self.records.get_mut(id) {
                record.pending.withdraw_connect();
            }
            warn!(service = %id, error = %code, "Connect refused by service");
            return Err(Error::OperationFailed(code));
        }

        debug!(service = %id, "Connect accepted, reply deferred");
        Ok(())
    }

    /// Starts a Disconnect. The slot is reserved before the service is asked
    /// to disconnect and released again if the service refuses.
    ///
    /// 发起断开。在请求服务断开之前先预留槽位，若服务拒绝则释放槽位。
    pub fn handle_disconnect_request(&mut self, id: &ServiceId, request: R) -> Result<()> {
        let record = self.record_entry(id)?;
        if let Err(rejected) = record.pending.accept_disconnect(request) {
            warn!(service = %id, "Disconnect already in progress, rejecting request");
            return Err(Error::InProgress(rejected.kind));
        }

        if let Err(code) = self.backend.disconnect(id) {
            if let Some(record) = self.records.get_mut(id) {
                record.pending.withdraw_disconnect();
            }
            warn!(service = %id, error = %code, "Disconnect refused by service");
            return Err(Error::OperationFailed(code));
        }

        debug!(service = %id, "Disconnect accepted, reply deferred");
        Ok(())
    }

    /// Feeds one raw transition into the controller.
    ///
    /// 将一次原始状态转换输入控制器。
    pub fn handle_state_change(&mut self, event: StateEvent) {
        let StateEvent {
            id,
            old_state,
            new_state,
        } = event;

        debug!(service = %id, from = ?old_state, to = ?new_state, "Service state changed");

        if new_state.is_terminal() {
            match self.records.remove(&id) {
                Some(record) => self.destroy_record(record),
                None => trace!(service = %id, "Unavailable service has no record, nothing to clean up"),
            }
            return;
        }

        let record = match self.records.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(slot) => {
                match Self::create_record(&self.backend, &self.registry, &self.config, &id, old_state) {
                    Ok(record) => slot.insert(record),
                    Err(e) => {
                        error!(service = %id, error = %e, "Dropping state change for unregistrable service");
                        return;
                    }
                }
            }
        };
        record.state = new_state;

        match new_state {
            ServiceState::Connected => {
                if let Some((reply, outcome)) = record.pending.resolve_connect(Outcome::Success) {
                    debug!(service = %id, "Completing pending connect");
                    reply.complete(outcome);
                }
            }
            ServiceState::Disconnected => {
                if let Some((reply, outcome)) = record.pending.resolve_disconnect(Outcome::Success) {
                    debug!(service = %id, "Completing pending disconnect");
                    reply.complete(outcome);
                }
                // A connect attempt that ended up disconnected has failed.
                let reason = self
                    .backend
                    .last_error(&id)
                    .unwrap_or(self.config.fallback_error);
                if let Some((reply, outcome)) =
                    record.pending.resolve_connect(Outcome::Failure(reason))
                {
                    debug!(service = %id, error = %reason, "Failing pending connect");
                    reply.complete(outcome);
                }
            }
            _ => {}
        }

        let label = project(
            new_state,
            self.backend.last_error(&id),
            self.backend.is_reconnecting(&id),
        );
        if label == record.label {
            trace!(service = %id, %label, "Label unchanged, no notification");
            return;
        }
        record.label = label;
        info!(service = %id, %label, "Service status changed");
        // Nobody listening is fine. 没有订阅者也没关系。
        let _ = self.status_tx.send(StatusChanged { id, label });
    }

    /// The current label of `id`. A service without a record gets one
    /// created from its current raw state, unless it is unavailable.
    ///
    /// `id` 的当前标签。没有记录的服务会依据其当前原始状态创建记录，除非它不可用。
    pub fn current_status(&mut self, id: &ServiceId) -> Result<StatusLabel> {
        match self.record_entry(id) {
            Ok(record) => Ok(record.label),
            Err(Error::NotAvailable) => Ok(StatusLabel::Unavailable),
            Err(e) => Err(e),
        }
    }

    /// Every live endpoint with its label, ordered by identity.
    /// 所有存活端点及其标签，按标识排序。
    pub fn services(&self) -> Vec<(ServiceId, StatusLabel)> {
        let mut services: Vec<_> = self
            .records
            .values()
            .map(|record| (record.id.clone(), record.label))
            .collect();
        services.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));
        services
    }

    /// Destroys every record without answering pending requests.
    ///
    /// 销毁所有记录，不应答任何挂起的请求。
    pub fn shutdown(&mut self) {
        let mut abandoned = 0usize;
        for (_, record) in self.records.drain() {
            abandoned += usize::from(record.pending.has_connect());
            abandoned += usize::from(record.pending.has_disconnect());
            self.registry
                .unregister(&record.path, &self.config.interface_name);
        }
        if abandoned > 0 {
            warn!(abandoned, "Abandoning in-flight requests on shutdown");
        }
        info!("Lifecycle controller shut down");
    }

    pub fn record(&self, id: &ServiceId) -> Option<&EndpointRecord<R>> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up the record of `id`, creating it from the service's current
    /// state if needed.
    fn record_entry(&mut self, id: &ServiceId) -> Result<&mut EndpointRecord<R>> {
        match self.records.entry(id.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let state = self.backend.state(id);
                if state.is_terminal() {
                    return Err(Error::NotAvailable);
                }
                let record =
                    Self::create_record(&self.backend, &self.registry, &self.config, id, state)?;
                Ok(slot.insert(record))
            }
        }
    }

    fn create_record(
        backend: &B,
        registry: &G,
        config: &Config,
        id: &ServiceId,
        state: ServiceState,
    ) -> Result<EndpointRecord<R>> {
        let path = id.object_path();
        registry.register(&path, &config.interface_name, id)?;
        let label = project(state, backend.last_error(id), backend.is_reconnecting(id));
        info!(service = %id, %path, %label, "Created service record");
        Ok(EndpointRecord::new(id.clone(), path, state, label))
    }

    fn destroy_record(&self, mut record: EndpointRecord<R>) {
        if !record.pending.is_empty() {
            // Only reachable when the service vanishes mid-operation.
            let reason = self
                .backend
                .last_error(&record.id)
                .unwrap_or(self.config.fallback_error);
            warn!(service = %record.id, error = %reason, "Service became unavailable with requests pending");
            if let Some((reply, outcome)) = record.pending.resolve_disconnect(Outcome::Failure(reason)) {
                reply.complete(outcome);
            }
            if let Some((reply, outcome)) = record.pending.resolve_connect(Outcome::Failure(reason)) {
                reply.complete(outcome);
            }
        }
        self.registry
            .unregister(&record.path, &self.config.interface_name);
        info!(service = %record.id, path = %record.path, "Removed service record");
    }
}

//! 测试辅助工具模块
//! Test utilities module

#![cfg(test)]

use crate::{
    config::Config,
    core::{
        ErrorCode, LifecycleController, Outcome, Reply, RequestKind, ServiceState, StatusChanged,
    },
    service::{InterfaceRegistry, ServiceBackend, ServiceId, StateEvent},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::broadcast;

pub const TEST_DEVICE: &str = "/org/bluez/hci0/dev_00_11_22_33_44_55";
pub const A2DP_SINK_UUID: &str = "0000110b-0000-1000-8000-00805f9b34fb";
pub const HFP_AG_UUID: &str = "0000111f-0000-1000-8000-00805f9b34fb";

pub fn a2dp_sink() -> ServiceId {
    ServiceId::new(TEST_DEVICE, A2DP_SINK_UUID)
}

pub fn hfp_ag() -> ServiceId {
    ServiceId::new(TEST_DEVICE, HFP_AG_UUID)
}

/// The scripted state of one mock service.
#[derive(Debug, Clone)]
pub struct MockService {
    pub state: ServiceState,
    pub last_error: Option<ErrorCode>,
    pub reconnecting: bool,
    pub connect_result: Result<(), ErrorCode>,
    pub disconnect_result: Result<(), ErrorCode>,
}

impl Default for MockService {
    fn default() -> Self {
        Self {
            state: ServiceState::Disconnected,
            last_error: None,
            reconnecting: false,
            connect_result: Ok(()),
            disconnect_result: Ok(()),
        }
    }
}

/// A scripted `ServiceBackend`. Unknown services report `Unavailable`.
#[derive(Debug, Default)]
pub struct MockBackend {
    services: Mutex<HashMap<ServiceId, MockService>>,
    calls: Mutex<Vec<(RequestKind, ServiceId)>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, id: &ServiceId, state: ServiceState) {
        self.update(id, |s| s.state = state);
    }

    pub fn set_error(&self, id: &ServiceId, error: Option<ErrorCode>) {
        self.update(id, |s| s.last_error = error);
    }

    pub fn set_reconnecting(&self, id: &ServiceId, reconnecting: bool) {
        self.update(id, |s| s.reconnecting = reconnecting);
    }

    pub fn refuse_connect(&self, id: &ServiceId, code: ErrorCode) {
        self.update(id, |s| s.connect_result = Err(code));
    }

    pub fn allow_connect(&self, id: &ServiceId) {
        self.update(id, |s| s.connect_result = Ok(()));
    }

    pub fn refuse_disconnect(&self, id: &ServiceId, code: ErrorCode) {
        self.update(id, |s| s.disconnect_result = Err(code));
    }

    pub fn allow_disconnect(&self, id: &ServiceId) {
        self.update(id, |s| s.disconnect_result = Ok(()));
    }

    pub fn calls(&self) -> Vec<(RequestKind, ServiceId)> {
        self.calls.lock().unwrap().clone()
    }

    fn update(&self, id: &ServiceId, f: impl FnOnce(&mut MockService)) {
        let mut services = self.services.lock().unwrap();
        f(services.entry(id.clone()).or_default());
    }

    fn get(&self, id: &ServiceId) -> Option<MockService> {
        self.services.lock().unwrap().get(id).cloned()
    }
}

impl ServiceBackend for MockBackend {
    fn state(&self, id: &ServiceId) -> ServiceState {
        self.get(id)
            .map(|s| s.state)
            .unwrap_or(ServiceState::Unavailable)
    }

    fn last_error(&self, id: &ServiceId) -> Option<ErrorCode> {
        self.get(id).and_then(|s| s.last_error)
    }

    fn is_reconnecting(&self, id: &ServiceId) -> bool {
        self.get(id).is_some_and(|s| s.reconnecting)
    }

    fn connect(&self, id: &ServiceId) -> Result<(), ErrorCode> {
        self.calls
            .lock()
            .unwrap()
            .push((RequestKind::Connect, id.clone()));
        self.get(id).map_or(Err(ErrorCode::ENODEV), |s| s.connect_result)
    }

    fn disconnect(&self, id: &ServiceId) -> Result<(), ErrorCode> {
        self.calls
            .lock()
            .unwrap()
            .push((RequestKind::Disconnect, id.clone()));
        self.get(id)
            .map_or(Err(ErrorCode::ENODEV), |s| s.disconnect_result)
    }
}

/// A shared, ordered log of every completed reply.
#[derive(Debug, Clone, Default)]
pub struct ReplyLog {
    entries: Arc<Mutex<Vec<(&'static str, Outcome)>>>,
}

impl ReplyLog {
    pub fn reply(&self, tag: &'static str) -> RecordingReply {
        RecordingReply {
            tag,
            log: self.clone(),
        }
    }

    pub fn entries(&self) -> Vec<(&'static str, Outcome)> {
        self.entries.lock().unwrap().clone()
    }
}

/// A `Reply` that appends its completion to a `ReplyLog`.
#[derive(Debug)]
pub struct RecordingReply {
    tag: &'static str,
    log: ReplyLog,
}

impl Reply for RecordingReply {
    fn complete(self, outcome: Outcome) {
        self.log.entries.lock().unwrap().push((self.tag, outcome));
    }
}

pub type TestController =
    LifecycleController<Arc<MockBackend>, Arc<InterfaceRegistry>, RecordingReply>;

/// A harness for driving a single `LifecycleController` synchronously.
pub struct ControllerHarness {
    pub controller: TestController,
    pub backend: Arc<MockBackend>,
    pub registry: Arc<InterfaceRegistry>,
    pub replies: ReplyLog,
    status_rx: broadcast::Receiver<StatusChanged>,
}

impl ControllerHarness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let backend = MockBackend::new();
        let registry = Arc::new(InterfaceRegistry::new());
        let (status_tx, status_rx) = broadcast::channel(64);
        let controller =
            LifecycleController::new(Arc::new(config), backend.clone(), registry.clone(), status_tx);
        Self {
            controller,
            backend,
            registry,
            replies: ReplyLog::default(),
            status_rx,
        }
    }

    /// Moves the mock service to `new` and reports the transition.
    pub fn transition(&mut self, id: &ServiceId, old: ServiceState, new: ServiceState) {
        self.backend.insert(id, new);
        self.controller
            .handle_state_change(StateEvent::new(id.clone(), old, new));
    }

    /// Takes every status notification emitted so far.
    pub fn drain_status(&mut self) -> Vec<StatusChanged> {
        let mut changes = Vec::new();
        while let Ok(change) = self.status_rx.try_recv() {
            changes.push(change);
        }
        changes
    }
}

//! tests/common/harness.rs
use service_lifecycle::{
    Config, ServiceManager, StatusListener,
    core::{ErrorCode, ServiceState},
    service::{InterfaceRegistry, ServiceBackend, ServiceId, StateEvent},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, Once},
};
use tokio::sync::mpsc;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "service_lifecycle=debug,lifecycle=info".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

#[derive(Debug, Clone)]
struct Scripted {
    state: ServiceState,
    last_error: Option<ErrorCode>,
    reconnecting: bool,
    refuse_connect: Option<ErrorCode>,
    refuse_disconnect: Option<ErrorCode>,
}

impl Scripted {
    fn new(state: ServiceState) -> Self {
        Self {
            state,
            last_error: None,
            reconnecting: false,
            refuse_connect: None,
            refuse_disconnect: None,
        }
    }
}

/// A service owner whose state is moved by the test.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    services: Mutex<HashMap<ServiceId, Scripted>>,
}

impl ScriptedBackend {
    pub fn add(&self, id: &ServiceId, state: ServiceState) {
        self.services
            .lock()
            .unwrap()
            .insert(id.clone(), Scripted::new(state));
    }

    pub fn set_error(&self, id: &ServiceId, error: Option<ErrorCode>) {
        self.with(id, |s| s.last_error = error);
    }

    pub fn set_reconnecting(&self, id: &ServiceId, reconnecting: bool) {
        self.with(id, |s| s.reconnecting = reconnecting);
    }

    pub fn refuse_connect(&self, id: &ServiceId, code: Option<ErrorCode>) {
        self.with(id, |s| s.refuse_connect = code);
    }

    pub fn refuse_disconnect(&self, id: &ServiceId, code: Option<ErrorCode>) {
        self.with(id, |s| s.refuse_disconnect = code);
    }

    /// Moves the service to `new`, returning the state it left.
    fn move_to(&self, id: &ServiceId, new: ServiceState) -> ServiceState {
        let mut services = self.services.lock().unwrap();
        if let Some(s) = services.get_mut(id) {
            return std::mem::replace(&mut s.state, new);
        }
        services.insert(id.clone(), Scripted::new(new));
        ServiceState::Unavailable
    }

    fn with(&self, id: &ServiceId, f: impl FnOnce(&mut Scripted)) {
        if let Some(s) = self.services.lock().unwrap().get_mut(id) {
            f(s);
        }
    }

    fn get(&self, id: &ServiceId) -> Option<Scripted> {
        self.services.lock().unwrap().get(id).cloned()
    }
}

impl ServiceBackend for ScriptedBackend {
    fn state(&self, id: &ServiceId) -> ServiceState {
        self.get(id).map_or(ServiceState::Unavailable, |s| s.state)
    }

    fn last_error(&self, id: &ServiceId) -> Option<ErrorCode> {
        self.get(id).and_then(|s| s.last_error)
    }

    fn is_reconnecting(&self, id: &ServiceId) -> bool {
        self.get(id).is_some_and(|s| s.reconnecting)
    }

    fn connect(&self, id: &ServiceId) -> Result<(), ErrorCode> {
        match self.get(id) {
            Some(s) => s.refuse_connect.map_or(Ok(()), Err),
            None => Err(ErrorCode::ENODEV),
        }
    }

    fn disconnect(&self, id: &ServiceId) -> Result<(), ErrorCode> {
        match self.get(id) {
            Some(s) => s.refuse_disconnect.map_or(Ok(()), Err),
            None => Err(ErrorCode::ENODEV),
        }
    }
}

/// A running service manager plus the knobs to drive it.
pub struct TestHarness {
    pub manager: ServiceManager,
    pub listener: StatusListener,
    pub backend: Arc<ScriptedBackend>,
    pub registry: Arc<InterfaceRegistry>,
    events_tx: mpsc::Sender<StateEvent>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        init_tracing();
        let backend = Arc::new(ScriptedBackend::default());
        let registry = Arc::new(InterfaceRegistry::new());
        let (events_tx, events_rx) = ServiceManager::event_channel(&config);
        let (manager, listener) =
            ServiceManager::spawn(config, backend.clone(), registry.clone(), events_rx);
        Self {
            manager,
            listener,
            backend,
            registry,
            events_tx,
        }
    }

    /// Moves `id` to `new` and delivers the transition to the manager.
    pub async fn transition(&self, id: &ServiceId, new: ServiceState) {
        let old = self.backend.move_to(id, new);
        self.events_tx
            .send(StateEvent::new(id.clone(), old, new))
            .await
            .unwrap();
    }

    /// Waits until every event sent so far has been processed. Events and
    /// commands share one actor, so a status round trip flushes the queue
    /// once the event channel has been drained.
    pub async fn settle(&self) {
        while self.events_tx.capacity() < self.events_tx.max_capacity() {
            tokio::task::yield_now().await;
        }
        let _ = self.manager.services().await;
    }
}

pub fn service(device: &str, uuid: &str) -> ServiceId {
    ServiceId::new(format!("/org/bluez/hci0/{}", device), uuid)
}

//! The lifecycle core: state projection, pending-request tracking and the
//! controller tying them to endpoint records.
//! 生命周期核心：状态投影、挂起请求跟踪，以及将二者与端点记录关联的控制器。

pub mod controller;
pub mod pending;
pub mod projection;
pub mod record;
pub mod state;

pub use controller::{LifecycleController, Reply, StatusChanged};
pub use pending::{AlreadyPending, Outcome, PendingRequests, RequestKind};
pub use projection::{StatusLabel, project};
pub use record::EndpointRecord;
pub use state::{ErrorCode, ServiceState};

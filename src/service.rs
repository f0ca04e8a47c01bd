//! Interfaces of the collaborators around the lifecycle core: the service
//! object, its state-change notifications and the object registry.
pub mod backend;
pub mod events;
pub mod identity;
pub mod registry;

pub use backend::ServiceBackend;
pub use events::{StateEvent, StateEventSource};
pub use identity::ServiceId;
pub use registry::{InterfaceRegistry, ObjectRegistry, Registration};

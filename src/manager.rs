//! The async surface: an actor that owns the lifecycle controller, the
//! commands it serves and the handles that send them.
mod actor;
mod command;
pub mod handle;

pub use handle::{PendingReply, ServiceManager, StatusListener};

#![deny(clippy::expect_used, clippy::unwrap_used)]

//! Per-connection lifecycle control for remote service endpoints.
//! 远程服务端点的按连接生命周期控制。

pub mod config;
pub mod error;
pub mod service;

pub mod core;
pub mod manager;

mod testing;

pub use config::Config;
pub use error::{Error, Result};
pub use manager::{PendingReply, ServiceManager, StatusListener};

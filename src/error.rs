//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use crate::core::{pending::RequestKind, state::ErrorCode};
use thiserror::Error;

/// The primary error type for the service lifecycle library.
/// 服务生命周期库的主要错误类型。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A request of the same kind is already outstanding for this endpoint.
    /// The caller should wait for the earlier request to complete.
    ///
    /// 该端点已有同类请求在进行中。调用方应等待先前的请求完成。
    #[error("{0} already in progress")]
    InProgress(RequestKind),

    /// The backend rejected the connect/disconnect attempt synchronously.
    /// 后端同步拒绝了连接/断开尝试。
    #[error("operation failed: {0}")]
    OperationFailed(ErrorCode),

    /// An accepted request completed with a failure.
    /// 已接受的请求以失败告终。
    #[error("request failed: {0}")]
    Failed(ErrorCode),

    /// The endpoint is not available and has no live record.
    /// 端点不可用，且没有存活的记录。
    #[error("service not available")]
    NotAvailable,

    /// The object registry refused to register the endpoint's path.
    /// 对象注册表拒绝注册该端点的路径。
    #[error("unable to register service interface for {0}")]
    Registration(String),

    /// An internal channel for communication between tasks was closed unexpectedly.
    /// 用于任务间通信的内部通道意外关闭。
    #[error("Internal channel is broken")]
    ChannelClosed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::InProgress(_) => ErrorKind::WouldBlock.into(),
            Error::OperationFailed(code) | Error::Failed(code) => {
                std::io::Error::from_raw_os_error(code.raw())
            }
            Error::NotAvailable => ErrorKind::NotFound.into(),
            Error::Registration(path) => std::io::Error::new(ErrorKind::AlreadyExists, path),
            Error::ChannelClosed => ErrorKind::BrokenPipe.into(),
        }
    }
}

//! 挂起请求跟踪器 - 每个端点最多一个挂起的连接请求和一个挂起的断开请求
//! Pending-request tracker - at most one pending Connect and one pending
//! Disconnect per endpoint
//!
//! Requests are owned by the tracker while pending and moved out on
//! resolution, so a slot can never be answered twice.
//!
//! 请求在挂起期间由跟踪器持有，并在解决时被移出，因此一个槽位不可能被应答两次。

use super::state::ErrorCode;
use std::fmt;

/// The kind of a client request.
/// 客户端请求的种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Connect,
    Disconnect,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("connect"),
            Self::Disconnect => f.write_str("disconnect"),
        }
    }
}

/// The asynchronous completion of an accepted request.
/// 已接受请求的异步完成结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(ErrorCode),
}

/// Returned when a request of the same kind is already outstanding. The
/// rejected request is handed back so it is never silently dropped.
///
/// 当同类请求已在进行中时返回。被拒绝的请求会被交还给调用方，绝不会被静默丢弃。
pub struct AlreadyPending<R> {
    pub kind: RequestKind,
    pub request: R,
}

impl<R> AlreadyPending<R> {
    /// Gives back the rejected request.
    /// 交还被拒绝的请求。
    pub fn into_request(self) -> R {
        self.request
    }
}

impl<R> fmt::Debug for AlreadyPending<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlreadyPending")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<R> fmt::Display for AlreadyPending<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} already pending", self.kind)
    }
}

impl<R> std::error::Error for AlreadyPending<R> {}

/// The two request slots of one endpoint.
///
/// 单个端点的两个请求槽位。
#[derive(Debug)]
pub struct PendingRequests<R> {
    connect: Option<R>,
    disconnect: Option<R>,
}

impl<R> Default for PendingRequests<R> {
    fn default() -> Self {
        Self {
            connect: None,
            disconnect: None,
        }
    }
}

impl<R> PendingRequests<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a Connect request, or hands it back if one is already pending.
    /// 存储连接请求；若已有挂起的连接请求则将其交还。
    pub fn accept_connect(&mut self, request: R) -> Result<(), AlreadyPending<R>> {
        Self::accept(&mut self.connect, RequestKind::Connect, request)
    }

    /// Stores a Disconnect request, or hands it back if one is already pending.
    /// 存储断开请求；若已有挂起的断开请求则将其交还。
    pub fn accept_disconnect(&mut self, request: R) -> Result<(), AlreadyPending<R>> {
        Self::accept(&mut self.disconnect, RequestKind::Disconnect, request)
    }

    /// Clears the Connect slot, pairing its request with `outcome`. Returns
    /// `None` when nothing is pending, which is the common case.
    ///
    /// 清空连接槽位，并将其中的请求与 `outcome` 配对返回。无挂起请求时返回 `None`（这是常见情况）。
    pub fn resolve_connect(&mut self, outcome: Outcome) -> Option<(R, Outcome)> {
        self.connect.take().map(|request| (request, outcome))
    }

    /// Clears the Disconnect slot, pairing its request with `outcome`.
    /// 清空断开槽位，并将其中的请求与 `outcome` 配对返回。
    pub fn resolve_disconnect(&mut self, outcome: Outcome) -> Option<(R, Outcome)> {
        self.disconnect.take().map(|request| (request, outcome))
    }

    /// Takes a freshly reserved Connect back out of its slot without
    /// resolving it, for when the backend refuses the operation outright.
    ///
    /// 在后端直接拒绝操作时，将刚预留的连接请求从槽位中取回而不解决它。
    pub fn withdraw_connect(&mut self) -> Option<R> {
        self.connect.take()
    }

    /// Disconnect counterpart of [`withdraw_connect`](Self::withdraw_connect).
    /// [`withdraw_connect`](Self::withdraw_connect) 的断开版本。
    pub fn withdraw_disconnect(&mut self) -> Option<R> {
        self.disconnect.take()
    }

    pub fn has_connect(&self) -> bool {
        self.connect.is_some()
    }

    pub fn has_disconnect(&self) -> bool {
        self.disconnect.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.connect.is_none() && self.disconnect.is_none()
    }

    fn accept(slot: &mut Option<R>, kind: RequestKind, request: R) -> Result<(), AlreadyPending<R>> {
        if slot.is_some() {
            return Err(AlreadyPending { kind, request });
        }
        *slot = Some(request);
        Ok(())
    }
}

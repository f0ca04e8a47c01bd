//! Defines the raw connection state machine of a remote service and the
//! errno-style codes the service reports.
//!
//! 定义远程服务的原始连接状态机以及服务所报告的 errno 风格错误码。

use std::fmt;

/// The raw state of a service, as driven by its owner.
/// 由服务所有者驱动的原始状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceState {
    /// The service object is gone. This is terminal.
    /// 服务对象已消失。这是终止状态。
    Unavailable,
    /// 未连接。
    Disconnected,
    /// 正在连接。
    Connecting,
    /// 已连接。
    Connected,
    /// 正在断开。
    Disconnecting,
}

impl ServiceState {
    /// Returns `true` for the terminal `Unavailable` state.
    /// 对终止的 `Unavailable` 状态返回 `true`。
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// An errno-style failure reason reported by a service.
///
/// 服务报告的 errno 风格失败原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    pub const EIO: Self = Self(5);
    pub const EAGAIN: Self = Self(11);
    pub const EBUSY: Self = Self(16);
    pub const ENODEV: Self = Self(19);
    pub const EINVAL: Self = Self(22);
    pub const ENOTSUP: Self = Self(95);
    pub const ECONNRESET: Self = Self(104);
    pub const ENOTCONN: Self = Self(107);
    pub const ETIMEDOUT: Self = Self(110);
    pub const ECONNREFUSED: Self = Self(111);
    pub const EHOSTDOWN: Self = Self(112);
    pub const EALREADY: Self = Self(114);
    pub const EINPROGRESS: Self = Self(115);

    /// Wraps a raw errno value. Negative values, as returned by kernel-style
    /// APIs, are normalized to their positive form.
    ///
    /// 包装原始 errno 值。内核风格 API 返回的负值会被规范化为正值。
    pub const fn new(raw: i32) -> Self {
        Self(raw.wrapping_abs())
    }

    /// 返回原始 errno 值。
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// The symbolic name of the code, if it is one of the known constants.
    /// 若为已知常量，返回其符号名称。
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::EIO => "EIO",
            Self::EAGAIN => "EAGAIN",
            Self::EBUSY => "EBUSY",
            Self::ENODEV => "ENODEV",
            Self::EINVAL => "EINVAL",
            Self::ENOTSUP => "ENOTSUP",
            Self::ECONNRESET => "ECONNRESET",
            Self::ENOTCONN => "ENOTCONN",
            Self::ETIMEDOUT => "ETIMEDOUT",
            Self::ECONNREFUSED => "ECONNREFUSED",
            Self::EHOSTDOWN => "EHOSTDOWN",
            Self::EALREADY => "EALREADY",
            Self::EINPROGRESS => "EINPROGRESS",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "errno {}", self.0),
        }
    }
}

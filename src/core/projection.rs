//! 状态投影 - 将原始服务状态映射为对外公开的状态标签
//! State projection - maps raw service state to the externally visible status label
//!
//! The projection is a pure function of the raw state plus two auxiliary
//! flags. The reconnecting flag dominates the error flag, and both only
//! matter in the transitional `Disconnected`/`Connecting` states.
//!
//! 投影是原始状态加上两个辅助标志的纯函数。重连标志优先于错误标志，
//! 且二者只在 `Disconnected`/`Connecting` 状态下起作用。

use super::state::{ErrorCode, ServiceState};
use std::fmt;

/// The simplified status label exposed to observers.
/// 向观察者公开的简化状态标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    Unavailable,
    Reconnecting,
    Error,
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl StatusLabel {
    /// The wire string of the label.
    /// 标签的字符串形式。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Reconnecting => "reconnecting",
            Self::Error => "error",
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projects a raw state and its auxiliary flags onto a status label.
///
/// 将原始状态及其辅助标志投影为状态标签。
pub fn project(
    state: ServiceState,
    last_error: Option<ErrorCode>,
    is_reconnecting: bool,
) -> StatusLabel {
    match state {
        ServiceState::Unavailable => StatusLabel::Unavailable,
        ServiceState::Disconnected if is_reconnecting => StatusLabel::Reconnecting,
        ServiceState::Disconnected if last_error.is_some() => StatusLabel::Error,
        ServiceState::Disconnected => StatusLabel::Disconnected,
        ServiceState::Connecting if is_reconnecting => StatusLabel::Reconnecting,
        ServiceState::Connecting => StatusLabel::Connecting,
        ServiceState::Connected => StatusLabel::Connected,
        ServiceState::Disconnecting => StatusLabel::Disconnecting,
    }
}

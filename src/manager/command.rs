//! Commands sent from `ServiceManager` handles to the manager actor.

use super::handle::PendingReply;
use crate::{core::StatusLabel, error::Result, service::ServiceId};
use tokio::sync::oneshot;

/// Commands sent to the `ServiceManagerActor`.
///
/// Every command carries the channel its immediate answer goes back on.
/// The deferred completion of an accepted request travels separately,
/// inside the returned [`PendingReply`].
///
/// 发送到 `ServiceManagerActor` 的命令。
///
/// 每个命令都携带用于返回即时应答的通道。已接受请求的延迟完成结果通过返回的
/// [`PendingReply`] 单独传递。
#[derive(Debug)]
pub(crate) enum ManagerCommand {
    /// 来自公共API的连接请求。
    Connect {
        id: ServiceId,
        response_tx: oneshot::Sender<Result<PendingReply>>,
    },
    /// 来自公共API的断开请求。
    Disconnect {
        id: ServiceId,
        response_tx: oneshot::Sender<Result<PendingReply>>,
    },
    /// Query of the current label of one service.
    /// 查询单个服务的当前标签。
    Status {
        id: ServiceId,
        response_tx: oneshot::Sender<Result<StatusLabel>>,
    },
    /// Listing of every live service.
    /// 列出所有存活的服务。
    Services {
        response_tx: oneshot::Sender<Vec<(ServiceId, StatusLabel)>>,
    },
    /// Tears every record down and stops the actor.
    /// 拆除所有记录并停止 actor。
    Shutdown { response_tx: oneshot::Sender<()> },
}

//! The user-facing API of the service manager.

use super::{actor::ServiceManagerActor, command::ManagerCommand};
use crate::{
    config::Config,
    core::{LifecycleController, Outcome, RequestKind, StatusChanged, StatusLabel},
    error::{Error, Result},
    service::{ObjectRegistry, ServiceBackend, ServiceId, StateEvent, StateEventSource},
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{info, warn};

/// The deferred completion of an accepted Connect or Disconnect.
///
/// 已接受的连接或断开请求的延迟完成结果。
#[derive(Debug)]
pub struct PendingReply {
    kind: RequestKind,
    id: ServiceId,
    rx: oneshot::Receiver<Outcome>,
}

impl PendingReply {
    pub(crate) fn new(kind: RequestKind, id: ServiceId, rx: oneshot::Receiver<Outcome>) -> Self {
        Self { kind, id, rx }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    /// Waits for the request to complete. Fails with
    /// [`Error::ChannelClosed`] if the request was abandoned at shutdown.
    ///
    /// 等待请求完成。若请求在关闭时被放弃，则返回 [`Error::ChannelClosed`]。
    pub async fn outcome(self) -> Result<Outcome> {
        self.rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Like [`outcome`](Self::outcome), with a failure turned into
    /// [`Error::Failed`].
    ///
    /// 与 [`outcome`](Self::outcome) 相同，但将失败转换为 [`Error::Failed`]。
    pub async fn wait(self) -> Result<()> {
        match self.outcome().await? {
            Outcome::Success => Ok(()),
            Outcome::Failure(code) => Err(Error::Failed(code)),
        }
    }

    /// Returns the outcome if it has already arrived.
    /// 若结果已到达则返回该结果。
    pub fn try_outcome(&mut self) -> Option<Outcome> {
        self.rx.try_recv().ok()
    }
}

/// A subscription to `status_changed` notifications.
///
/// `status_changed` 通知的订阅。
#[derive(Debug)]
pub struct StatusListener {
    rx: broadcast::Receiver<StatusChanged>,
}

impl StatusListener {
    /// Waits for the next status change. Notifications lost because the
    /// listener fell behind are skipped with a warning.
    ///
    /// 等待下一次状态变化。因订阅者落后而丢失的通知会被跳过并记录警告。
    pub async fn recv(&mut self) -> Result<StatusChanged> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Ok(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Status listener lagged, notifications dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(Error::ChannelClosed),
            }
        }
    }

    /// Returns the next queued status change without waiting.
    /// 不等待，直接返回下一个已排队的状态变化。
    pub fn try_recv(&mut self) -> Option<StatusChanged> {
        loop {
            match self.rx.try_recv() {
                Ok(change) => return Some(change),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Status listener lagged, notifications dropped");
                }
                Err(_) => return None,
            }
        }
    }
}

/// A handle to the service manager actor.
///
/// 服务管理器 actor 的句柄。
#[derive(Debug, Clone)]
pub struct ServiceManager {
    command_tx: mpsc::Sender<ManagerCommand>,
    status_tx: broadcast::Sender<StatusChanged>,
}

impl ServiceManager {
    /// Spawns the manager actor on the current tokio runtime.
    ///
    /// The returned listener is subscribed before the actor starts, so it
    /// sees every status change.
    ///
    /// 在当前 tokio 运行时上启动管理器 actor。返回的监听器在 actor 启动之前即已订阅，
    /// 因此能看到所有状态变化。
    pub fn spawn<B, G, S>(config: Config, backend: B, registry: G, events: S) -> (Self, StatusListener)
    where
        B: ServiceBackend,
        G: ObjectRegistry,
        S: StateEventSource,
    {
        let config = Arc::new(config);
        let (command_tx, command_rx) = mpsc::channel(config.channels.command_capacity);
        let (status_tx, status_rx) = broadcast::channel(config.channels.status_capacity);

        let controller = LifecycleController::new(config, backend, registry, status_tx.clone());
        let mut actor = ServiceManagerActor {
            controller,
            command_rx,
            events,
        };

        tokio::spawn(async move {
            actor.run().await;
        });
        info!("Service manager actor created and running");

        let handle = Self {
            command_tx,
            status_tx,
        };
        (handle, StatusListener { rx: status_rx })
    }

    /// Creates a bounded channel for feeding state events into
    /// [`spawn`](Self::spawn).
    ///
    /// 创建一个有界通道，用于向 [`spawn`](Self::spawn) 输入状态事件。
    pub fn event_channel(config: &Config) -> (mpsc::Sender<StateEvent>, mpsc::Receiver<StateEvent>) {
        mpsc::channel(config.channels.event_capacity)
    }

    /// Requests a connect. `Ok` means the request was accepted and its
    /// completion will arrive through the returned [`PendingReply`].
    ///
    /// 请求连接。返回 `Ok` 表示请求已被接受，其完成结果将通过返回的 [`PendingReply`] 到达。
    pub async fn connect(&self, id: &ServiceId) -> Result<PendingReply> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ManagerCommand::Connect {
            id: id.clone(),
            response_tx,
        })
        .await?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Requests a disconnect.
    /// 请求断开。
    pub async fn disconnect(&self, id: &ServiceId) -> Result<PendingReply> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ManagerCommand::Disconnect {
            id: id.clone(),
            response_tx,
        })
        .await?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// The current status label of a service.
    /// 服务的当前状态标签。
    pub async fn status(&self, id: &ServiceId) -> Result<StatusLabel> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ManagerCommand::Status {
            id: id.clone(),
            response_tx,
        })
        .await?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Every live service with its status label.
    /// 所有存活的服务及其状态标签。
    pub async fn services(&self) -> Result<Vec<(ServiceId, StatusLabel)>> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ManagerCommand::Services { response_tx }).await?;
        response_rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// A new subscription to status changes from now on.
    /// 从现在开始的状态变化新订阅。
    pub fn subscribe(&self) -> StatusListener {
        StatusListener {
            rx: self.status_tx.subscribe(),
        }
    }

    /// Destroys every record, abandoning in-flight requests, and stops the
    /// actor. Later calls on any handle fail with [`Error::ChannelClosed`].
    ///
    /// 销毁所有记录（放弃进行中的请求）并停止 actor。之后在任何句柄上的调用都会返回
    /// [`Error::ChannelClosed`]。
    pub async fn shutdown(&self) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(ManagerCommand::Shutdown { response_tx }).await?;
        response_rx.await.map_err(|_| Error::ChannelClosed)
    }

    async fn send(&self, command: ManagerCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| Error::ChannelClosed)
    }
}

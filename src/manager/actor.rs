//! The actor that owns the lifecycle controller.
//!
//! 拥有生命周期控制器的 actor。

use super::{command::ManagerCommand, handle::PendingReply};
use crate::{
    core::{LifecycleController, Outcome, RequestKind},
    service::{ObjectRegistry, ServiceBackend, StateEventSource},
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

pub(crate) type ActorController<B, G> = LifecycleController<B, G, oneshot::Sender<Outcome>>;

/// The actor that serializes every operation on the endpoint records.
///
/// This actor runs in a dedicated task and processes commands from the public
/// `ServiceManager` handles and state events from the service owner. Running
/// everything on one task is what keeps each record single-writer.
///
/// 串行化端点记录上所有操作的 actor。
///
/// 此actor在专用任务中运行，处理来自公共 `ServiceManager` 句柄的命令以及来自服务所有者的状态事件。
/// 所有操作在同一任务上执行，从而保证每条记录只有一个写者。
pub(crate) struct ServiceManagerActor<B, G, S> {
    pub(crate) controller: ActorController<B, G>,
    pub(crate) command_rx: mpsc::Receiver<ManagerCommand>,
    pub(crate) events: S,
}

impl<B, G, S> ServiceManagerActor<B, G, S>
where
    B: ServiceBackend,
    G: ObjectRegistry,
    S: StateEventSource,
{
    /// Runs the actor's main event loop.
    ///
    /// 运行 actor 的主事件循环。
    pub(crate) async fn run(&mut self) {
        let mut events_open = true;

        loop {
            tokio::select! {
                // 1. Handle incoming actor commands.
                // 1. 处理传入的 actor 命令。
                command = self.command_rx.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command) {
                            break;
                        }
                    }
                    None => {
                        // Every handle is gone. 所有句柄都已释放。
                        self.controller.shutdown();
                        break;
                    }
                },
                // 2. Handle state events from the service owner.
                // 2. 处理来自服务所有者的状态事件。
                event = self.events.next_event(), if events_open => match event {
                    Some(event) => self.controller.handle_state_change(event),
                    None => {
                        info!("State event source closed, serving requests only");
                        events_open = false;
                    }
                },
            }
        }

        info!("Service manager actor stopped");
    }

    /// Handles a command sent to the actor. Returns `false` once the actor
    /// should stop.
    ///
    /// 处理发送给 actor 的命令。当 actor 应当停止时返回 `false`。
    fn handle_command(&mut self, command: ManagerCommand) -> bool {
        match command {
            ManagerCommand::Connect { id, response_tx } => {
                let (reply_tx, reply_rx) = oneshot::channel();
                let result = self
                    .controller
                    .handle_connect_request(&id, reply_tx)
                    .map(|()| PendingReply::new(RequestKind::Connect, id, reply_rx));
                let _ = response_tx.send(result);
            }
            ManagerCommand::Disconnect { id, response_tx } => {
                let (reply_tx, reply_rx) = oneshot::channel();
                let result = self
                    .controller
                    .handle_disconnect_request(&id, reply_tx)
                    .map(|()| PendingReply::new(RequestKind::Disconnect, id, reply_rx));
                let _ = response_tx.send(result);
            }
            ManagerCommand::Status { id, response_tx } => {
                let _ = response_tx.send(self.controller.current_status(&id));
            }
            ManagerCommand::Services { response_tx } => {
                let _ = response_tx.send(self.controller.services());
            }
            ManagerCommand::Shutdown { response_tx } => {
                debug!("Shutdown requested");
                self.controller.shutdown();
                let _ = response_tx.send(());
                return false;
            }
        }
        true
    }
}

//! Async session service
//!
//! One actor task owns the [`SessionOrchestrator`] and applies requests in
//! arrival order, which keeps the registry and bus single-writer. Boot timers
//! are spawned sleeps that hand their ticket back to the actor; a ticket
//! invalidated by a stop or restart in the meantime is ignored there.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::bus::McpMessage;
use crate::container::Container;
use crate::error::{DockError, Result};
use crate::session::{BootTicket, SessionOrchestrator, Snapshot, Submission};

const REQUEST_BUFFER: usize = 64;

type Reply<T> = oneshot::Sender<Result<T>>;

enum Request {
    Start { id: String, reply: Reply<Snapshot> },
    Stop { id: String, reply: Reply<Snapshot> },
    SetInput { id: String, text: String, reply: Reply<Snapshot> },
    Submit { id: String, reply: Reply<Submission> },
    Snapshot { reply: Reply<Snapshot> },
    BootElapsed { ticket: BootTicket },
}

/// Cloneable handle to a running session service
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
}

/// Spawn the actor on the current tokio runtime
pub fn spawn(orchestrator: SessionOrchestrator) -> SessionHandle {
    let (tx, rx) = mpsc::channel(REQUEST_BUFFER);
    let timers = tx.downgrade();
    tokio::spawn(run(orchestrator, rx, timers));
    SessionHandle { tx }
}

async fn run(
    mut orchestrator: SessionOrchestrator,
    mut rx: mpsc::Receiver<Request>,
    timers: mpsc::WeakSender<Request>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            Request::Start { id, reply } => {
                let result = orchestrator.request_start(&id);
                if result.is_ok() {
                    if let Some(ticket) = orchestrator.pending_boot(&id) {
                        schedule_boot(&timers, ticket, orchestrator.boot_delay());
                    }
                }
                let _ = reply.send(result);
            }
            Request::Stop { id, reply } => {
                let _ = reply.send(orchestrator.request_stop(&id));
            }
            Request::SetInput { id, text, reply } => {
                let _ = reply.send(orchestrator.set_input(&id, &text));
            }
            Request::Submit { id, reply } => {
                let _ = reply.send(orchestrator.submit(&id));
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(Ok(orchestrator.snapshot()));
            }
            Request::BootElapsed { ticket } => {
                if let Err(e) = orchestrator.complete_boot(&ticket) {
                    warn!(container = %ticket.container_id, error = %e, "boot completion failed");
                }
            }
        }
    }
    debug!("session service stopped");
}

fn schedule_boot(timers: &mpsc::WeakSender<Request>, ticket: BootTicket, delay: std::time::Duration) {
    let timers = timers.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        // every handle may be gone by now
        if let Some(tx) = timers.upgrade() {
            let _ = tx.send(Request::BootElapsed { ticket }).await;
        }
    });
}

impl SessionHandle {
    pub async fn start_container(&self, id: &str) -> Result<Snapshot> {
        self.call(|reply| Request::Start { id: id.to_string(), reply })
            .await
    }

    pub async fn stop_container(&self, id: &str) -> Result<Snapshot> {
        self.call(|reply| Request::Stop { id: id.to_string(), reply })
            .await
    }

    pub async fn set_terminal_input(&self, id: &str, text: &str) -> Result<Snapshot> {
        self.call(|reply| Request::SetInput {
            id: id.to_string(),
            text: text.to_string(),
            reply,
        })
        .await
    }

    pub async fn submit_terminal_input(&self, id: &str) -> Result<Submission> {
        self.call(|reply| Request::Submit { id: id.to_string(), reply })
            .await
    }

    /// Input and submit in one go
    pub async fn execute(&self, id: &str, command: &str) -> Result<Submission> {
        self.set_terminal_input(id, command).await?;
        self.submit_terminal_input(id).await
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.call(|reply| Request::Snapshot { reply }).await
    }

    pub async fn list_containers(&self) -> Result<Vec<Container>> {
        Ok(self.snapshot().await?.containers)
    }

    pub async fn list_messages(&self) -> Result<Vec<McpMessage>> {
        Ok(self.snapshot().await?.messages)
    }

    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> Request) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| DockError::ServiceUnavailable("session actor has shut down".to_string()))?;
        response
            .await
            .map_err(|_| DockError::ServiceUnavailable("session actor dropped the request".to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::DockConfig;
    use crate::container::ContainerStatus;
    use std::sync::Arc;
    use std::time::Duration;

    fn handle(boot_delay_ms: u64) -> SessionHandle {
        let config = DockConfig {
            boot_delay_ms,
            ..DockConfig::default()
        };
        let orchestrator = SessionOrchestrator::from_config(&config, Arc::new(SystemClock)).unwrap();
        spawn(orchestrator)
    }

    async fn status(handle: &SessionHandle, id: &str) -> ContainerStatus {
        handle.snapshot().await.unwrap().container(id).unwrap().status()
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_asynchronous() {
        let handle = handle(2000);
        let snapshot = handle.start_container("container-1").await.unwrap();
        assert_eq!(snapshot.container("container-1").unwrap().status(), ContainerStatus::Starting);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(status(&handle, "container-1").await, ContainerStatus::Starting);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(status(&handle, "container-1").await, ContainerStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_boot_wins() {
        let handle = handle(2000);
        handle.start_container("container-1").await.unwrap();
        handle.stop_container("container-1").await.unwrap();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(status(&handle, "container-1").await, ContainerStatus::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_publishes_to_peer() {
        let handle = handle(2000);
        handle.start_container("container-1").await.unwrap();
        handle.start_container("container-2").await.unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;

        handle.execute("container-2", "ai generate api client").await.unwrap();
        let messages = handle.list_messages().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].from, "container-2");
        assert_eq!(messages[0].to, "container-1");
    }

    #[tokio::test]
    async fn test_errors_cross_the_channel() {
        let handle = handle(10);
        assert!(matches!(
            handle.execute("container-1", "ls").await,
            Err(DockError::NotRunning(_))
        ));
        assert!(matches!(
            handle.start_container("ghost").await,
            Err(DockError::NotFound(_))
        ));
        assert_eq!(handle.list_containers().await.unwrap().len(), 2);
    }
}

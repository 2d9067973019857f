//! Session orchestrator

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::scheduler::{BootScheduler, BootTicket};
use crate::bus::{McpMessage, MessageBus, MessageDraft, MessageId, MessageKind};
use crate::clock::{log_stamp, Clock};
use crate::config::DockConfig;
use crate::container::{Container, ContainerRegistry};
use crate::error::{DockError, Result};
use crate::interpreter::{interpret, Interpretation};

/// Point-in-time copy of every container and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub containers: Vec<Container>,
    pub messages: Vec<McpMessage>,
}

impl Snapshot {
    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id() == id)
    }
}

/// What a submit did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Pending input was blank
    Ignored,
    /// `clear` reset the log
    Cleared,
    Executed {
        command: String,
        response: String,
        message: Option<MessageId>,
    },
}

/// Result of [`SessionOrchestrator::submit`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub outcome: SubmitOutcome,
    pub snapshot: Snapshot,
}

/// Coordinates lifecycle requests, terminal commands and the message bus
pub struct SessionOrchestrator {
    registry: ContainerRegistry,
    bus: MessageBus,
    boots: BootScheduler,
    clock: Arc<dyn Clock>,
    boot_delay: Duration,
}

impl SessionOrchestrator {
    pub fn new(registry: ContainerRegistry, clock: Arc<dyn Clock>, boot_delay: Duration) -> Self {
        Self {
            registry,
            bus: MessageBus::new(),
            boots: BootScheduler::new(),
            clock,
            boot_delay,
        }
    }

    /// Orchestrator over the configured roster
    pub fn from_config(config: &DockConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.build_registry()?, clock, config.boot_delay()))
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn boot_delay(&self) -> Duration {
        self.boot_delay
    }

    /// Begin booting a stopped container. Completion happens later, when the
    /// boot ticket is redeemed.
    pub fn request_start(&mut self, id: &str) -> Result<Snapshot> {
        self.registry.start(id)?;
        let due = self.due_after(self.boot_delay);
        let ticket = self.boots.schedule(id, due);
        info!(container = id, ticket = ticket.seq, "container boot scheduled");
        Ok(self.snapshot())
    }

    /// Stop a running or starting container, cancelling any pending boot
    pub fn request_stop(&mut self, id: &str) -> Result<Snapshot> {
        self.registry.stop(id, self.clock.now())?;
        if let Some(ticket) = self.boots.cancel(id) {
            info!(container = id, ticket = ticket.seq, "pending boot cancelled");
        }
        info!(container = id, "container stopped");
        Ok(self.snapshot())
    }

    /// The live boot ticket for `id`, if it is starting
    pub fn pending_boot(&self, id: &str) -> Option<BootTicket> {
        self.boots.pending(id).cloned()
    }

    /// Fire one boot timer. Stale tickets and containers that are no longer
    /// starting are left alone; returns whether the container came up.
    pub fn complete_boot(&mut self, ticket: &BootTicket) -> Result<bool> {
        if !self.boots.redeem(ticket) {
            debug!(container = %ticket.container_id, ticket = ticket.seq, "stale boot ticket ignored");
            return Ok(false);
        }
        self.finish_startup(&ticket.container_id)
    }

    /// Fire every boot timer that is due; returns the ids that came up
    pub fn run_due_boots(&mut self) -> Result<Vec<String>> {
        let mut booted = Vec::new();
        for ticket in self.boots.take_due(self.clock.now()) {
            if self.finish_startup(&ticket.container_id)? {
                booted.push(ticket.container_id);
            }
        }
        Ok(booted)
    }

    fn finish_startup(&mut self, id: &str) -> Result<bool> {
        let booted = self.registry.complete_startup(id, self.clock.now())?;
        if booted {
            info!(container = id, "container running");
        }
        Ok(booted)
    }

    /// Replace the pending input of a running container
    pub fn set_input(&mut self, id: &str, text: &str) -> Result<Snapshot> {
        self.require_running(id)?;
        self.registry.set_input(id, text)?;
        Ok(self.snapshot())
    }

    /// Run the pending input of a running container through the interpreter
    /// and apply the result
    pub fn submit(&mut self, id: &str) -> Result<Submission> {
        let container = self.require_running(id)?;
        let command = container.pending_input().trim().to_string();
        if command.is_empty() {
            return Ok(self.submission(SubmitOutcome::Ignored));
        }

        let peer = self.registry.first_running_except(id);
        let outcome = match interpret(container, &command, peer) {
            Interpretation::Clear => {
                self.registry.clear_log(id)?;
                self.registry.set_input(id, "")?;
                debug!(container = id, "session log cleared");
                SubmitOutcome::Cleared
            }
            Interpretation::Reply { response, draft } => {
                let now = self.clock.now();
                let prompt = container.prompt();
                let lines = vec![
                    format!("{}{}", prompt, command),
                    format!("{} {}", log_stamp(now), response),
                    prompt,
                ];
                self.registry.append_log(id, lines)?;
                self.registry.set_input(id, "")?;

                let message = draft.map(|d| self.bus.publish(d, now).id);
                debug!(container = id, command = %command, "command executed");
                SubmitOutcome::Executed {
                    command,
                    response,
                    message,
                }
            }
        };

        Ok(self.submission(outcome))
    }

    /// `set_input` followed by `submit`
    pub fn execute(&mut self, id: &str, command: &str) -> Result<Submission> {
        self.set_input(id, command)?;
        self.submit(id)
    }

    /// Publish a message directly between two known containers
    pub fn send_message(
        &mut self,
        from: &str,
        to: &str,
        kind: MessageKind,
        content: &str,
    ) -> Result<McpMessage> {
        self.registry.get(from)?;
        self.registry.get(to)?;
        let draft = MessageDraft::new(from, to, kind, content);
        Ok(self.bus.publish(draft, self.clock.now()).clone())
    }

    /// Every container, in registry order
    pub fn containers(&self) -> Vec<Container> {
        self.registry.iter().cloned().collect()
    }

    /// Every message, in publication order
    pub fn messages(&self) -> Vec<McpMessage> {
        self.bus.list().to_vec()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            containers: self.containers(),
            messages: self.messages(),
        }
    }

    fn submission(&self, outcome: SubmitOutcome) -> Submission {
        Submission {
            outcome,
            snapshot: self.snapshot(),
        }
    }

    fn require_running(&self, id: &str) -> Result<&Container> {
        let container = self.registry.get(id)?;
        if !container.is_running() {
            debug!(container = id, status = %container.status(), "input rejected");
            return Err(DockError::NotRunning(id.to_string()));
        }
        Ok(container)
    }

    fn due_after(&self, delay: Duration) -> DateTime<Utc> {
        let now = self.clock.now();
        chrono::Duration::from_std(delay)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

//! Container registry owning every container and its lifecycle
//!
//! The registry keeps containers in insertion order. That order is the
//! iteration order everywhere else, including peer selection when an agent
//! shares context with another running container.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::types::{Container, ContainerStatus};
use crate::clock::log_stamp;
use crate::error::{DockError, Result};

/// Second boot trace line
pub const BOOT_OS_LINE: &str = "Ubuntu 22.04 LTS initialized";

/// Fourth boot trace line
pub const MCP_ENABLED_LINE: &str = "MCP Protocol enabled";

/// Owns the set of containers and enforces lifecycle transitions
#[derive(Debug, Default, Clone)]
pub struct ContainerRegistry {
    containers: Vec<Container>,
}

impl ContainerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container; ids must be unique
    pub fn insert(&mut self, container: Container) -> Result<&Container> {
        if self.exists(container.id()) {
            return Err(DockError::AlreadyExists(container.id().to_string()));
        }
        self.containers.push(container);
        let index = self.containers.len() - 1;
        Ok(&self.containers[index])
    }

    /// Get a container by id
    pub fn get(&self, id: &str) -> Result<&Container> {
        self.containers
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| DockError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Container> {
        self.containers
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| DockError::NotFound(id.to_string()))
    }

    /// Check if a container exists
    pub fn exists(&self, id: &str) -> bool {
        self.containers.iter().any(|c| c.id() == id)
    }

    /// Containers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    /// Get the number of containers
    pub fn count(&self) -> usize {
        self.containers.len()
    }

    /// First running container other than `id`, in insertion order
    pub fn first_running_except(&self, id: &str) -> Option<&Container> {
        self.containers
            .iter()
            .find(|c| c.id() != id && c.is_running())
    }

    /// `Stopped -> Starting`
    pub fn start(&mut self, id: &str) -> Result<()> {
        let container = self.get_mut(id)?;
        match container.status() {
            ContainerStatus::Stopped => {
                container.set_status(ContainerStatus::Starting);
                debug!(container = id, "container starting");
                Ok(())
            }
            status => Err(DockError::InvalidTransition {
                id: id.to_string(),
                action: "start",
                status,
            }),
        }
    }

    /// `Running -> Stopped`, or `Starting -> Stopped` which abandons the boot.
    /// Appends the stop line and drops any pending input.
    pub fn stop(&mut self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let container = self.get_mut(id)?;
        if container.status() == ContainerStatus::Stopped {
            return Err(DockError::InvalidTransition {
                id: id.to_string(),
                action: "stop",
                status: ContainerStatus::Stopped,
            });
        }

        container.set_status(ContainerStatus::Stopped);
        let terminal = container.terminal_mut();
        terminal.output.push(format!("{} Container stopped", log_stamp(at)));
        terminal.input.clear();
        debug!(container = id, "container stopped");
        Ok(())
    }

    /// `Starting -> Running` with the boot trace appended.
    ///
    /// Returns `false` without touching anything when the container is no
    /// longer starting, e.g. it was stopped while the boot timer was pending.
    pub fn complete_startup(&mut self, id: &str, at: DateTime<Utc>) -> Result<bool> {
        let container = self.get_mut(id)?;
        if container.status() != ContainerStatus::Starting {
            return Ok(false);
        }

        let stamp = log_stamp(at);
        let agent = container
            .agent()
            .map(|a| a.label())
            .unwrap_or("No");
        let lines = [
            format!("{} Container {} started", stamp, container.name()),
            format!("{} {}", stamp, BOOT_OS_LINE),
            format!("{} {} AI Agent loaded", stamp, agent),
            format!("{} {}", stamp, MCP_ENABLED_LINE),
            container.prompt(),
        ];

        container.set_status(ContainerStatus::Running);
        container.terminal_mut().output.extend(lines);
        Ok(true)
    }

    /// Append lines to the session log
    pub fn append_log<I>(&mut self, id: &str, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let container = self.get_mut(id)?;
        container.terminal_mut().output.extend(lines);
        Ok(())
    }

    /// Replace the pending input buffer
    pub fn set_input(&mut self, id: &str, text: &str) -> Result<()> {
        let container = self.get_mut(id)?;
        container.terminal_mut().input = text.to_string();
        Ok(())
    }

    /// Reset the log to a single fresh prompt; running containers only.
    /// Pending input is left alone.
    pub fn clear_log(&mut self, id: &str) -> Result<()> {
        let container = self.get_mut(id)?;
        if !container.is_running() {
            return Err(DockError::NotRunning(id.to_string()));
        }
        let prompt = container.prompt();
        container.terminal_mut().output = vec![prompt];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{AgentKind, Resources};

    fn registry() -> ContainerRegistry {
        let mut registry = ContainerRegistry::new();
        registry
            .insert(Container::new("container-1", "Claude Terminal", Some(AgentKind::Claude), Resources::default()))
            .unwrap();
        registry
            .insert(Container::new("container-2", "Gemini Terminal", Some(AgentKind::Gemini), Resources::default()))
            .unwrap();
        registry
    }

    fn status(registry: &ContainerRegistry, id: &str) -> ContainerStatus {
        registry.get(id).unwrap().status()
    }

    #[test]
    fn test_registry_insert_duplicate() {
        let mut registry = registry();
        let result = registry.insert(Container::new("container-1", "dup", None, Resources::default()));
        assert!(matches!(result, Err(DockError::AlreadyExists(_))));
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_get_unknown() {
        let registry = registry();
        assert!(matches!(registry.get("nope"), Err(DockError::NotFound(_))));
    }

    #[test]
    fn test_start_then_complete() {
        let mut registry = registry();
        registry.start("container-1").unwrap();
        assert_eq!(status(&registry, "container-1"), ContainerStatus::Starting);

        assert!(registry.complete_startup("container-1", Utc::now()).unwrap());
        let container = registry.get("container-1").unwrap();
        assert_eq!(container.status(), ContainerStatus::Running);
        assert_eq!(container.log().len(), 5);
        assert!(container.log()[0].ends_with("Container Claude Terminal started"));
        assert!(container.log()[2].ends_with("CLAUDE AI Agent loaded"));
        assert_eq!(container.log()[4], "root@tainer-1:~# ");
    }

    #[test]
    fn test_start_rejected_while_starting_or_running() {
        let mut registry = registry();
        registry.start("container-1").unwrap();
        let err = registry.start("container-1").unwrap_err();
        assert!(matches!(
            err,
            DockError::InvalidTransition { status: ContainerStatus::Starting, .. }
        ));
        assert_eq!(status(&registry, "container-1"), ContainerStatus::Starting);

        registry.complete_startup("container-1", Utc::now()).unwrap();
        let before = registry.get("container-1").unwrap().clone();
        assert!(registry.start("container-1").is_err());
        assert_eq!(registry.get("container-1").unwrap(), &before);
    }

    #[test]
    fn test_stop_stopped_is_error() {
        let mut registry = registry();
        let err = registry.stop("container-1", Utc::now()).unwrap_err();
        assert!(matches!(err, DockError::InvalidTransition { action: "stop", .. }));
        assert!(registry.get("container-1").unwrap().log().is_empty());
    }

    #[test]
    fn test_stop_running_appends_line_and_clears_input() {
        let mut registry = registry();
        registry.start("container-1").unwrap();
        registry.complete_startup("container-1", Utc::now()).unwrap();
        registry.set_input("container-1", "ls").unwrap();

        registry.stop("container-1", Utc::now()).unwrap();
        let container = registry.get("container-1").unwrap();
        assert_eq!(container.status(), ContainerStatus::Stopped);
        assert_eq!(container.log().len(), 6);
        assert!(container.log()[5].ends_with("Container stopped"));
        assert!(container.pending_input().is_empty());
    }

    #[test]
    fn test_complete_after_stop_is_noop() {
        let mut registry = registry();
        registry.start("container-1").unwrap();
        registry.stop("container-1", Utc::now()).unwrap();

        assert!(!registry.complete_startup("container-1", Utc::now()).unwrap());
        let container = registry.get("container-1").unwrap();
        assert_eq!(container.status(), ContainerStatus::Stopped);
        assert_eq!(container.log().len(), 1);
    }

    #[test]
    fn test_clear_requires_running() {
        let mut registry = registry();
        assert!(matches!(registry.clear_log("container-1"), Err(DockError::NotRunning(_))));

        registry.start("container-1").unwrap();
        registry.complete_startup("container-1", Utc::now()).unwrap();
        registry
            .append_log("container-1", vec!["a".to_string(), "b".to_string()])
            .unwrap();
        registry.clear_log("container-1").unwrap();

        let container = registry.get("container-1").unwrap();
        assert_eq!(container.log(), &["root@tainer-1:~# ".to_string()]);
        assert_eq!(container.status(), ContainerStatus::Running);
    }

    #[test]
    fn test_clear_keeps_pending_input() {
        let mut registry = registry();
        registry.start("container-1").unwrap();
        registry.complete_startup("container-1", Utc::now()).unwrap();
        registry.set_input("container-1", "ls -la").unwrap();

        registry.clear_log("container-1").unwrap();

        let container = registry.get("container-1").unwrap();
        assert_eq!(container.pending_input(), "ls -la");
        assert_eq!(container.log().len(), 1);
    }

    #[test]
    fn test_first_running_except_uses_insertion_order() {
        let mut registry = registry();
        registry
            .insert(Container::new("container-3", "Spare", None, Resources::default()))
            .unwrap();
        for id in ["container-1", "container-2", "container-3"] {
            registry.start(id).unwrap();
            registry.complete_startup(id, Utc::now()).unwrap();
        }

        assert_eq!(registry.first_running_except("container-1").unwrap().id(), "container-2");
        assert_eq!(registry.first_running_except("container-2").unwrap().id(), "container-1");

        registry.stop("container-1", Utc::now()).unwrap();
        assert_eq!(registry.first_running_except("container-2").unwrap().id(), "container-3");
    }
}

//! Container record definitions
//!
//! A Container is a logical execution environment with its own lifecycle,
//! optional agent binding and terminal session.

use std::fmt;

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Stopped,
    Starting,
    Running,
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerStatus::Stopped => write!(f, "stopped"),
            ContainerStatus::Starting => write!(f, "starting"),
            ContainerStatus::Running => write!(f, "running"),
        }
    }
}

impl std::str::FromStr for ContainerStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stopped" => Ok(ContainerStatus::Stopped),
            "starting" => Ok(ContainerStatus::Starting),
            "running" => Ok(ContainerStatus::Running),
            other => Err(format!("unknown container status '{}'", other)),
        }
    }
}

/// AI agent variant bound to a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Claude,
    Gemini,
}

impl AgentKind {
    /// Upper-case label used in terminal responses ("CLAUDE AI: ...")
    pub fn label(&self) -> &'static str {
        match self {
            AgentKind::Claude => "CLAUDE",
            AgentKind::Gemini => "GEMINI",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Informational resource quotas; nothing enforces them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub cpu_cores: u32,
    pub memory_bytes: u64,
    pub storage_bytes: u64,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            cpu_cores: 2,
            memory_bytes: ByteSize::gb(4).as_u64(),
            storage_bytes: ByteSize::gb(20).as_u64(),
        }
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cores | {} | {}",
            self.cpu_cores,
            ByteSize(self.memory_bytes),
            ByteSize(self.storage_bytes)
        )
    }
}

/// Terminal session state: the output log and the pending input buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub output: Vec<String>,
    pub input: String,
}

/// A container and its terminal session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    id: String,
    name: String,
    status: ContainerStatus,
    agent: Option<AgentKind>,
    resources: Resources,
    terminal: Terminal,
}

impl Container {
    /// Create a stopped container with an empty terminal
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        agent: Option<AgentKind>,
        resources: Resources,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ContainerStatus::Stopped,
            agent,
            resources,
            terminal: Terminal::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ContainerStatus {
        self.status
    }

    pub fn agent(&self) -> Option<AgentKind> {
        self.agent
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Session log lines, oldest first
    pub fn log(&self) -> &[String] {
        &self.terminal.output
    }

    /// Input typed but not yet submitted
    pub fn pending_input(&self) -> &str {
        &self.terminal.input
    }

    pub fn is_running(&self) -> bool {
        self.status == ContainerStatus::Running
    }

    /// Shell prompt marker, keyed on the last eight characters of the id
    pub fn prompt(&self) -> String {
        let skip = self.id.chars().count().saturating_sub(8);
        let suffix: String = self.id.chars().skip(skip).collect();
        format!("root@{}:~# ", suffix)
    }

    pub(super) fn set_status(&mut self, status: ContainerStatus) {
        self.status = status;
    }

    pub(super) fn terminal_mut(&mut self) -> &mut Terminal {
        &mut self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_new() {
        let container = Container::new("container-1", "Claude Terminal", Some(AgentKind::Claude), Resources::default());
        assert_eq!(container.id(), "container-1");
        assert_eq!(container.status(), ContainerStatus::Stopped);
        assert!(container.log().is_empty());
        assert!(container.pending_input().is_empty());
    }

    #[test]
    fn test_prompt_uses_id_suffix() {
        let container = Container::new("container-1", "c", None, Resources::default());
        assert_eq!(container.prompt(), "root@tainer-1:~# ");

        let short = Container::new("ab", "c", None, Resources::default());
        assert_eq!(short.prompt(), "root@ab:~# ");
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Running".parse::<ContainerStatus>(), Ok(ContainerStatus::Running));
        assert!("paused".parse::<ContainerStatus>().is_err());
        assert_eq!(ContainerStatus::Starting.to_string(), "starting");
    }

    #[test]
    fn test_resources_display() {
        let text = Resources::default().to_string();
        assert!(text.starts_with("2 cores"));
        assert!(text.contains("GB"));
    }
}

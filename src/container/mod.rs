//! Container module for agent-bound execution environments
//!
//! Containers carry their own:
//! - Lifecycle status (stopped, starting, running)
//! - Terminal session (output log and pending input)
//! - Optional AI agent binding and informational resource quotas

mod registry;
mod types;

pub use registry::{ContainerRegistry, BOOT_OS_LINE, MCP_ENABLED_LINE};
pub use types::{AgentKind, Container, ContainerStatus, Resources, Terminal};

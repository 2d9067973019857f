//! Agentdock - orchestration core for agent-bound containers
//!
//! Agentdock models a set of containers, each optionally bound to an AI
//! agent, with a terminal session per container and a shared MCP message bus.
//! It simulates lifecycles and terminal responses only; no processes are
//! spawned and no model is called.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use agentdock::{DockConfig, ManualClock, SessionOrchestrator};
//!
//! let clock = Arc::new(ManualClock::default());
//! let mut session = SessionOrchestrator::from_config(&DockConfig::default(), clock.clone()).unwrap();
//!
//! session.request_start("container-1").unwrap();
//! session.request_start("container-2").unwrap();
//! clock.advance(chrono::Duration::seconds(2)).unwrap();
//! session.run_due_boots().unwrap();
//!
//! session.execute("container-1", "ai generate sort function").unwrap();
//! assert_eq!(session.messages().len(), 1);
//! ```

pub mod bus;
pub mod cli;
pub mod clock;
pub mod config;
pub mod container;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod output;
pub mod repl;
pub mod script;
pub mod session;

#[cfg(feature = "runtime")]
pub mod service;

pub use bus::{McpMessage, MessageBus, MessageDraft, MessageId, MessageKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::DockConfig;
pub use container::{AgentKind, Container, ContainerRegistry, ContainerStatus, Resources};
pub use error::{DockError, Result};
pub use interpreter::{explain, interpret, Interpretation};
pub use output::{format_output, OutputFormat, View};
pub use script::{parse_script, ScriptResult, ScriptRunner};
pub use session::{BootTicket, SessionOrchestrator, Snapshot, SubmitOutcome, Submission};

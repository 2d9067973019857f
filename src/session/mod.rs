//! Session orchestration
//!
//! The orchestrator is the single entry point for lifecycle requests and
//! terminal input. It owns the container registry, the message bus and the
//! boot timers, and serializes every mutation through `&mut self`.

mod orchestrator;
mod scheduler;

pub use orchestrator::{SessionOrchestrator, Snapshot, SubmitOutcome, Submission};
pub use scheduler::{BootScheduler, BootTicket};

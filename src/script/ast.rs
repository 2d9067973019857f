//! Session script statements

use serde::{Deserialize, Serialize};

use crate::bus::MessageKind;
use crate::container::ContainerStatus;

/// One line of a session script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Start(String),
    Stop(String),
    Input { id: String, text: String },
    Submit(String),
    /// Input followed by submit
    Exec { id: String, command: String },
    Send {
        from: String,
        to: String,
        kind: MessageKind,
        content: String,
    },
    /// Advance the clock; `None` means one boot delay
    Wait(Option<u64>),
    Show(ShowTarget),
    ExpectStatus { id: String, status: ContainerStatus },
    ExpectMessages(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowTarget {
    Containers,
    Messages,
    Log(String),
}

/// A parsed session script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub statements: Vec<Statement>,
}

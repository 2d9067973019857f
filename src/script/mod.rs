//! Session scripts (`.dock` files)
//!
//! Scripts drive an orchestrator over a manual clock, so `wait` moves time
//! forward deterministically and boot timers fire exactly when expected.

mod ast;
mod grammar;
mod runner;

pub use ast::{Script, ShowTarget, Statement};
pub use grammar::{parse_script, parse_statement_line};
pub use runner::{ScriptResult, ScriptRunner, SCRIPT_EXTENSION};

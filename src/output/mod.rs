//! Output formatting

mod human;
mod json;

use crate::bus::McpMessage;
use crate::container::Container;
use crate::interpreter::Rule;
use crate::session::SubmitOutcome;

pub use human::format_human;
pub use json::format_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Something the CLI, scripts or the REPL want to show
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    Containers(&'a [Container]),
    Messages(&'a [McpMessage]),
    Log(&'a Container),
    Outcome(&'a SubmitOutcome),
    Rule { command: &'a str, rule: &'a Rule },
    Note(&'a str),
}

pub fn format_output(view: &View, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(view),
        OutputFormat::Json => format_json(view),
    }
}

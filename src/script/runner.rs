//! Script runner for executing .dock files

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::ast::{Script, ShowTarget, Statement};
use super::grammar::parse_script;
use crate::clock::ManualClock;
use crate::config::DockConfig;
use crate::error::{DockError, Result};
use crate::output::{format_output, OutputFormat, View};
use crate::session::{SessionOrchestrator, Snapshot};

pub const SCRIPT_EXTENSION: &str = "dock";

/// Result of script execution
#[derive(Debug)]
pub struct ScriptResult {
    /// Rendered output of statements that produce any
    pub outputs: Vec<String>,
    /// Total statements executed
    pub statements_executed: usize,
    /// Whether the script completed successfully
    pub success: bool,
    /// Error message if script failed
    pub error: Option<String>,
    /// State after the last executed statement
    pub snapshot: Snapshot,
}

/// Runs session scripts against a fresh orchestrator
pub struct ScriptRunner {
    orchestrator: SessionOrchestrator,
    clock: Arc<ManualClock>,
    format: OutputFormat,
    verbose: bool,
}

impl ScriptRunner {
    /// Create a runner over the configured roster
    pub fn new(config: &DockConfig, format: OutputFormat) -> Result<Self> {
        let clock = Arc::new(ManualClock::default());
        let orchestrator = SessionOrchestrator::from_config(config, clock.clone())?;
        Ok(Self {
            orchestrator,
            clock,
            format,
            verbose: false,
        })
    }

    /// Also report lifecycle statements
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn orchestrator(&self) -> &SessionOrchestrator {
        &self.orchestrator
    }

    /// Load and run a script file
    pub fn run_file(&mut self, path: &Path) -> Result<ScriptResult> {
        if path.extension().map_or(true, |e| e != SCRIPT_EXTENSION) {
            return Err(DockError::ScriptError(format!(
                "Script file must have .{} extension: {}",
                SCRIPT_EXTENSION,
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(DockError::IoError)?;
        let script = parse_script(&content)?;
        self.run_script(&script)
    }

    /// Run a parsed script, stopping at the first failing statement
    pub fn run_script(&mut self, script: &Script) -> Result<ScriptResult> {
        let mut outputs = Vec::new();
        let mut statements_executed = 0;

        for statement in &script.statements {
            match self.execute(statement) {
                Ok(output) => {
                    statements_executed += 1;
                    if let Some(output) = output.filter(|o| !o.is_empty()) {
                        outputs.push(output);
                    }
                }
                Err(e) => {
                    debug!(statement = ?statement, error = %e, "script statement failed");
                    return Ok(ScriptResult {
                        outputs,
                        statements_executed,
                        success: false,
                        error: Some(e.to_string()),
                        snapshot: self.orchestrator.snapshot(),
                    });
                }
            }
        }

        Ok(ScriptResult {
            outputs,
            statements_executed,
            success: true,
            error: None,
            snapshot: self.orchestrator.snapshot(),
        })
    }

    /// Execute one statement, returning its rendered output
    pub fn execute(&mut self, statement: &Statement) -> Result<Option<String>> {
        match statement {
            Statement::Start(id) => {
                self.orchestrator.request_start(id)?;
                Ok(self.note(format!("{}: starting", id)))
            }
            Statement::Stop(id) => {
                self.orchestrator.request_stop(id)?;
                Ok(self.note(format!("{}: stopped", id)))
            }
            Statement::Input { id, text } => {
                self.orchestrator.set_input(id, text)?;
                Ok(None)
            }
            Statement::Submit(id) => {
                let submission = self.orchestrator.submit(id)?;
                Ok(Some(self.render(&View::Outcome(&submission.outcome))))
            }
            Statement::Exec { id, command } => {
                let submission = self.orchestrator.execute(id, command)?;
                Ok(Some(self.render(&View::Outcome(&submission.outcome))))
            }
            Statement::Send { from, to, kind, content } => {
                let message = self.orchestrator.send_message(from, to, *kind, content)?;
                Ok(self.note(format!("{}: {} -> {}", message.id, message.from, message.to)))
            }
            Statement::Wait(ms) => {
                let delay = match ms {
                    Some(ms) => i64::try_from(*ms)
                        .ok()
                        .and_then(chrono::Duration::try_milliseconds)
                        .ok_or_else(|| {
                            DockError::ScriptError(format!("wait of {} ms is out of range", ms))
                        })?,
                    None => chrono::Duration::from_std(self.orchestrator.boot_delay())
                        .map_err(|e| DockError::ScriptError(e.to_string()))?,
                };
                self.clock.advance(delay)?;
                let booted = self.orchestrator.run_due_boots()?;
                if booted.is_empty() {
                    Ok(None)
                } else {
                    Ok(self.note(format!("{}: running", booted.join(", "))))
                }
            }
            Statement::Show(target) => {
                let output = match target {
                    ShowTarget::Containers => {
                        self.render(&View::Containers(&self.orchestrator.containers()))
                    }
                    ShowTarget::Messages => {
                        self.render(&View::Messages(&self.orchestrator.messages()))
                    }
                    ShowTarget::Log(id) => {
                        let container = self.orchestrator.registry().get(id)?;
                        self.render(&View::Log(container))
                    }
                };
                Ok(Some(output))
            }
            Statement::ExpectStatus { id, status } => {
                let actual = self.orchestrator.registry().get(id)?.status();
                if actual != *status {
                    return Err(DockError::ScriptError(format!(
                        "expected {} to be {}, but it is {}",
                        id, status, actual
                    )));
                }
                Ok(None)
            }
            Statement::ExpectMessages(count) => {
                let actual = self.orchestrator.bus().len();
                if actual != *count {
                    return Err(DockError::ScriptError(format!(
                        "expected {} messages on the bus, found {}",
                        count, actual
                    )));
                }
                Ok(None)
            }
        }
    }

    fn render(&self, view: &View) -> String {
        format_output(view, &self.format)
    }

    fn note(&self, text: String) -> Option<String> {
        if self.verbose {
            Some(self.render(&View::Note(&text)))
        } else {
            None
        }
    }
}

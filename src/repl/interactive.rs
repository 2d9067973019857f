//! Interactive REPL implementation
//!
//! The REPL talks to the async session service, so boot timers really run in
//! the background while the prompt waits for input.

use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::clock::SystemClock;
use crate::config::DockConfig;
use crate::error::{DockError, Result};
use crate::output::{format_output, OutputFormat, View};
use crate::service::{self, SessionHandle};
use crate::session::{SessionOrchestrator, SubmitOutcome};

pub fn run_repl(config: &DockConfig, container: Option<String>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()
        .map_err(DockError::IoError)?;

    let orchestrator = SessionOrchestrator::from_config(config, Arc::new(SystemClock))?;
    let handle = runtime.block_on(async { service::spawn(orchestrator) });

    let mut rl = DefaultEditor::new().map_err(|e| DockError::ServiceUnavailable(e.to_string()))?;

    let mut selected = match container {
        Some(id) => id,
        None => config
            .containers
            .first()
            .map(|c| c.id.clone())
            .ok_or_else(|| DockError::ConfigError("no containers configured".to_string()))?,
    };

    println!("Agentdock v{} - Interactive Mode", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for commands, 'exit' to quit\n");

    loop {
        let readline = rl.readline(&format!("agentdock [{}]> ", selected));
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                let (word, rest) = match line.split_once(' ') {
                    Some((word, rest)) => (word, rest.trim()),
                    None => (line, ""),
                };
                let target = if rest.is_empty() { selected.clone() } else { rest.to_string() };

                let result = match word {
                    "exit" | "quit" | "q" => {
                        println!("Goodbye!");
                        break;
                    }
                    "help" | "?" if rest.is_empty() => {
                        print_help();
                        Ok(())
                    }
                    "use" if !rest.is_empty() => switch(&runtime, &handle, &mut selected, rest),
                    "containers" if rest.is_empty() => show_containers(&runtime, &handle),
                    "messages" if rest.is_empty() => show_messages(&runtime, &handle),
                    "log" => show_log(&runtime, &handle, &target),
                    "start" => runtime
                        .block_on(handle.start_container(&target))
                        .map(|_| println!("{} starting...\n", target)),
                    "stop" => runtime
                        .block_on(handle.stop_container(&target))
                        .map(|_| println!("{} stopped\n", target)),
                    _ => execute(&runtime, &handle, &selected, line),
                };

                if let Err(e) = result {
                    eprintln!("Error: {}\n", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn switch(runtime: &tokio::runtime::Runtime, handle: &SessionHandle, selected: &mut String, id: &str) -> Result<()> {
    let snapshot = runtime.block_on(handle.snapshot())?;
    if snapshot.container(id).is_none() {
        return Err(DockError::NotFound(id.to_string()));
    }
    *selected = id.to_string();
    println!("Attached to '{}'\n", id);
    Ok(())
}

fn show_containers(runtime: &tokio::runtime::Runtime, handle: &SessionHandle) -> Result<()> {
    let containers = runtime.block_on(handle.list_containers())?;
    println!("{}\n", format_output(&View::Containers(&containers), &OutputFormat::Human));
    Ok(())
}

fn show_messages(runtime: &tokio::runtime::Runtime, handle: &SessionHandle) -> Result<()> {
    let messages = runtime.block_on(handle.list_messages())?;
    println!("{}\n", format_output(&View::Messages(&messages), &OutputFormat::Human));
    Ok(())
}

fn show_log(runtime: &tokio::runtime::Runtime, handle: &SessionHandle, id: &str) -> Result<()> {
    let snapshot = runtime.block_on(handle.snapshot())?;
    let container = snapshot
        .container(id)
        .ok_or_else(|| DockError::NotFound(id.to_string()))?;
    println!("{}\n", format_output(&View::Log(container), &OutputFormat::Human));
    Ok(())
}

fn execute(runtime: &tokio::runtime::Runtime, handle: &SessionHandle, id: &str, command: &str) -> Result<()> {
    let submission = runtime.block_on(handle.execute(id, command))?;
    match submission.outcome {
        SubmitOutcome::Cleared => print!("\x1B[2J\x1B[1;1H"),
        SubmitOutcome::Ignored => {}
        SubmitOutcome::Executed { response, message, .. } => {
            println!("{}", response);
            if let Some(message) = message {
                println!("(shared as {})", message);
            }
            println!();
        }
    }
    Ok(())
}

fn print_help() {
    println!(r#"
Agentdock Commands
==================

LIFECYCLE:
  start [id]                      - Boot a container (defaults to the attached one)
  stop [id]                       - Stop a running or starting container
  use <id>                        - Attach the terminal to another container

INSPECTION:
  containers                      - List containers and their status
  messages                        - Show the MCP message bus
  log [id]                        - Show a container's session log

TERMINAL (attached container must be running):
  ai help                         - Agent help
  ai generate <description>       - Generate code; shares context with a running peer
  ls, pwd                         - Workspace listing and path
  clear                           - Reset the session log

REPL Commands:
  help, ?                         - Show this help
  exit, quit, q                   - Exit REPL
"#);
}

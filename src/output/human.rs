//! Human-readable output formatting

use super::View;
use crate::container::Container;
use crate::interpreter::Matcher;
use crate::session::SubmitOutcome;

pub fn format_human(view: &View) -> String {
    match view {
        View::Containers(containers) => {
            if containers.is_empty() {
                return "No containers configured".to_string();
            }
            let mut output = String::from("Containers\n----------\n");
            for container in containers.iter() {
                output.push_str(&container_line(container));
                output.push('\n');
            }
            output
        }
        View::Messages(messages) => {
            if messages.is_empty() {
                return "No MCP messages yet".to_string();
            }
            let mut output = String::from("MCP Messages\n------------\n");
            for message in messages.iter() {
                output.push_str(&format!(
                    "\n{} [{}] {} -> {} ({})\n  {}\n",
                    message.id,
                    message.created_at.format("%H:%M:%S"),
                    message.from,
                    message.to,
                    message.kind,
                    message.content
                ));
            }
            output
        }
        View::Log(container) => container.log().join("\n"),
        View::Outcome(outcome) => match outcome {
            SubmitOutcome::Ignored => String::new(),
            SubmitOutcome::Cleared => "(log cleared)".to_string(),
            SubmitOutcome::Executed { response, .. } => response.clone(),
        },
        View::Rule { command, rule } => {
            let matcher = match rule.matcher {
                Matcher::Exact(p) => format!("equals \"{}\"", p),
                Matcher::Contains(p) => format!("contains \"{}\"", p),
                Matcher::Always => "fallback".to_string(),
            };
            format!(
                "Command: {}\nRule {}: {} ({})",
                command, rule.rank, rule.name, matcher
            )
        }
        View::Note(text) => text.to_string(),
    }
}

fn container_line(container: &Container) -> String {
    let agent = container
        .agent()
        .map(|a| a.label())
        .unwrap_or("none");
    format!(
        "  {:<14} {:<18} [{}]  agent: {}  {}",
        container.id(),
        container.name(),
        container.status(),
        agent,
        container.resources()
    )
}

//! Terminal command interpreter
//!
//! Turns one command line into the response a container's terminal shows,
//! plus an optional MCP message for another running container. The
//! interpreter never mutates anything; the session orchestrator applies the
//! result.

pub mod rules;

use crate::bus::{MessageDraft, MessageKind};
use crate::container::{AgentKind, Container};

pub use rules::{Action, Matcher, Rule, RULES};

/// Literal removed from `ai generate` commands before echoing them
pub const GENERATE_PREFIX: &str = "ai generate ";

/// Static `ls` output
pub const LISTING: &str = "app.py  requirements.txt  src/  tests/  README.md";

/// Static `pwd` output
pub const WORKING_DIR: &str = "/workspace";

pub const CLAUDE_HELP: &str = "Claude AI: I can help you with code generation, debugging, and analysis. Try \"ai generate <description>\" or \"ai debug <code>\"";

pub const GEMINI_HELP: &str = "Gemini AI: Ready to assist with coding tasks, explanations, and problem-solving. Use \"ai code <task>\" or \"ai explain <concept>\"";

/// Outcome of interpreting one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Reset the session log to a single prompt
    Clear,
    /// Append the command, its response and a new prompt
    Reply {
        response: String,
        draft: Option<MessageDraft>,
    },
}

/// Interpret `command` as typed into `container`.
///
/// `peer` is the first other running container in registry order, if any;
/// `ai generate` shares its request with it.
pub fn interpret(container: &Container, command: &str, peer: Option<&Container>) -> Interpretation {
    let rule = rules::select(command);
    let response = match rule.action {
        Action::ClearLog => return Interpretation::Clear,
        Action::AgentHelp => agent_help(container.agent()).to_string(),
        Action::Generate => {
            let request = command.replacen(GENERATE_PREFIX, "", 1);
            let draft = peer.filter(|p| p.id() != container.id()).map(|p| {
                MessageDraft::new(
                    container.id(),
                    p.id(),
                    MessageKind::Context,
                    format!("Sharing code generation context: {}", request),
                )
            });
            return Interpretation::Reply {
                response: format!("{} AI: Generating code for: {}", agent_label(container.agent()), request),
                draft,
            };
        }
        Action::Listing => LISTING.to_string(),
        Action::WorkingDir => WORKING_DIR.to_string(),
        Action::NotFound => format!("bash: {}: command not found", command),
    };

    Interpretation::Reply {
        response,
        draft: None,
    }
}

/// The rule that would handle `command`
pub fn explain(command: &str) -> &'static Rule {
    rules::select(command)
}

fn agent_help(agent: Option<AgentKind>) -> &'static str {
    match agent {
        Some(AgentKind::Claude) => CLAUDE_HELP,
        _ => GEMINI_HELP,
    }
}

fn agent_label(agent: Option<AgentKind>) -> &'static str {
    agent.map(|a| a.label()).unwrap_or("SHELL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Resources;

    fn claude() -> Container {
        Container::new("container-1", "Claude Terminal", Some(AgentKind::Claude), Resources::default())
    }

    fn gemini() -> Container {
        Container::new("container-2", "Gemini Terminal", Some(AgentKind::Gemini), Resources::default())
    }

    fn reply(interpretation: Interpretation) -> (String, Option<MessageDraft>) {
        match interpretation {
            Interpretation::Reply { response, draft } => (response, draft),
            Interpretation::Clear => panic!("expected a reply"),
        }
    }

    #[test]
    fn test_clear() {
        assert_eq!(interpret(&claude(), "clear", None), Interpretation::Clear);
    }

    #[test]
    fn test_help_depends_on_agent() {
        let (claude_help, _) = reply(interpret(&claude(), "ai help", None));
        let (gemini_help, _) = reply(interpret(&gemini(), "ai help", None));
        assert_eq!(claude_help, CLAUDE_HELP);
        assert_eq!(gemini_help, GEMINI_HELP);

        let unbound = Container::new("c", "plain", None, Resources::default());
        assert_eq!(reply(interpret(&unbound, "ai help", None)).0, GEMINI_HELP);
    }

    #[test]
    fn test_help_wins_over_ls() {
        let (response, draft) = reply(interpret(&claude(), "ai help ls", Some(&gemini())));
        assert_eq!(response, CLAUDE_HELP);
        assert!(draft.is_none());
    }

    #[test]
    fn test_generate_with_peer_drafts_context() {
        let (response, draft) = reply(interpret(&claude(), "ai generate sort function", Some(&gemini())));
        assert_eq!(response, "CLAUDE AI: Generating code for: sort function");

        let draft = draft.unwrap();
        assert_eq!(draft.from, "container-1");
        assert_eq!(draft.to, "container-2");
        assert_eq!(draft.kind, MessageKind::Context);
        assert_eq!(draft.content, "Sharing code generation context: sort function");
        assert!(draft.id.is_none());
    }

    #[test]
    fn test_generate_without_peer() {
        let (response, draft) = reply(interpret(&gemini(), "ai generate tests", None));
        assert_eq!(response, "GEMINI AI: Generating code for: tests");
        assert!(draft.is_none());
    }

    #[test]
    fn test_generate_ignores_self_as_peer() {
        let me = claude();
        let (_, draft) = reply(interpret(&me, "ai generate x", Some(&me)));
        assert!(draft.is_none());
    }

    #[test]
    fn test_generate_strips_first_prefix_only() {
        let (response, _) = reply(interpret(&claude(), "please ai generate ai generate twice", None));
        assert_eq!(response, "CLAUDE AI: Generating code for: please ai generate twice");

        // no trailing space, nothing to strip
        let (response, _) = reply(interpret(&claude(), "ai generate", None));
        assert_eq!(response, "CLAUDE AI: Generating code for: ai generate");
    }

    #[test]
    fn test_static_commands() {
        assert_eq!(reply(interpret(&claude(), "ls -la", None)).0, LISTING);
        assert_eq!(reply(interpret(&claude(), "pwd", None)).0, WORKING_DIR);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            reply(interpret(&claude(), "whoami", None)).0,
            "bash: whoami: command not found"
        );
    }

    #[test]
    fn test_explain() {
        assert_eq!(explain("ai help ls").rank, 2);
        assert_eq!(explain("echo hi").name, "command not found");
    }
}

//! Ordered command rules
//!
//! Matching is case-sensitive and the first rule that matches wins, so the
//! order of [`RULES`] is behavior. A line such as `ai help ls` must resolve to
//! the agent help, never the directory listing.

use serde::Serialize;

/// How a rule recognises a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "pattern", rename_all = "lowercase")]
pub enum Matcher {
    /// The whole line equals the pattern
    Exact(&'static str),
    /// The pattern occurs anywhere in the line
    Contains(&'static str),
    /// Fallback
    Always,
}

impl Matcher {
    pub fn matches(&self, command: &str) -> bool {
        match self {
            Matcher::Exact(pattern) => command == *pattern,
            Matcher::Contains(pattern) => command.contains(pattern),
            Matcher::Always => true,
        }
    }
}

/// What the interpreter does once a rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ClearLog,
    AgentHelp,
    Generate,
    Listing,
    WorkingDir,
    NotFound,
}

/// One entry of the precedence list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// 1-based precedence
    pub rank: usize,
    pub name: &'static str,
    pub matcher: Matcher,
    pub action: Action,
}

pub const RULES: &[Rule] = &[
    Rule {
        rank: 1,
        name: "clear",
        matcher: Matcher::Exact("clear"),
        action: Action::ClearLog,
    },
    Rule {
        rank: 2,
        name: "ai help",
        matcher: Matcher::Contains("ai help"),
        action: Action::AgentHelp,
    },
    Rule {
        rank: 3,
        name: "ai generate",
        matcher: Matcher::Contains("ai generate"),
        action: Action::Generate,
    },
    Rule {
        rank: 4,
        name: "ls",
        matcher: Matcher::Contains("ls"),
        action: Action::Listing,
    },
    Rule {
        rank: 5,
        name: "pwd",
        matcher: Matcher::Contains("pwd"),
        action: Action::WorkingDir,
    },
    Rule {
        rank: 6,
        name: "command not found",
        matcher: Matcher::Always,
        action: Action::NotFound,
    },
];

/// The first rule matching `command`
pub fn select(command: &str) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(command))
        .unwrap_or(&RULES[RULES.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_follow_slice_order() {
        for (i, rule) in RULES.iter().enumerate() {
            assert_eq!(rule.rank, i + 1);
        }
        assert_eq!(RULES.last().map(|r| r.matcher), Some(Matcher::Always));
    }

    #[test]
    fn test_clear_is_exact_only() {
        assert_eq!(select("clear").action, Action::ClearLog);
        assert_eq!(select("clear ").action, Action::NotFound);
        assert_eq!(select("Clear").action, Action::NotFound);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(select("ai help ls").action, Action::AgentHelp);
        assert_eq!(select("ls ai help").action, Action::AgentHelp);
        assert_eq!(select("ai generate ls wrapper").action, Action::Generate);
        assert_eq!(select("ls; pwd").action, Action::Listing);
        assert_eq!(select("pwd").action, Action::WorkingDir);
        assert_eq!(select("AI HELP").action, Action::NotFound);
    }

    #[test]
    fn test_substring_matches() {
        // "ls" hides inside other words
        assert_eq!(select("false").action, Action::Listing);
        assert_eq!(select("whoami").action, Action::NotFound);
    }
}

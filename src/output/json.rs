//! JSON output formatting

use super::View;
use serde_json::{json, Value};

pub fn format_json(view: &View) -> String {
    let data: Value = match view {
        View::Containers(containers) => serde_json::to_value(containers).unwrap_or(json!(null)),
        View::Messages(messages) => serde_json::to_value(messages).unwrap_or(json!(null)),
        View::Log(container) => json!({
            "id": container.id(),
            "status": container.status(),
            "log": container.log(),
        }),
        View::Outcome(outcome) => serde_json::to_value(outcome).unwrap_or(json!(null)),
        View::Rule { command, rule } => json!({ "command": command, "rule": rule }),
        View::Note(text) => json!({ "message": text }),
    };

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}

//! Dashboard configuration
//!
//! Loaded from a JSON file when `--config` is given. Without one the default
//! roster is the two-terminal setup: a Claude container and a Gemini
//! container, both stopped.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::container::{AgentKind, Container, ContainerRegistry, Resources};
use crate::error::{DockError, Result};

/// Simulated boot time when none is configured
pub const DEFAULT_BOOT_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Delay between `start` and the container reaching `running`
    pub boot_delay_ms: u64,
    /// Containers in registry order
    pub containers: Vec<ContainerSpec>,
}

/// One container of the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub agent: Option<AgentKind>,
    #[serde(default)]
    pub resources: Resources,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
            containers: vec![
                ContainerSpec {
                    id: "container-1".to_string(),
                    name: "Claude Terminal".to_string(),
                    agent: Some(AgentKind::Claude),
                    resources: Resources::default(),
                },
                ContainerSpec {
                    id: "container-2".to_string(),
                    name: "Gemini Terminal".to_string(),
                    agent: Some(AgentKind::Gemini),
                    resources: Resources::default(),
                },
            ],
        }
    }
}

impl DockConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(DockError::IoError)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: DockConfig = serde_json::from_str(content)
            .map_err(|e| DockError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Ids must be non-empty and unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for spec in &self.containers {
            if spec.id.trim().is_empty() {
                return Err(DockError::ConfigError(format!(
                    "container '{}' has an empty id",
                    spec.name
                )));
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(DockError::ConfigError(format!(
                    "duplicate container id '{}'",
                    spec.id
                )));
            }
        }
        Ok(())
    }

    pub fn boot_delay(&self) -> Duration {
        Duration::from_millis(self.boot_delay_ms)
    }

    /// Build a registry holding every configured container, stopped
    pub fn build_registry(&self) -> Result<ContainerRegistry> {
        let mut registry = ContainerRegistry::new();
        for spec in &self.containers {
            registry.insert(Container::new(
                spec.id.clone(),
                spec.name.clone(),
                spec.agent,
                spec.resources,
            ))?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_roster() {
        let config = DockConfig::default();
        assert_eq!(config.boot_delay(), Duration::from_secs(2));
        let registry = config.build_registry().unwrap();
        let ids: Vec<&str> = registry.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["container-1", "container-2"]);
        assert_eq!(registry.get("container-2").unwrap().agent(), Some(AgentKind::Gemini));
    }

    #[test]
    fn test_from_json_with_defaults() {
        let config = DockConfig::from_json(
            r#"{ "containers": [ { "id": "box", "name": "Box", "resources": { "cpu_cores": 8 } } ] }"#,
        )
        .unwrap();
        assert_eq!(config.boot_delay_ms, DEFAULT_BOOT_DELAY_MS);
        assert_eq!(config.containers[0].agent, None);
        assert_eq!(config.containers[0].resources.cpu_cores, 8);
        assert_eq!(
            config.containers[0].resources.memory_bytes,
            Resources::default().memory_bytes
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = DockConfig::from_json(
            r#"{ "containers": [ { "id": "a", "name": "A" }, { "id": "a", "name": "B" } ] }"#,
        );
        assert!(matches!(result, Err(DockError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DockConfig::from_json("{ not json"),
            Err(DockError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "boot_delay_ms": 10, "containers": [ {{ "id": "x", "name": "X", "agent": "claude" }} ] }}"#).unwrap();
        let config = DockConfig::load(file.path()).unwrap();
        assert_eq!(config.boot_delay(), Duration::from_millis(10));
        assert_eq!(config.containers[0].agent, Some(AgentKind::Claude));
    }
}

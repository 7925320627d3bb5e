use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Which TAG nodes survive a text query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagTextPolicy {
    /// Every tag stays selectable, whether or not a note matched.
    #[default]
    Always,
    /// Only tags carried by at least one matched note.
    Connected,
}

/// What to do when two input notes share a path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNotes {
    #[default]
    Reject,
    LastWins,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    pub base_radius: f32,
    pub radius_multiplier: f32,
    pub title_max_len: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_radius: 12.0,
            radius_multiplier: 0.5,
            title_max_len: 60,
        }
    }
}

impl NodeConfig {
    pub fn radius(&self, in_degree: usize) -> f32 {
        self.base_radius + self.base_radius * self.radius_multiplier * in_degree as f32
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceConfig {
    pub center_force: f32,
    pub repel_force: f32,
    pub link_force: f32,
    pub link_distance: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            center_force: 0.1,
            repel_force: -500.0,
            link_force: 0.2,
            link_distance: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    pub min: f32,
    pub max: f32,
    pub default_scale: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 10.0,
            default_scale: 0.2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenerConfig {
    pub program: String,
}

impl Default for OpenerConfig {
    fn default() -> Self {
        Self {
            program: "neovide".to_owned(),
        }
    }
}

/// Settings threaded into graph construction and filtering.
///
/// `force` and `zoom` belong to the renderer; they are only carried so a
/// stored config round-trips unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
    pub node: NodeConfig,
    pub force: ForceConfig,
    pub zoom: ZoomConfig,
    pub opener: OpenerConfig,
    pub tag_text_policy: TagTextPolicy,
    pub duplicate_notes: DuplicateNotes,
}

impl GraphConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid graph config JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to load config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_with_in_degree() {
        let node = NodeConfig::default();
        assert_eq!(node.radius(0), 12.0);
        assert_eq!(node.radius(1), 18.0);
        assert_eq!(node.radius(5), 42.0);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = GraphConfig::from_json(
            r#"{"node":{"baseRadius":10},"opener":{"program":"nvim"},"tagTextPolicy":"connected"}"#,
        )
        .unwrap();

        assert_eq!(config.node.base_radius, 10.0);
        assert_eq!(config.node.radius_multiplier, 0.5);
        assert_eq!(config.node.title_max_len, 60);
        assert_eq!(config.opener.program, "nvim");
        assert_eq!(config.tag_text_policy, TagTextPolicy::Connected);
        assert_eq!(config.duplicate_notes, DuplicateNotes::Reject);
        assert_eq!(config.zoom, ZoomConfig::default());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = GraphConfig {
            duplicate_notes: DuplicateNotes::LastWins,
            ..GraphConfig::default()
        };
        let raw = serde_json::to_string(&config).unwrap();
        assert!(raw.contains("\"duplicateNotes\":\"last_wins\""));
        assert_eq!(GraphConfig::from_json(&raw).unwrap(), config);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let error = GraphConfig::from_json(r#"{"node":{"baseRadius":"big"}}"#).unwrap_err();
        assert!(error.to_string().contains("invalid graph config"));
    }
}

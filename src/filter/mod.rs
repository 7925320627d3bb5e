mod search;
mod view;

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use search::{SearchCandidate, SkimTextMatcher, SubstringMatcher, TextMatcher};
pub use view::{ExportedEdge, ExportedGraph, GraphView};

/// What the renderer currently asks to see. Stored between sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_tags: Option<bool>,
}

/// A partial change to [`FilterState`]. `None` leaves a field alone; an
/// empty string or empty list clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterUpdate {
    pub filter_string: Option<String>,
    pub tags: Option<Vec<String>>,
    pub selected_node: Option<String>,
    pub show_tags: Option<bool>,
}

impl FilterState {
    pub fn query(&self) -> Option<&str> {
        self.filter_string
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
    }

    pub fn selected_tags(&self) -> Option<&BTreeSet<String>> {
        self.tags.as_ref().filter(|tags| !tags.is_empty())
    }

    pub fn shows_tags(&self) -> bool {
        self.show_tags.unwrap_or(true)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.query().is_none() && self.selected_tags().is_none() && self.shows_tags()
    }

    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(filter_string) = update.filter_string {
            self.filter_string = Some(filter_string).filter(|query| !query.is_empty());
        }
        if let Some(tags) = update.tags {
            let tags = tags.into_iter().collect::<BTreeSet<_>>();
            self.tags = Some(tags).filter(|tags| !tags.is_empty());
        }
        if let Some(selected) = update.selected_node {
            self.selected_node = Some(selected).filter(|path| !path.is_empty());
        }
        if let Some(show_tags) = update.show_tags {
            self.show_tags = Some(show_tags);
        }
    }

    /// Reads a stored filter; a missing file is an empty filter.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("invalid filter state in {}", path.display())),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error)
                .with_context(|| format!("failed to read filter state {}", path.display())),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).context("failed to encode filter state")?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write filter state {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process;

    use super::*;

    #[test]
    fn omitted_fields_leave_state_unchanged() {
        let mut state = FilterState::default();
        state.merge(FilterUpdate {
            filter_string: Some("virtual".to_owned()),
            tags: Some(vec!["os".to_owned(), "vm".to_owned(), "os".to_owned()]),
            selected_node: Some("a.md".to_owned()),
            show_tags: Some(false),
        });
        state.merge(FilterUpdate::default());

        assert_eq!(state.query(), Some("virtual"));
        assert_eq!(state.selected_tags().map(BTreeSet::len), Some(2));
        assert_eq!(state.selected_node.as_deref(), Some("a.md"));
        assert!(!state.shows_tags());
    }

    #[test]
    fn empty_values_clear_their_dimension() {
        let mut state = FilterState::default();
        state.merge(FilterUpdate {
            filter_string: Some("virtual".to_owned()),
            tags: Some(vec!["os".to_owned()]),
            selected_node: Some("a.md".to_owned()),
            ..FilterUpdate::default()
        });
        state.merge(FilterUpdate {
            filter_string: Some(String::new()),
            tags: Some(Vec::new()),
            selected_node: Some(String::new()),
            ..FilterUpdate::default()
        });

        assert_eq!(state, FilterState::default());
        assert!(state.is_unfiltered());
    }

    #[test]
    fn blank_query_means_no_query() {
        let state = FilterState {
            filter_string: Some("   ".to_owned()),
            ..FilterState::default()
        };
        assert_eq!(state.query(), None);
        assert!(state.is_unfiltered());
    }

    #[test]
    fn update_deserializes_from_renderer_json() {
        let update: FilterUpdate =
            serde_json::from_str(r#"{"filterString":"","showTags":true}"#).unwrap();
        assert_eq!(update.filter_string.as_deref(), Some(""));
        assert_eq!(update.tags, None);
        assert_eq!(update.show_tags, Some(true));
    }

    #[test]
    fn state_survives_a_save_and_load() {
        let path = env::temp_dir().join(format!("zk-graph-filter-{}.json", process::id()));
        let mut state = FilterState::default();
        state.merge(FilterUpdate {
            filter_string: Some("page".to_owned()),
            tags: Some(vec!["os".to_owned()]),
            show_tags: Some(false),
            ..FilterUpdate::default()
        });

        state.save(&path).unwrap();
        let loaded = FilterState::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(FilterState::load(&path).unwrap(), FilterState::default());
    }
}

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A note as exported by `zk graph --format json`.
///
/// Only `path`, `title` and `tags` are interpreted; every other field lands
/// in `extra` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNote {
    pub path: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, rename = "absPath", skip_serializing_if = "Option::is_none")]
    pub abs_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(tags.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    #[serde(rename = "sourcePath")]
    pub source_path: String,
    #[serde(rename = "targetPath")]
    pub target_path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGraph {
    pub notes: Vec<RawNote>,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

/// One entry of `zk tag list --format json`. `note_count` is informational.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub name: String,
    #[serde(default, rename = "noteCount")]
    pub note_count: usize,
}

pub fn parse_graph_output(raw: &str) -> Result<RawGraph> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON from zk graph")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("unexpected JSON type from zk graph; expected an object"))?;

    let notes_value = object
        .get("notes")
        .ok_or_else(|| anyhow!("zk graph output has no `notes` field"))?;
    let notes_array = notes_value
        .as_array()
        .ok_or_else(|| anyhow!("zk graph `notes` field is not an array"))?;

    let mut notes = Vec::with_capacity(notes_array.len());
    for (index, value) in notes_array.iter().enumerate() {
        let note = RawNote::deserialize(value)
            .with_context(|| format!("invalid note at index {index}"))?;
        if note.path.trim().is_empty() {
            bail!("note at index {index} has an empty path");
        }
        notes.push(note);
    }

    let links_array: &[Value] = match object.get("links") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(links)) => links,
        Some(_) => bail!("zk graph `links` field is not an array"),
    };

    let mut links = Vec::with_capacity(links_array.len());
    for (index, value) in links_array.iter().enumerate() {
        let link = RawLink::deserialize(value)
            .with_context(|| format!("invalid link at index {index}"))?;
        if link.source_path.is_empty() || link.target_path.is_empty() {
            bail!("link at index {index} has an empty endpoint");
        }
        links.push(link);
    }

    Ok(RawGraph { notes, links })
}

pub fn parse_tag_catalog(raw: &str) -> Result<Vec<TagSummary>> {
    serde_json::from_str(raw).context("invalid tag catalog JSON")
}

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::NodeConfig;
use crate::util::truncate_title;
use crate::zk::RawNote;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Note,
    Tag,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tag => "tag",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Link,
    Tag,
}

/// Node identity. Notes and tags live in separate namespaces, so a tag
/// named like a note path never collides with it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub kind: NodeKind,
    pub path: String,
}

impl NodeKey {
    pub fn note(path: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Note,
            path: path.into(),
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Tag,
            path: name.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub path: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs_path: Option<String>,
    pub in_degree: usize,
    pub out_degree: usize,
    pub radius: f32,
    /// Note fields the graph does not interpret.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Node {
    pub(super) fn note(id: NodeId, raw: RawNote, config: &NodeConfig) -> Self {
        let mut tags = Vec::with_capacity(raw.tags.len());
        for tag in raw.tags {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Self {
            id,
            kind: NodeKind::Note,
            title: truncate_title(&raw.title, config.title_max_len),
            path: raw.path,
            tags,
            abs_path: raw.abs_path,
            in_degree: 0,
            out_degree: 0,
            radius: config.radius(0),
            data: raw.extra,
        }
    }

    pub(super) fn tag(id: NodeId, name: &str, config: &NodeConfig) -> Self {
        Self {
            id,
            kind: NodeKind::Tag,
            path: name.to_owned(),
            title: name.to_owned(),
            tags: Vec::new(),
            abs_path: None,
            in_degree: 0,
            out_degree: 0,
            radius: config.radius(0),
            data: Map::new(),
        }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey {
            kind: self.kind,
            path: self.path.clone(),
        }
    }

    pub fn is_note(&self) -> bool {
        self.kind == NodeKind::Note
    }

    pub fn is_tag(&self) -> bool {
        self.kind == NodeKind::Tag
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|own| own == tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// The endpoint across from `node`; `node` itself for a self-link.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagMembers {
    pub name: String,
    pub notes: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub notes: usize,
    pub tags: usize,
    pub links: usize,
    pub tag_edges: usize,
    pub dropped_links: usize,
}

/// Notes, tags and the edges between them, built once per export.
///
/// Nodes and edges are stored in insertion order; `index_by_key` and
/// `edge_index` point into those arenas and are the only way degrees are
/// updated during construction.
#[derive(Clone, Debug, Default)]
pub struct NoteGraph {
    pub(super) nodes: Vec<Node>,
    pub(super) edges: Vec<Edge>,
    pub(super) index_by_key: HashMap<NodeKey, NodeId>,
    pub(super) edge_index: HashMap<(NodeId, NodeId), EdgeId>,
    pub(super) incident: Vec<Vec<EdgeId>>,
    pub(super) tags: Vec<TagMembers>,
    pub(super) tag_index: HashMap<String, usize>,
    pub(super) note_ids: Vec<NodeId>,
    pub(super) stats: GraphStats,
}

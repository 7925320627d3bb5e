use std::collections::HashSet;

use log::warn;

use crate::zk::TagSummary;

use super::types::{
    Edge, EdgeId, EdgeKind, GraphStats, Node, NodeId, NodeKey, NoteGraph, TagMembers,
};

impl NoteGraph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    /// Every note node, regardless of any filter.
    pub fn notes(&self) -> impl Iterator<Item = &Node> {
        self.note_ids.iter().map(|id| &self.nodes[id.0])
    }

    /// Every note-to-note edge, regardless of any filter.
    pub fn links(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| edge.kind == EdgeKind::Link)
    }

    pub fn find_by_key(&self, key: &NodeKey) -> Option<NodeId> {
        self.index_by_key.get(key).copied()
    }

    /// Looks up a node by path. A note shadows a tag of the same name; use
    /// [`NoteGraph::find_tag`] to reach the tag.
    pub fn find_node(&self, path: &str) -> Option<&Node> {
        self.find_by_key(&NodeKey::note(path))
            .or_else(|| self.find_by_key(&NodeKey::tag(path)))
            .and_then(|id| self.node(id))
    }

    pub fn find_tag(&self, name: &str) -> Option<&Node> {
        self.find_by_key(&NodeKey::tag(name))
            .and_then(|id| self.node(id))
    }

    pub fn find_notes_with_tag(&self, tag: &str) -> Vec<&Node> {
        self.notes().filter(|node| node.has_tag(tag)).collect()
    }

    /// Edges with `node` at either end, in insertion order. Unknown ids
    /// yield an empty list.
    pub fn connected_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.incident.get(node.0).cloned().unwrap_or_default()
    }

    /// Neighbours of `node` across link and tag edges, in either direction.
    pub fn connected_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let Some(incident) = self.incident.get(node.0) else {
            return Vec::new();
        };

        let mut seen = HashSet::with_capacity(incident.len());
        incident
            .iter()
            .map(|&edge| self.edges[edge.0].other(node))
            .filter(|&neighbor| seen.insert(neighbor))
            .collect()
    }

    pub fn tags(&self) -> &[TagMembers] {
        &self.tags
    }

    pub fn tag_members(&self, name: &str) -> Option<&[String]> {
        self.tag_index
            .get(name)
            .map(|&slot| self.tags[slot].notes.as_slice())
    }

    /// Tags ordered for a selection list: most members first, then by name.
    pub fn tags_by_count(&self) -> Vec<&TagMembers> {
        let mut tags = self.tags.iter().collect::<Vec<_>>();
        tags.sort_by(|a, b| {
            b.notes
                .len()
                .cmp(&a.notes.len())
                .then_with(|| a.name.cmp(&b.name))
        });
        tags
    }

    /// Compares an external tag catalog with the computed membership and
    /// returns how many entries disagree. The catalog is never trusted.
    pub fn reconcile_tag_catalog(&self, catalog: &[TagSummary]) -> usize {
        let mut mismatches = 0usize;
        for summary in catalog {
            let actual = self.tag_members(&summary.name).map_or(0, <[String]>::len);
            if actual != summary.note_count {
                warn!(
                    "tag catalog lists {} with {} notes, graph has {actual}",
                    summary.name, summary.note_count
                );
                mismatches += 1;
            }
        }
        mismatches
    }
}

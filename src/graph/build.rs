use std::collections::HashSet;

use anyhow::{Result, bail};
use log::{debug, info};

use crate::config::{DuplicateNotes, GraphConfig, NodeConfig};
use crate::zk::RawGraph;

use super::types::{
    Edge, EdgeId, EdgeKind, GraphStats, Node, NodeId, NodeKey, NoteGraph, TagMembers,
};

impl NoteGraph {
    pub fn build(raw: RawGraph, config: &GraphConfig) -> Result<Self> {
        let RawGraph { notes, links } = raw;
        let mut graph = Self::default();

        for (index, note) in notes.into_iter().enumerate() {
            if note.path.is_empty() {
                bail!("note at index {index} has an empty path");
            }

            let key = NodeKey::note(note.path.as_str());
            if let Some(&existing) = graph.index_by_key.get(&key) {
                match config.duplicate_notes {
                    DuplicateNotes::Reject => {
                        bail!("duplicate note path {} at index {index}", key.path)
                    }
                    DuplicateNotes::LastWins => {
                        debug!(
                            "note {} at index {index} replaces an earlier note",
                            key.path
                        );
                        graph.nodes[existing.0] = Node::note(existing, note, &config.node);
                        continue;
                    }
                }
            }

            let id = graph.next_node_id();
            graph.push_node(key, Node::note(id, note, &config.node));
        }

        let mut outbound = HashSet::new();
        let mut dropped_links = 0usize;
        for link in &links {
            let Some(source) = graph.note_id(&link.source_path) else {
                debug!(
                    "dropping link {} -> {}: unknown source note",
                    link.source_path, link.target_path
                );
                dropped_links += 1;
                continue;
            };

            if outbound.insert((source, link.target_path.as_str())) {
                graph.nodes[source.0].out_degree += 1;
            }

            let Some(target) = graph.note_id(&link.target_path) else {
                debug!(
                    "dropping link {} -> {}: unknown target note",
                    link.source_path, link.target_path
                );
                dropped_links += 1;
                continue;
            };

            graph.insert_edge(EdgeKind::Link, source, target, &config.node);
        }
        let link_count = graph.edges.len();

        let mut tags: Vec<TagMembers> = Vec::new();
        for node in graph.nodes.iter().filter(|node| node.is_note()) {
            for tag in &node.tags {
                let slot = match graph.tag_index.get(tag) {
                    Some(&slot) => slot,
                    None => {
                        graph.tag_index.insert(tag.clone(), tags.len());
                        tags.push(TagMembers {
                            name: tag.clone(),
                            notes: Vec::new(),
                        });
                        tags.len() - 1
                    }
                };
                tags[slot].notes.push(node.path.clone());
            }
        }

        for members in &tags {
            let tag_id = graph.next_node_id();
            graph.push_node(
                NodeKey::tag(members.name.as_str()),
                Node::tag(tag_id, &members.name, &config.node),
            );

            for path in &members.notes {
                if let Some(note_id) = graph.note_id(path) {
                    graph.insert_edge(EdgeKind::Tag, note_id, tag_id, &config.node);
                }
            }
        }
        graph.tags = tags;

        graph.note_ids = graph
            .nodes
            .iter()
            .filter(|node| node.is_note())
            .map(|node| node.id)
            .collect();

        graph.stats = GraphStats {
            notes: graph.note_ids.len(),
            tags: graph.tags.len(),
            links: link_count,
            tag_edges: graph.edges.len() - link_count,
            dropped_links,
        };
        info!(
            "built note graph: {} notes, {} tags, {} links ({} dropped), {} tag edges",
            graph.stats.notes,
            graph.stats.tags,
            graph.stats.links,
            graph.stats.dropped_links,
            graph.stats.tag_edges
        );

        Ok(graph)
    }

    fn next_node_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    fn push_node(&mut self, key: NodeKey, node: Node) {
        self.index_by_key.insert(key, node.id);
        self.nodes.push(node);
        self.incident.push(Vec::new());
    }

    fn note_id(&self, path: &str) -> Option<NodeId> {
        self.index_by_key.get(&NodeKey::note(path)).copied()
    }

    /// Registers `source -> target` unless it already exists. Only the
    /// target's in-degree moves; out-degree is tracked by the caller.
    fn insert_edge(
        &mut self,
        kind: EdgeKind,
        source: NodeId,
        target: NodeId,
        config: &NodeConfig,
    ) -> Option<EdgeId> {
        if self.edge_index.contains_key(&(source, target)) {
            return None;
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            id,
            kind,
            source,
            target,
        });
        self.edge_index.insert((source, target), id);
        self.incident[source.0].push(id);
        if source != target {
            self.incident[target.0].push(id);
        }

        let node = &mut self.nodes[target.0];
        node.in_degree += 1;
        node.radius = config.radius(node.in_degree);
        Some(id)
    }
}

use log::debug;
use serde::Serialize;

use crate::config::{GraphConfig, TagTextPolicy};
use crate::graph::{Edge, EdgeId, EdgeKind, Node, NodeId, NoteGraph, TagMembers};

use super::search::{SearchCandidate, SkimTextMatcher, TextMatcher};
use super::{FilterState, FilterUpdate};

/// The graph as the renderer sees it: the immutable [`NoteGraph`] plus the
/// filter state and the subset it currently selects.
pub struct GraphView {
    graph: NoteGraph,
    filter: FilterState,
    tag_text_policy: TagTextPolicy,
    matcher: Box<dyn TextMatcher>,
    visible_nodes: Vec<NodeId>,
    visible_edges: Vec<EdgeId>,
    revision: u64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedEdge {
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportedGraph<'a> {
    pub filter: &'a FilterState,
    pub nodes: Vec<&'a Node>,
    pub links: Vec<ExportedEdge>,
}

impl GraphView {
    pub fn new(graph: NoteGraph, config: &GraphConfig) -> Self {
        Self::with_matcher(graph, config, Box::new(SkimTextMatcher::default()))
    }

    pub fn with_matcher(
        graph: NoteGraph,
        config: &GraphConfig,
        matcher: Box<dyn TextMatcher>,
    ) -> Self {
        let mut view = Self {
            graph,
            filter: FilterState::default(),
            tag_text_policy: config.tag_text_policy,
            matcher,
            visible_nodes: Vec::new(),
            visible_edges: Vec::new(),
            revision: 0,
        };
        view.apply_filters();
        view
    }

    pub fn graph(&self) -> &NoteGraph {
        &self.graph
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Bumped every time the filtered subset is recomputed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.filter.merge(update);
        self.apply_filters();
    }

    pub fn replace_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.apply_filters();
    }

    /// Swaps in a freshly built graph, keeping the current filter.
    pub fn replace_graph(&mut self, graph: NoteGraph) {
        self.graph = graph;
        self.apply_filters();
    }

    fn matched_notes(&self, query: &str) -> Vec<NodeId> {
        let candidates = self
            .graph
            .notes()
            .map(|node| SearchCandidate {
                id: node.id,
                title: &node.title,
                path: &node.path,
            })
            .collect::<Vec<_>>();

        self.matcher
            .matches(query, &candidates)
            .into_iter()
            .filter(|&id| self.graph.node(id).is_some_and(Node::is_note))
            .collect()
    }

    pub fn apply_filters(&mut self) {
        let graph = &self.graph;
        let mut keep = vec![false; graph.node_count()];

        match self.filter.query() {
            None => keep.fill(true),
            Some(query) => {
                let matched = self.matched_notes(query);
                for id in &matched {
                    keep[id.0] = true;
                }

                match self.tag_text_policy {
                    TagTextPolicy::Always => {
                        for node in graph.nodes().iter().filter(|node| node.is_tag()) {
                            keep[node.id.0] = true;
                        }
                    }
                    TagTextPolicy::Connected => {
                        for &id in &matched {
                            for edge in graph.connected_edges(id) {
                                if let Some(edge) = graph.edge(edge)
                                    && edge.kind == EdgeKind::Tag
                                {
                                    keep[edge.target.0] = true;
                                }
                            }
                        }
                    }
                }
            }
        }

        if let Some(selected) = self.filter.selected_tags() {
            for node in graph.nodes() {
                if !keep[node.id.0] {
                    continue;
                }
                keep[node.id.0] = if node.is_tag() {
                    selected.contains(&node.path)
                } else {
                    node.tags.iter().any(|tag| selected.contains(tag))
                };
            }
        }

        if !self.filter.shows_tags() {
            for node in graph.nodes().iter().filter(|node| node.is_tag()) {
                keep[node.id.0] = false;
            }
        }

        let visible_nodes = graph
            .nodes()
            .iter()
            .filter(|node| keep[node.id.0])
            .map(|node| node.id)
            .collect::<Vec<_>>();
        let visible_edges = graph
            .edges()
            .iter()
            .filter(|edge| keep[edge.source.0] && keep[edge.target.0])
            .map(|edge| edge.id)
            .collect::<Vec<_>>();

        debug!(
            "filter applied: {}/{} nodes, {}/{} edges visible",
            visible_nodes.len(),
            graph.node_count(),
            visible_edges.len(),
            graph.edge_count()
        );

        self.visible_nodes = visible_nodes;
        self.visible_edges = visible_edges;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Nodes that pass the current filter, in insertion order.
    pub fn all_nodes(&self) -> Vec<&Node> {
        self.visible_nodes
            .iter()
            .filter_map(|&id| self.graph.node(id))
            .collect()
    }

    /// Edges whose two endpoints both pass the current filter.
    pub fn all_links(&self) -> Vec<&Edge> {
        self.visible_edges
            .iter()
            .filter_map(|&id| self.graph.edge(id))
            .collect()
    }

    pub fn visible_node_ids(&self) -> &[NodeId] {
        &self.visible_nodes
    }

    pub fn visible_edge_ids(&self) -> &[EdgeId] {
        &self.visible_edges
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.visible_nodes.binary_search(&id).is_ok()
    }

    pub fn notes(&self) -> impl Iterator<Item = &Node> {
        self.graph.notes()
    }

    pub fn tags(&self) -> &[TagMembers] {
        self.graph.tags()
    }

    pub fn find_node(&self, path: &str) -> Option<&Node> {
        self.graph.find_node(path)
    }

    pub fn connected_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.graph.connected_nodes(node)
    }

    pub fn connected_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.graph.connected_edges(node)
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.filter
            .selected_node
            .as_deref()
            .and_then(|path| self.graph.find_node(path))
    }

    pub fn export(&self) -> ExportedGraph<'_> {
        let links = self
            .all_links()
            .into_iter()
            .filter_map(|edge| {
                let source = self.graph.node(edge.source)?;
                let target = self.graph.node(edge.target)?;
                Some(ExportedEdge {
                    kind: edge.kind,
                    source: source.path.clone(),
                    target: target.path.clone(),
                })
            })
            .collect();

        ExportedGraph {
            filter: &self.filter,
            nodes: self.all_nodes(),
            links,
        }
    }
}

use std::fs;
use std::path::Path;

use zk_graph::config::{GraphConfig, TagTextPolicy};
use zk_graph::filter::{FilterUpdate, GraphView, SubstringMatcher};
use zk_graph::graph::{EdgeKind, NoteGraph};
use zk_graph::zk::{load_graph_file, parse_graph_output};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/graph.json");

fn fixture_graph(config: &GraphConfig) -> NoteGraph {
    let raw = load_graph_file(Path::new(FIXTURE)).expect("fixture parses");
    NoteGraph::build(raw, config).expect("fixture builds")
}

fn query(text: &str) -> FilterUpdate {
    FilterUpdate {
        filter_string: Some(text.to_owned()),
        ..FilterUpdate::default()
    }
}

#[test]
fn fixture_imports_notes_links_and_tags() {
    let graph = fixture_graph(&GraphConfig::default());

    assert_eq!(graph.links().count(), 2);
    assert_eq!(graph.notes().count(), 5);
    assert_eq!(graph.tags().len(), 13);
    assert_eq!(graph.find_notes_with_tag("os").len(), 5);
    assert_eq!(graph.find_notes_with_tag("virtualization").len(), 1);

    let stats = graph.stats();
    assert_eq!(stats.dropped_links, 1);
    assert_eq!(stats.tag_edges, 21);
    assert_eq!(graph.node_count(), 18);
    assert_eq!(graph.edge_count(), 23);
}

#[test]
fn fixture_degrees_match_references() {
    let graph = fixture_graph(&GraphConfig::default());

    let node = graph.find_node("h3manv25.md").expect("note exists");
    assert_eq!(node.out_degree, 2);
    assert_eq!(node.in_degree, 1);
    assert_eq!(node.radius, 18.0);

    let target = graph.find_node("zw0lj520.md").expect("note exists");
    assert_eq!((target.in_degree, target.out_degree), (1, 1));

    let os = graph.find_tag("os").expect("tag exists");
    assert_eq!(os.in_degree, 5);
    assert_eq!(os.radius, 42.0);
}

#[test]
fn tag_in_degree_equals_membership() {
    let graph = fixture_graph(&GraphConfig::default());
    for members in graph.tags() {
        let tag = graph.find_tag(&members.name).expect("tag node exists");
        assert_eq!(tag.in_degree, members.notes.len(), "{}", members.name);
        assert_eq!(
            graph.find_notes_with_tag(&members.name).len(),
            members.notes.len()
        );
    }
}

#[test]
fn no_edge_points_outside_the_graph() {
    let graph = fixture_graph(&GraphConfig::default());
    for edge in graph.edges() {
        let source = graph.node(edge.source).expect("source exists");
        let target = graph.node(edge.target).expect("target exists");
        assert!(source.is_note());
        match edge.kind {
            EdgeKind::Link => assert!(target.is_note()),
            EdgeKind::Tag => assert!(target.is_tag()),
        }
    }
}

#[test]
fn neighbours_cover_links_and_tags() {
    let graph = fixture_graph(&GraphConfig::default());
    let node = graph.find_node("h3manv25.md").expect("note exists");

    assert_eq!(graph.connected_edges(node.id).len(), 8);
    let neighbors = graph.connected_nodes(node.id);
    assert_eq!(neighbors.len(), 7);

    for neighbor in neighbors {
        assert!(graph.connected_nodes(neighbor).contains(&node.id));
        let shared = graph
            .connected_edges(neighbor)
            .into_iter()
            .filter(|edge| graph.connected_edges(node.id).contains(edge))
            .count();
        assert!(shared >= 1);
    }
}

#[test]
fn filter_round_trip_on_fixture() {
    let config = GraphConfig::default();
    let mut view = GraphView::with_matcher(
        fixture_graph(&config),
        &config,
        Box::new(SubstringMatcher),
    );
    let nodes = view.visible_node_ids().to_vec();
    let edges = view.visible_edge_ids().to_vec();
    assert_eq!(nodes.len(), 18);
    assert_eq!(edges.len(), 23);

    view.set_filter(query("virtual"));
    assert_eq!(view.all_nodes().len(), 2 + 13);
    assert_eq!(view.all_links().len(), 8);
    let links = view.all_links();
    assert!(links.iter().all(|edge| edge.kind == EdgeKind::Tag));

    view.set_filter(query(""));
    assert_eq!(view.visible_node_ids(), nodes.as_slice());
    assert_eq!(view.visible_edge_ids(), edges.as_slice());

    view.set_filter(FilterUpdate {
        tags: Some(vec!["virtualization".to_owned()]),
        ..FilterUpdate::default()
    });
    let paths = view
        .all_nodes()
        .into_iter()
        .map(|node| node.path.as_str())
        .collect::<Vec<_>>();
    assert_eq!(paths, ["h3manv25.md", "virtualization"]);
    assert_eq!(view.all_links().len(), 1);
}

#[test]
fn connected_tag_policy_on_fixture() {
    let config = GraphConfig {
        tag_text_policy: TagTextPolicy::Connected,
        ..GraphConfig::default()
    };
    let mut view = GraphView::with_matcher(
        fixture_graph(&config),
        &config,
        Box::new(SubstringMatcher),
    );

    view.set_filter(query("virtual"));
    assert_eq!(view.all_nodes().len(), 2 + 7);
    assert_eq!(view.all_links().len(), 8);
}

#[test]
fn fuzzy_query_on_fixture() {
    let config = GraphConfig::default();
    let mut view = GraphView::new(fixture_graph(&config), &config);

    view.set_filter(FilterUpdate {
        filter_string: Some("page table".to_owned()),
        show_tags: Some(false),
        ..FilterUpdate::default()
    });
    let titles = view
        .all_nodes()
        .into_iter()
        .map(|node| node.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Bits in page table entries"]);
    assert!(view.all_links().is_empty());
}

#[test]
fn opaque_fields_reach_the_node() {
    let graph = fixture_graph(&GraphConfig::default());
    let node = graph.find_node("68nms906.md").expect("note exists");
    assert_eq!(
        node.abs_path.as_deref(),
        Some("/Users/khadd/mynotes/68nms906.md")
    );
    assert_eq!(node.data["wordCount"], 258);
    assert_eq!(node.data["filenameStem"], "68nms906");
}

#[test]
fn fixture_text_and_file_loaders_agree() {
    let raw = fs::read_to_string(FIXTURE).expect("fixture readable");
    let parsed = parse_graph_output(&raw).expect("fixture parses");
    let loaded = load_graph_file(Path::new(FIXTURE)).expect("fixture loads");
    assert_eq!(parsed, loaded);
}

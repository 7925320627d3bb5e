mod open;
mod parse;
mod zk_cmd;

pub use open::open_file;
pub use parse::{RawGraph, RawLink, RawNote, TagSummary, parse_graph_output, parse_tag_catalog};
pub use zk_cmd::{fetch_graph, fetch_tag_catalog, load_graph_file, load_tag_catalog};

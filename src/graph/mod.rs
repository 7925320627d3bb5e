mod build;
mod query;
mod types;

pub use types::{
    Edge, EdgeId, EdgeKind, GraphStats, Node, NodeId, NodeKey, NodeKind, NoteGraph, TagMembers,
};

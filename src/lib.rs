pub mod config;
pub mod filter;
pub mod graph;
pub mod util;
pub mod zk;

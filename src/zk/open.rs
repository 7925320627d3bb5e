use std::process::Command;

use log::{info, warn};

/// Asks `program` to open `abs_path` and returns without waiting for it.
pub fn open_file(program: &str, abs_path: &str) {
    info!("opening {abs_path} with {program}");
    match Command::new(program).arg(abs_path).spawn() {
        Ok(child) => info!("spawned {program} (pid {})", child.id()),
        Err(error) => warn!("can't open {abs_path} with {program}: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_opener_is_not_fatal() {
        open_file("zk-graph-opener-that-does-not-exist", "/tmp/none.md");
    }
}

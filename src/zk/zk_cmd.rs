use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use log::debug;

use super::parse::{RawGraph, TagSummary, parse_graph_output, parse_tag_catalog};

fn run_zk(notebook: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut command = Command::new("zk");
    if let Some(notebook) = notebook {
        command.arg("--notebook-dir").arg(notebook);
    }
    command.args(args);
    debug!("running {command:?}");

    let output = command
        .output()
        .with_context(|| format!("failed to spawn zk with args: {args:?}"))?;

    if output.status.success() {
        String::from_utf8(output.stdout).context("zk output was not valid UTF-8")
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(anyhow!("zk command failed for args {args:?}: {stderr}"))
    }
}

pub fn fetch_graph(notebook: Option<&Path>) -> Result<RawGraph> {
    let raw = run_zk(notebook, &["graph", "--format", "json"])
        .context("failed to export the notebook graph")?;
    parse_graph_output(&raw).context("failed to parse zk graph output")
}

pub fn fetch_tag_catalog(notebook: Option<&Path>) -> Result<Vec<TagSummary>> {
    let raw = run_zk(notebook, &["tag", "list", "--format", "json"])
        .context("failed to list notebook tags")?;
    parse_tag_catalog(&raw)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read graph JSON from stdin")?;
        Ok(raw)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Loads a saved `zk graph --format json` export; `-` reads stdin.
pub fn load_graph_file(path: &Path) -> Result<RawGraph> {
    let raw = read_input(path)?;
    parse_graph_output(&raw)
        .with_context(|| format!("failed to parse graph export {}", path.display()))
}

pub fn load_tag_catalog(path: &Path) -> Result<Vec<TagSummary>> {
    let raw = read_input(path)?;
    parse_tag_catalog(&raw)
        .with_context(|| format!("failed to parse tag catalog {}", path.display()))
}

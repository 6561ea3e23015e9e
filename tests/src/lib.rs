//! Shared helpers for the cross-crate decoder tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hl7_ast::{Data, Message};

/// Directory holding the `.hl7` message fixtures.
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

pub fn fixture_path(name: &str) -> PathBuf {
    fixture_dir().join(name)
}

/// Reads a fixture file as raw bytes.
pub fn fixture(name: &str) -> io::Result<Vec<u8>> {
    fs::read(fixture_path(name))
}

/// Every `.hl7` fixture, sorted by file name.
pub fn all_fixtures() -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(fixture_dir())? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "hl7") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Visits every node of the message depth-first, parents before children.
pub fn walk<'a>(message: &'a Message, mut visit: impl FnMut(&'a Data, usize)) {
    fn go<'a>(node: &'a Data, depth: usize, visit: &mut impl FnMut(&'a Data, usize)) {
        visit(node, depth);
        for child in node.children() {
            go(child, depth + 1, visit);
        }
    }
    for segment in message {
        go(segment, 0, &mut visit);
    }
}

//! Test helpers for writing score requests to a scratch directory.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

/// Write `contents` to `path`, creating the file.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture");
}

/// A scratch directory holding score requests.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write_request(&self, name: &str, request: &Value) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_utf8(&path, request.to_string().as_bytes());
        path
    }
}

/// Configuration accepting up to `max_results` hits on a 4096 px canvas.
pub(super) fn scoring_config(max_results: usize) -> Value {
    json!({
        "weights": {"text": 1.0},
        "threshold_px": 10.0,
        "world_size": 4096.0,
        "max_results": max_results,
        "viewport": {"xmin": 0.0, "ymin": 0.0, "xmax": 4096.0, "ymax": 4096.0}
    })
}

/// Three hits a few metres apart in Manhattan plus one with a bad latitude.
pub(super) fn clustered_hits() -> Value {
    json!([
        {"id": "first", "lat": 40.7128, "lng": -74.0060, "attributes": {"text_relevance": 0.3}},
        {"id": "second", "lat": 40.7129, "lng": -74.0061, "attributes": {"text_relevance": 0.8}},
        {"id": "third", "lat": 40.7127, "lng": -74.0059, "attributes": {"text_relevance": 0.5}},
        {"id": "broken", "lat": 123.0, "lng": 0.0}
    ])
}

/// Parse bytes written by a command as JSON.
pub(super) fn parse_output(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("command output is JSON")
}

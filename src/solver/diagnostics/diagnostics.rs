//! Diagnostic snapshots of the LSQ precomputation.
//!
//! Snapshots are emitted only for nodes below a small index threshold.
//! They go to `tracing` at trace level and, when a path is configured, are
//! appended to a plain-text log file. Writing a snapshot never changes the
//! outcome of a computation; I/O failures are logged and swallowed.
//!
//! # Example
//!
//! ```ignore
//! use ncfv_rs::solver::DiagnosticLog;
//!
//! let log = DiagnosticLog::new().with_file("log/out.dat");
//! log.matrix(0, "a", &[[1.0, 0.0], [0.0, 1.0]]);
//! ```

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Nodes snapshotted by default: node 0 only.
pub const DEFAULT_NODE_THRESHOLD: usize = 1;

/// Diagnostic sink for per-node matrix snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticLog {
    /// Append-mode output file (None = tracing only)
    pub path: Option<PathBuf>,
    /// Nodes with index below this value are snapshotted
    pub node_threshold: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self {
            path: None,
            node_threshold: DEFAULT_NODE_THRESHOLD,
        }
    }
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that never snapshots.
    pub fn disabled() -> Self {
        Self {
            path: None,
            node_threshold: 0,
        }
    }

    /// Also append snapshots to `path`. Parent directories are created on demand.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_node_threshold(mut self, node_threshold: usize) -> Self {
        self.node_threshold = node_threshold;
        self
    }

    /// Whether node `i` is snapshotted.
    #[inline]
    pub fn wants(&self, i: usize) -> bool {
        i < self.node_threshold
    }

    /// Snapshot a dense matrix for node `i`.
    pub fn matrix<const N: usize>(&self, i: usize, label: &str, a: &[[f64; N]; N]) {
        if !self.wants(i) {
            return;
        }
        let text = format_matrix(label, a);
        tracing::trace!(node = i, "{text}");
        self.append(&text);
    }

    /// Snapshot free-form text for node `i`.
    pub fn note(&self, i: usize, text: &str) {
        if !self.wants(i) {
            return;
        }
        tracing::trace!(node = i, "{text}");
        self.append(text);
    }

    fn append(&self, text: &str) {
        if let Some(path) = &self.path {
            if let Err(err) = append_text(path, text) {
                tracing::warn!(path = %path.display(), error = %err, "failed to write diagnostic");
            }
        }
    }
}

fn append_text(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{text}")
}

/// Format a matrix as `label =` followed by one row per line.
pub fn format_matrix<const N: usize>(label: &str, a: &[[f64; N]; N]) -> String {
    let mut out = format!(" {label} =\n");
    for row in a {
        for v in row {
            let _ = write!(out, " {v:>14.6e}");
        }
        out.push('\n');
    }
    out
}

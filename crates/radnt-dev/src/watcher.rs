//! Poll-based file watching.
//!
//! Each tick walks the project, records modification times for files matching
//! the watch globs, and diffs against the previous snapshot. Changes are sent
//! on a broadcast channel so any number of subscribers can observe them.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::{broadcast, watch};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Kind of change observed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// A single file change, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: Utf8PathBuf,
    pub kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
}

/// Relative path to modification time
pub type Snapshot = BTreeMap<Utf8PathBuf, SystemTime>;

/// Watches a project directory by polling
#[derive(Debug, Clone)]
pub struct FileWatcher {
    root: Utf8PathBuf,
    include: Arc<GlobSet>,
    ignore: Arc<HashSet<String>>,
    interval: Duration,
}

impl FileWatcher {
    /// Create a watcher for `root`.
    ///
    /// `patterns` are globs relative to the root; any path with a component
    /// listed in `ignore` is skipped entirely.
    pub fn new<S: AsRef<str>>(
        root: impl Into<Utf8PathBuf>,
        patterns: &[S],
        ignore: &[S],
        interval: Duration,
    ) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
        }

        Ok(Self {
            root: root.into(),
            include: Arc::new(builder.build()?),
            ignore: Arc::new(ignore.iter().map(|s| s.as_ref().to_string()).collect()),
            interval,
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Walk the project and record watched files
    pub fn snapshot(&self) -> Snapshot {
        let mut files = Snapshot::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| self.ignore.contains(name))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    trace!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Ok(relative) = Utf8PathBuf::try_from(relative.to_path_buf()) else {
                continue;
            };
            if !self.include.is_match(relative.as_std_path()) {
                continue;
            }

            match entry.metadata().map(|m| m.modified()) {
                Ok(Ok(modified)) => {
                    files.insert(relative, modified);
                }
                _ => trace!("No modification time for {}", relative),
            }
        }

        files
    }

    /// Poll until `stop` flips to true, sending every change on `tx`
    pub async fn run(
        self,
        tx: broadcast::Sender<FileChange>,
        mut stop: watch::Receiver<bool>,
    ) -> Result<()> {
        let scanner = self.clone();
        let mut previous = tokio::task::spawn_blocking(move || scanner.snapshot()).await?;
        debug!("Watching {} files under {}", previous.len(), self.root);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let scanner = self.clone();
                    let scan = tokio::task::spawn_blocking(move || scanner.snapshot());
                    let current = match scan.await {
                        Ok(snapshot) => snapshot,
                        Err(e) => {
                            warn!("File scan failed: {}", e);
                            continue;
                        }
                    };

                    for change in diff(&previous, &current) {
                        trace!("{:?} {}", change.kind, change.path);
                        // no subscribers is fine
                        let _ = tx.send(change);
                    }
                    previous = current;
                }
            }
        }

        debug!("File watcher stopped");
        Ok(())
    }
}

/// Changes needed to get from `old` to `new`, sorted by path
pub fn diff(old: &Snapshot, new: &Snapshot) -> Vec<FileChange> {
    let timestamp = Utc::now();
    let mut changes = Vec::new();

    for (path, modified) in new {
        let kind = match old.get(path) {
            None => ChangeKind::Created,
            Some(previous) if previous != modified => ChangeKind::Modified,
            Some(_) => continue,
        };
        changes.push(FileChange {
            path: path.clone(),
            kind,
            timestamp,
        });
    }

    for path in old.keys().filter(|p| !new.contains_key(*p)) {
        changes.push(FileChange {
            path: path.clone(),
            kind: ChangeKind::Removed,
            timestamp,
        });
    }

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}

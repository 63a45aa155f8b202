//! Crash-resumable crawl progress.
//!
//! The checkpoint file holds the records collected so far, in the same shape
//! as the final corpus. It exists only while a crawl is in progress.

use crate::corpus;
use crate::error::{BoxscoreError, Result};
use crate::model::GameRecord;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-run crawl progress: targets still to try, records so far, attempts made.
#[derive(Debug, Default)]
pub struct CrawlState {
    pending: VecDeque<String>,
    records: Vec<GameRecord>,
    cursor: usize,
}

impl CrawlState {
    fn with_records(records: Vec<GameRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Queue `targets`, dropping ones already collected or listed in `skip`.
    pub fn plan<I>(&mut self, targets: I, skip: &HashSet<String>)
    where
        I: IntoIterator<Item = String>,
    {
        let done: HashSet<&str> = self.records.iter().map(|r| r.game_url.as_str()).collect();
        self.pending = targets
            .into_iter()
            .filter(|url| !done.contains(url.as_str()) && !skip.contains(url))
            .collect();
    }

    /// The target to attempt next.
    pub fn next_target(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    /// Mark the front target attempted, keeping its record if one was produced.
    fn advance(&mut self, record: Option<GameRecord>) {
        self.pending.pop_front();
        self.records.extend(record);
        self.cursor += 1;
    }

    /// Records collected so far, restored ones first.
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// Targets not yet attempted.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Attempts made in this run; restored records do not count.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Durable owner of one crawl's [`CrawlState`].
///
/// Exactly one crawl may hold a given checkpoint path at a time.
#[derive(Debug)]
pub struct Checkpoint {
    path: PathBuf,
    flush_cadence: usize,
    state: CrawlState,
}

impl Checkpoint {
    /// Resume from `path` if it holds a readable record list, else start empty.
    ///
    /// A corrupt file is logged and ignored; it will be overwritten by the
    /// first flush.
    pub fn open(path: impl Into<PathBuf>, flush_cadence: usize) -> Self {
        let path = path.into();
        let records = if path.exists() {
            match corpus::read_records(&path) {
                Ok(records) => {
                    info!(
                        "resuming with {} games from {}",
                        records.len(),
                        path.display()
                    );
                    records
                }
                Err(e) => {
                    warn!("ignoring unreadable checkpoint: {e}");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self {
            path,
            flush_cadence: flush_cadence.max(1),
            state: CrawlState::with_records(records),
        }
    }

    /// Checkpoint file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory progress.
    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// See [`CrawlState::plan`].
    pub fn plan<I>(&mut self, targets: I, skip: &HashSet<String>)
    where
        I: IntoIterator<Item = String>,
    {
        self.state.plan(targets, skip);
    }

    /// The target to attempt next.
    pub fn next_target(&self) -> Option<&str> {
        self.state.next_target()
    }

    /// Record the outcome of the current target and flush on cadence.
    ///
    /// Returns whether a flush happened.
    pub fn record_attempt(&mut self, record: Option<GameRecord>) -> Result<bool> {
        self.state.advance(record);
        if self.state.cursor % self.flush_cadence == 0 {
            self.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Write the current records to the checkpoint file.
    pub fn flush(&self) -> Result<()> {
        corpus::write_records(&self.path, &self.state.records)
    }

    /// Delete the checkpoint file; a missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BoxscoreError::io(&self.path, e)),
        }
    }

    /// Records collected so far.
    pub fn records(&self) -> &[GameRecord] {
        self.state.records()
    }
}

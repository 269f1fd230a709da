//! Best-kills leaderboard
//!
//! One entry per player name, kept sorted by kills (highest first).
//! Persisted through a [`ScoreStore`] with a full rewrite on every submit.

use serde::{Deserialize, Serialize};

use crate::consts::{NAME_MAX_LEN, SCORE_MAX};
use crate::persistence::{RECORD_SEPARATOR, ScoreRecord, ScoreStore, StoreError};

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub best_kills: u32,
}

/// Leaderboard keyed by player name
#[derive(Debug)]
pub struct ScoreLedger {
    entries: Vec<ScoreEntry>,
    store: Box<dyn ScoreStore>,
}

impl ScoreLedger {
    /// Create an empty ledger backed by `store` (nothing is read yet)
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        Self {
            entries: Vec::with_capacity(SCORE_MAX),
            store,
        }
    }

    /// Create a ledger and immediately load it from `store`
    pub fn open(store: Box<dyn ScoreStore>) -> Self {
        let mut ledger = Self::new(store);
        ledger.load();
        ledger
    }

    /// Replace the in-memory entries with the store's contents.
    ///
    /// Duplicate names keep the larger count, entries past capacity are
    /// dropped, and a missing or unreadable store yields an empty ledger.
    pub fn load(&mut self) {
        self.entries.clear();

        let records = match self.store.load() {
            Ok(records) => records,
            Err(StoreError::NotFound(path)) => {
                log::info!("No score file at {}, starting fresh", path.display());
                return;
            }
            Err(e) => {
                log::warn!("Could not read scores: {e}");
                return;
            }
        };

        for record in records {
            let name = clean_name(&record.name);
            match self.position(&name) {
                Some(i) => {
                    let entry = &mut self.entries[i];
                    entry.best_kills = entry.best_kills.max(record.kills);
                }
                None if self.entries.len() < SCORE_MAX => self.entries.push(ScoreEntry {
                    name,
                    best_kills: record.kills,
                }),
                None => {}
            }
        }

        self.sort();
        log::info!("Loaded {} scores", self.entries.len());
    }

    /// Record a finished run. Keeps the better of the old and new count,
    /// re-sorts and persists. Returns false if the name is empty once
    /// record separators are dropped.
    pub fn submit(&mut self, name: &str, kills: u32) -> bool {
        let name = clean_name(name);
        if name.is_empty() {
            return false;
        }

        match self.position(&name) {
            Some(i) => {
                let entry = &mut self.entries[i];
                entry.best_kills = entry.best_kills.max(kills);
            }
            None if self.entries.len() < SCORE_MAX => self.entries.push(ScoreEntry {
                name,
                best_kills: kills,
            }),
            None => log::debug!("Leaderboard full, {name} not added"),
        }

        self.sort();
        self.save();
        true
    }

    /// Best kill count recorded for `name`, or 0
    pub fn best_for(&self, name: &str) -> u32 {
        self.position(&clean_name(name))
            .map(|i| self.entries[i].best_kills)
            .unwrap_or(0)
    }

    /// Write all entries to the store. Failures are logged, not returned.
    pub fn save(&mut self) {
        let records: Vec<ScoreRecord> = self
            .entries
            .iter()
            .map(|e| ScoreRecord::new(e.name.clone(), e.best_kills))
            .collect();

        match self.store.save(&records) {
            Ok(()) => log::info!("Scores saved ({} entries)", records.len()),
            Err(e) => log::warn!("Could not save scores: {e}"),
        }
    }

    /// All entries, highest first
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// The first `n` entries
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Stable sort, highest kills first
    fn sort(&mut self) {
        self.entries.sort_by(|a, b| b.best_kills.cmp(&a.best_kills));
    }
}

/// Characters allowed in a player name: printable ASCII minus the record
/// separator
pub fn is_name_char(c: char) -> bool {
    (' '..='~').contains(&c) && c != RECORD_SEPARATOR
}

/// Names are bounded the same way the name-entry buffer is and never carry
/// the record separator
fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|&c| c != RECORD_SEPARATOR)
        .take(NAME_MAX_LEN)
        .collect()
}

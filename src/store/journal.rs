//! Durable sled-backed dispatch journal: one entry per submission.

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};

const TREE_JOURNAL: &str = "journal";

/// Default number of entries kept by [`Journal::prune`].
pub const DEFAULT_MAX_ENTRIES: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub submitted_at: DateTime<Utc>,
    pub input: String,
    /// `sent`, `blocked`, `prompt`, `rejected`, or `failed`
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Clone)]
pub struct Journal {
    db: Db,
    entries: Tree,
}

impl Journal {
    pub fn new(db: Db) -> Result<Self, StorageError> {
        let entries = db.open_tree(TREE_JOURNAL)?;
        Ok(Self { db, entries })
    }

    /// Append an entry, assigning its id. Ids increase monotonically.
    pub fn append(
        &self,
        input: &str,
        outcome: &str,
        command: Option<String>,
        detail: Option<String>,
    ) -> Result<JournalEntry, StorageError> {
        let id = self.db.generate_id()?;
        let entry = JournalEntry {
            id,
            submitted_at: Utc::now(),
            input: input.to_string(),
            outcome: outcome.to_string(),
            command,
            detail,
        };
        let value = serde_json::to_vec(&entry)
            .map_err(|e| StorageError::Corrupt(format!("journal entry: {}", e)))?;
        self.entries.insert(id.to_be_bytes(), value)?;
        Ok(entry)
    }

    /// Newest entries first, at most `limit`.
    pub fn recent(&self, limit: usize) -> Result<Vec<JournalEntry>, StorageError> {
        let mut out = Vec::new();
        for result in self.entries.iter().rev().take(limit) {
            let (_, value) = result?;
            let entry: JournalEntry = serde_json::from_slice(&value)
                .map_err(|e| StorageError::Corrupt(format!("journal entry: {}", e)))?;
            out.push(entry);
        }
        Ok(out)
    }

    /// Drop the oldest entries beyond `max_entries`. Returns how many were removed.
    pub fn prune(&self, max_entries: usize) -> Result<usize, StorageError> {
        let excess = self.entries.len().saturating_sub(max_entries);
        if excess == 0 {
            return Ok(0);
        }
        let keys: Vec<sled::IVec> = self
            .entries
            .iter()
            .keys()
            .take(excess)
            .collect::<Result<_, _>>()?;
        for key in &keys {
            self.entries.remove(key)?;
        }
        Ok(keys.len())
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.entries.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn journal(temp_dir: &TempDir) -> Journal {
        let db = sled::open(temp_dir.path().join("db")).unwrap();
        Journal::new(db).unwrap()
    }

    #[test]
    fn test_recent_is_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        journal.append("history", "sent", Some("cortex history".to_string()), None).unwrap();
        journal.append("rollback ../x", "rejected", None, Some("bad id".to_string())).unwrap();

        let entries = journal.recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].outcome, "rejected");
        assert_eq!(entries[1].command.as_deref(), Some("cortex history"));
        assert!(entries[0].id > entries[1].id);

        assert_eq!(journal.recent(1).unwrap().len(), 1);
    }

    #[test]
    fn test_prune_keeps_newest() {
        let temp_dir = TempDir::new().unwrap();
        let journal = journal(&temp_dir);
        for i in 0..5 {
            journal.append(&format!("req {}", i), "sent", None, None).unwrap();
        }
        assert_eq!(journal.prune(2).unwrap(), 3);
        assert_eq!(journal.recent(usize::MAX).unwrap().len(), 2);
        let inputs: Vec<String> = journal.recent(10).unwrap().into_iter().map(|e| e.input).collect();
        assert_eq!(inputs, vec!["req 4".to_string(), "req 3".to_string()]);
        assert_eq!(journal.prune(2).unwrap(), 0);
    }
}

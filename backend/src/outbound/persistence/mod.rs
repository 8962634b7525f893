//! File-backed RSVP store.
//!
//! The whole keyed table is rewritten on every accepted submission, which
//! is fine at guest-list scale and keeps the format trivially inspectable.
//! Durability relies on writing a temporary file in the same directory and
//! atomically renaming it over the target, so a crash mid-write can never
//! corrupt the previously durable table.
//!
//! One mutex guards both the in-memory table and the durable write. The
//! write happens before the in-memory commit, so a failed write leaves the
//! store exactly as it was and the caller can safely retry.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::{fs, io};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::{ConflictError, Error, PersistenceError, RsvpRecord, RsvpStore};

/// On-disk row: one accepted RSVP keyed by its guest code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntry {
    code: String,
    rsvp: RsvpRecord,
}

/// [`RsvpStore`] backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileRsvpStore {
    path: PathBuf,
    table: Mutex<HashMap<String, RsvpRecord>>,
}

impl JsonFileRsvpStore {
    /// Open the store, loading any existing table.
    ///
    /// A missing file is an empty table; a present but unreadable or
    /// malformed file is an error, because silently starting empty would
    /// discard guests' answers on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::ReadFailed`] when the file exists but
    /// cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(contents) => {
                let entries: Vec<StoredEntry> =
                    serde_json::from_str(&contents).map_err(|err| {
                        PersistenceError::ReadFailed {
                            message: format!("{}: {err}", path.display()),
                        }
                    })?;
                let table: HashMap<String, RsvpRecord> = entries
                    .into_iter()
                    .map(|entry| (entry.code, entry.rsvp))
                    .collect();
                info!(path = %path.display(), records = table.len(), "RSVP table loaded");
                table
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no RSVP table yet, starting empty");
                HashMap::new()
            }
            Err(err) => {
                return Err(PersistenceError::ReadFailed {
                    message: format!("{}: {err}", path.display()),
                });
            }
        };
        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RsvpRecord>> {
        // A poisoned lock only means another thread panicked mid-read; the
        // table itself is only replaced wholesale after a durable write.
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialise `table` and atomically replace the backing file.
    fn persist(&self, table: &HashMap<String, RsvpRecord>) -> Result<(), PersistenceError> {
        let mut entries: Vec<StoredEntry> = table
            .iter()
            .map(|(code, rsvp)| StoredEntry {
                code: code.clone(),
                rsvp: rsvp.clone(),
            })
            .collect();
        // Stable output makes the file diffable between writes.
        entries.sort_by(|a, b| a.code.cmp(&b.code));

        let json = serde_json::to_string_pretty(&entries).map_err(|err| {
            PersistenceError::WriteFailed {
                message: format!("could not serialise RSVP table: {err}"),
            }
        })?;

        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        self.write_atomic(dir, json.as_bytes())
            .map_err(|err| PersistenceError::WriteFailed {
                message: format!("{}: {err}", self.path.display()),
            })
    }

    fn write_atomic(&self, dir: &Path, contents: &[u8]) -> io::Result<()> {
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

#[async_trait]
impl RsvpStore for JsonFileRsvpStore {
    async fn record_if_absent(&self, code: &str, record: RsvpRecord) -> Result<(), Error> {
        let mut table = self.lock();
        if table.contains_key(code) {
            return Err(ConflictError::AlreadyRecorded.into());
        }

        // Write the candidate table first and only commit it to memory on
        // success, so a failed write leaves no phantom record.
        let mut candidate = table.clone();
        candidate.insert(code.to_owned(), record);
        self.persist(&candidate)?;
        *table = candidate;
        Ok(())
    }

    async fn get(&self, code: &str) -> Option<RsvpRecord> {
        self.lock().get(code).cloned()
    }
}

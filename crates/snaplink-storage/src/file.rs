use crate::table::Table;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use snaplink_core::repository::{ReadRepository, Repository, Result};
use snaplink_core::{ShortCode, StorageError, UrlRecord};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// JSON snapshot implementation of the repository contract.
///
/// The whole mapping lives in memory and is written back in full by
/// [`Repository::save`]. The snapshot is a single JSON object keyed by short
/// code, in insertion order. Writes go to a sibling `.tmp` file first and are
/// renamed over the snapshot, so a crash mid-write leaves the previous
/// snapshot intact.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    table: RwLock<Table>,
    // Entries that failed to decode on load, written back verbatim.
    unreadable: Vec<(String, Value)>,
    // Held across snapshot + write so concurrent saves land in order.
    persist: Mutex<()>,
}

impl FileRepository {
    /// Loads the snapshot at `path`.
    ///
    /// A missing or unreadable file, or one that is not a JSON object, yields
    /// an empty repository. Entries that fail to decode are hidden from reads
    /// but kept in the snapshot on every save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let Snapshot {
            records,
            unreadable,
        } = read_snapshot(&path);
        info!(
            path = %path.display(),
            count = records.len(),
            unreadable = unreadable.len(),
            "loaded url snapshot"
        );

        Self {
            path,
            table: RwLock::new(Table::from_records(records)),
            unreadable,
            persist: Mutex::new(()),
        }
    }

    /// Returns the snapshot location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot_json(&self) -> Result<String> {
        let table = self.table.read();
        let mut object = Map::with_capacity(table.len());
        for record in table.ordered() {
            let value = serde_json::to_value(record)
                .map_err(|e| StorageError::InvalidData(e.to_string()))?;
            object.insert(record.short_code.to_string(), value);
        }
        for (key, value) in &self.unreadable {
            if !table.contains(key) {
                object.insert(key.clone(), value.clone());
            }
        }
        serde_json::to_string_pretty(&Value::Object(object))
            .map_err(|e| StorageError::InvalidData(e.to_string()))
    }
}

#[derive(Default)]
struct Snapshot {
    records: Vec<UrlRecord>,
    unreadable: Vec<(String, Value)>,
}

fn read_snapshot(path: &Path) -> Snapshot {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "url snapshot not found, starting empty");
            return Snapshot::default();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read url snapshot, starting empty");
            return Snapshot::default();
        }
    };

    let object = match serde_json::from_str::<Map<String, Value>>(&content) {
        Ok(object) => object,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse url snapshot, starting empty");
            return Snapshot::default();
        }
    };

    let mut snapshot = Snapshot::default();
    for (code, value) in object {
        match serde_json::from_value::<UrlRecord>(value.clone()) {
            Ok(record) if record.short_code.as_str() == code => snapshot.records.push(record),
            Ok(record) => {
                warn!(
                    key = %code,
                    short_code = %record.short_code,
                    "snapshot key does not match record short code, keeping it unread"
                );
                snapshot.unreadable.push((code, value));
            }
            Err(e) => {
                warn!(key = %code, error = %e, "malformed snapshot entry, keeping it unread");
                snapshot.unreadable.push((code, value));
            }
        }
    }
    snapshot
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write to a temp file, then rename over the target.
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = temp_path(path);
    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

#[async_trait]
impl ReadRepository for FileRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.table.read().get(code.as_str()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.table.read().contains(code.as_str()))
    }

    async fn all(&self) -> Result<Vec<UrlRecord>> {
        Ok(self.table.read().ordered().into_iter().cloned().collect())
    }
}

#[async_trait]
impl Repository for FileRepository {
    async fn put(&self, record: UrlRecord) -> Result<()> {
        self.table.write().put(record);
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.table.write().remove(code.as_str()))
    }

    async fn save(&self) -> Result<()> {
        let _guard = self.persist.lock();
        let json = self.snapshot_json()?;
        write_atomic(&self.path, &json).map_err(|e| {
            StorageError::Io(format!("failed to write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), "saved url snapshot");
        Ok(())
    }
}

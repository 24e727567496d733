use snaplink_core::UrlRecord;
use std::collections::HashMap;

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct Entry {
    /// Insertion sequence number; survives replacement of the record.
    seq: u64,
    record: UrlRecord,
}

/// Insertion-ordered map of short code to record.
#[derive(Debug, Default)]
pub(crate) struct Table {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

impl Table {
    pub(crate) fn from_records(records: impl IntoIterator<Item = UrlRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.put(record);
        }
        table
    }

    pub(crate) fn get(&self, code: &str) -> Option<UrlRecord> {
        self.entries.get(code).map(|entry| entry.record.clone())
    }

    pub(crate) fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub(crate) fn put(&mut self, record: UrlRecord) {
        let key = record.short_code.as_str().to_owned();
        match self.entries.get_mut(&key) {
            Some(entry) => entry.record = record,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(key, Entry { seq, record });
            }
        }
    }

    pub(crate) fn remove(&mut self, code: &str) -> bool {
        self.entries.remove(code).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Records ordered by insertion.
    pub(crate) fn ordered(&self) -> Vec<&UrlRecord> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_unstable_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| &entry.record).collect()
    }
}

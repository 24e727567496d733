use crate::table::Table;
use async_trait::async_trait;
use parking_lot::RwLock;
use snaplink_core::repository::{ReadRepository, Repository, Result};
use snaplink_core::{ShortCode, UrlRecord};

/// In-memory implementation of the Repository trait.
///
/// Nothing is persisted; [`Repository::save`] always succeeds. Useful for
/// tests and throwaway instances.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    table: RwLock<Table>,
}

impl InMemoryRepository {
    /// Creates a new, empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `records`, in order.
    pub fn with_records(records: impl IntoIterator<Item = UrlRecord>) -> Self {
        Self {
            table: RwLock::new(Table::from_records(records)),
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
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
impl Repository for InMemoryRepository {
    async fn put(&self, record: UrlRecord) -> Result<()> {
        self.table.write().put(record);
        Ok(())
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.table.write().remove(code.as_str()))
    }

    async fn save(&self) -> Result<()> {
        Ok(())
    }
}

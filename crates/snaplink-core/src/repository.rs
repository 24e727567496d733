use crate::error::StorageError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// Reads never filter expired records; expiry is the engine's concern.
/// Every read returns an owned snapshot of the stored value.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Checks whether a short code already exists in the repository.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Returns every record in insertion order.
    async fn all(&self) -> Result<Vec<UrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores `record` under its short code, replacing any previous record
    /// with that code. A replaced record keeps its insertion position.
    async fn put(&self, record: UrlRecord) -> Result<()>;

    /// Deletes the URL record for a given short code.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;

    /// Persists the whole mapping. Backends without durable storage
    /// succeed without doing anything.
    async fn save(&self) -> Result<()>;
}

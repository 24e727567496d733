use crate::error::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::Serialize;
use snaplink_core::{FileType, UrlInfo, UrlRecord};
use typed_builder::TypedBuilder;

/// Input of a create operation. Only `long_url` is required.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct CreateParams {
    /// The URL to shorten. Surrounding whitespace is ignored.
    #[builder(setter(into))]
    pub long_url: String,
    /// Use exactly this code instead of deriving one.
    #[builder(default, setter(into, strip_option))]
    pub custom_alias: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub description: Option<String>,
    #[builder(default, setter(strip_option))]
    pub expiry_at: Option<Timestamp>,
    /// Plaintext password gating resolution. Empty means none.
    #[builder(default, setter(into, strip_option))]
    pub password: Option<String>,
}

impl CreateParams {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self::builder().long_url(long_url).build()
    }
}

/// A freshly stored record together with its composed short URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    pub short_url: String,
    pub record: UrlRecord,
}

/// Where a successful resolution sends the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub long_url: String,
    pub file_type: FileType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage {
    pub urls: Vec<UrlInfo>,
    /// Number of records before pagination.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total_urls: usize,
    pub total_clicks: u64,
    /// Records created within the configured recent window.
    pub recent_urls: usize,
    /// Records that are not expired now.
    pub active_urls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub html: String,
    pub short_url: String,
    pub file_type: FileType,
}

/// The URL mapping engine as seen by its callers.
///
/// Short codes are taken as plain strings; a string that is not a valid
/// short code is simply not found.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates and stores a new mapping.
    async fn create(&self, params: CreateParams) -> Result<Created>;

    /// Shortens each URL with default options. One result per input, in
    /// input order; a failure does not stop the remaining URLs.
    async fn bulk_create(&self, urls: Vec<String>) -> Vec<Result<Created>>;

    /// Passes the expiry and password gates, counts the click and returns
    /// the target.
    async fn resolve(&self, code: &str, password: Option<&str>) -> Result<Resolved>;

    /// Public view of a live record, without counting a click.
    async fn info(&self, code: &str) -> Result<UrlInfo>;

    /// Removes a record, expired or not.
    async fn delete(&self, code: &str) -> Result<()>;

    /// Every record, expired included, newest first.
    async fn list(&self, limit: Option<usize>, offset: usize) -> Result<ListPage>;

    /// The newest records, `limit` defaulting to the configured count.
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<UrlInfo>>;

    async fn stats(&self) -> Result<Stats>;

    /// HTML snippet for embedding a live record.
    async fn render_embed(&self, code: &str) -> Result<Embed>;
}

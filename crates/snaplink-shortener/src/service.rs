use crate::config::ShortenerConfig;
use crate::embed;
use crate::error::{Result, ShortenerError};
use crate::password;
use crate::shortener::{CreateParams, Created, Embed, ListPage, Resolved, Shortener, Stats};
use async_trait::async_trait;
use jiff::Timestamp;
use snaplink_core::{
    classifier, Clock, Repository, ShortCode, SystemClock, UrlInfo, UrlRecord,
};
use snaplink_generator::{AliasGenerator, Generator, RandomGenerator};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

const DEFAULT_DESCRIPTION: &str = "Link";

/// The concrete mapping engine.
///
/// This service wraps a `Repository`, an `AliasGenerator` and a `Clock` to
/// handle:
/// - URL validation and alias assignment
/// - Expiry and password gating on reads
/// - Click tracking and persistence
///
/// Mutations run one at a time under an internal mutex so alias probing and
/// the following store write see the same state. Reads go straight to the
/// repository.
pub struct ShortenerService<R, G = RandomGenerator, C = SystemClock> {
    repository: Arc<R>,
    aliases: AliasGenerator<G>,
    clock: C,
    config: ShortenerConfig,
    write_lock: Mutex<()>,
}

impl<R: Repository> ShortenerService<R> {
    /// Creates a service with random codes of the configured length and the
    /// system clock.
    pub fn new(repository: R, config: ShortenerConfig) -> Self {
        let generator = RandomGenerator::new(config.code_length);
        Self::with_parts(Arc::new(repository), generator, SystemClock, config)
    }
}

impl<R: Repository, G: Generator, C: Clock> ShortenerService<R, G, C> {
    pub fn with_parts(repository: Arc<R>, generator: G, clock: C, config: ShortenerConfig) -> Self {
        Self {
            repository,
            aliases: AliasGenerator::new(generator),
            clock,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ShortenerConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Trims `url` and checks that it is an absolute http(s) URL with a host.
    fn validate_url(url: &str) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        let parsed =
            Url::parse(url).map_err(|e| ShortenerError::InvalidUrl(format!("{url}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host: {url}"
            )));
        }

        Ok(url.to_string())
    }

    /// Fetches a record that is present and not expired at `now`.
    async fn live_record(&self, code: &str, now: Timestamp) -> Result<UrlRecord> {
        let not_found = || ShortenerError::NotFound(code.to_string());
        let short_code = ShortCode::from_stored(code).map_err(|_| not_found())?;

        let record = self
            .repository
            .get(&short_code)
            .await?
            .ok_or_else(not_found)?;

        if record.is_expired(now) {
            debug!(code = %code, "short url has expired");
            return Err(ShortenerError::Expired(code.to_string()));
        }
        Ok(record)
    }

    async fn taken_codes(&self) -> Result<HashSet<String>> {
        Ok(self
            .repository
            .all()
            .await?
            .into_iter()
            .map(|record| record.short_code.into())
            .collect())
    }

    /// Writes the snapshot. Failures are logged and swallowed so the
    /// in-memory effect of the mutation stands.
    async fn persist(&self) {
        if let Err(e) = self.repository.save().await {
            error!(error = %e, "failed to persist url snapshot");
        }
    }

    /// All records, newest first. Records sharing a creation time keep the
    /// later-inserted one first.
    async fn newest_first(&self) -> Result<Vec<UrlRecord>> {
        let mut records = self.repository.all().await?;
        records.reverse();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[async_trait]
impl<R: Repository, G: Generator, C: Clock> Shortener for ShortenerService<R, G, C> {
    #[instrument(skip_all, fields(long_url = %params.long_url))]
    async fn create(&self, params: CreateParams) -> Result<Created> {
        let long_url = Self::validate_url(&params.long_url)?;

        // Hashed before taking the write lock.
        let password_hash = password::hash_optional(params.password.as_deref()).map_err(|e| {
            error!(error = %e, "failed to hash password");
            ShortenerError::StorageIo(e.to_string())
        })?;

        let _guard = self.write_lock.lock().await;

        let taken = self.taken_codes().await?;
        let is_taken = |code: &str| taken.contains(code);
        // An empty alias, as sent by blank form fields, means none.
        let custom_alias = params.custom_alias.as_deref().filter(|alias| !alias.is_empty());
        let short_code = match custom_alias {
            Some(alias) => self.aliases.custom(alias, is_taken)?,
            None if self.config.smart_alias => self.aliases.smart(&long_url, is_taken),
            None => self.aliases.random(is_taken),
        };

        let description = params
            .description
            .filter(|description| !description.trim().is_empty())
            .or_else(|| classifier::extract_filename(&long_url))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let record = UrlRecord {
            short_code: short_code.clone(),
            created_at: self.clock.now(),
            description,
            clicks: 0,
            is_supabase: classifier::is_storage_provider_url(&long_url),
            file_type: classifier::file_type(&long_url),
            domain: classifier::domain(&long_url),
            expiry_at: params.expiry_at,
            password_hash,
            last_accessed_at: None,
            long_url,
        };

        self.repository.put(record.clone()).await?;
        self.persist().await;

        info!(code = %short_code, protected = record.has_password(), "created short url");
        Ok(Created {
            short_url: short_code.to_url(self.config.base_url()),
            record,
        })
    }

    async fn bulk_create(&self, urls: Vec<String>) -> Vec<Result<Created>> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            let result = self.create(CreateParams::new(url)).await;
            if let Err(e) = &result {
                warn!(error = %e, "bulk create entry failed");
            }
            results.push(result);
        }
        results
    }

    #[instrument(skip(self, password))]
    async fn resolve(&self, code: &str, password: Option<&str>) -> Result<Resolved> {
        let _guard = self.write_lock.lock().await;

        let now = self.clock.now();
        let mut record = self.live_record(code, now).await?;

        if let Some(hash) = record.password_hash.as_deref().filter(|h| !h.is_empty()) {
            let password = password
                .filter(|p| !p.is_empty())
                .ok_or(ShortenerError::PasswordRequired)?;
            if !password::verify(password, hash) {
                debug!(code = %code, "password rejected");
                return Err(ShortenerError::InvalidPassword);
            }
        }

        record.clicks += 1;
        record.last_accessed_at = Some(now);
        let resolved = Resolved {
            long_url: record.long_url.clone(),
            file_type: record.file_type,
        };

        self.repository.put(record).await?;
        self.persist().await;

        Ok(resolved)
    }

    async fn info(&self, code: &str) -> Result<UrlInfo> {
        let record = self.live_record(code, self.clock.now()).await?;
        Ok(record.to_info(self.config.base_url()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, code: &str) -> Result<()> {
        let not_found = || ShortenerError::NotFound(code.to_string());
        let short_code = ShortCode::from_stored(code).map_err(|_| not_found())?;

        let _guard = self.write_lock.lock().await;

        if !self.repository.delete(&short_code).await? {
            return Err(not_found());
        }
        self.persist().await;

        info!(code = %code, "deleted short url");
        Ok(())
    }

    async fn list(&self, limit: Option<usize>, offset: usize) -> Result<ListPage> {
        let records = self.newest_first().await?;
        let total = records.len();
        let base_url = self.config.base_url();

        let urls = records
            .iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .map(|record| record.to_info(base_url))
            .collect();

        Ok(ListPage { urls, total })
    }

    async fn recent(&self, limit: Option<usize>) -> Result<Vec<UrlInfo>> {
        let limit = limit.unwrap_or(self.config.recent_limit);
        Ok(self.list(Some(limit), 0).await?.urls)
    }

    async fn stats(&self) -> Result<Stats> {
        let records = self.repository.all().await?;
        let now = self.clock.now();
        let recent_since = now
            .checked_sub(self.config.recent_window)
            .unwrap_or(Timestamp::MIN);

        Ok(records.iter().fold(Stats::default(), |mut stats, record| {
            stats.total_urls += 1;
            stats.total_clicks += record.clicks;
            if record.created_at > recent_since {
                stats.recent_urls += 1;
            }
            if !record.is_expired(now) {
                stats.active_urls += 1;
            }
            stats
        }))
    }

    async fn render_embed(&self, code: &str) -> Result<Embed> {
        let record = self.live_record(code, self.clock.now()).await?;
        let short_url = record.short_code.to_url(self.config.base_url());

        Ok(Embed {
            html: embed::snippet(&short_url, record.file_type, &record.description),
            short_url,
            file_type: record.file_type,
        })
    }
}

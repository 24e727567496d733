use crate::{Generator, RandomGenerator};
use snaplink_core::classifier::{self, UNKNOWN_DOMAIN};
use snaplink_core::shortcode::MAX_LENGTH;
use snaplink_core::ShortCode;
use thiserror::Error;
use tracing::{debug, trace};

/// Random re-rolls attempted before falling back to suffix probing.
const MAX_RANDOM_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AliasError {
    #[error("invalid alias: {0}")]
    Invalid(String),
    #[error("alias already exists: {0}")]
    Taken(String),
}

/// Decides the short code a new record is stored under.
///
/// Every method takes an `is_taken` predicate over the current store
/// contents; the returned code is always one for which it returned `false`.
#[derive(Debug, Clone)]
pub struct AliasGenerator<G = RandomGenerator> {
    generator: G,
}

impl<G: Generator> AliasGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Validates a caller supplied alias. Taken aliases are rejected, never
    /// suffixed.
    pub fn custom(
        &self,
        alias: &str,
        is_taken: impl Fn(&str) -> bool,
    ) -> Result<ShortCode, AliasError> {
        let alias = alias.trim();
        let code = ShortCode::new(alias).map_err(|e| AliasError::Invalid(e.to_string()))?;

        if is_taken(code.as_str()) {
            return Err(AliasError::Taken(code.to_string()));
        }
        Ok(code)
    }

    /// Derives a readable alias from `url`, falling back to a random code.
    pub fn smart(&self, url: &str, is_taken: impl Fn(&str) -> bool) -> ShortCode {
        match smart_base(url) {
            Some(base) => {
                trace!(base = %base, "derived smart alias base");
                probe(&base, is_taken)
            }
            None => {
                debug!(url = %url, "no usable name in url, using random alias");
                self.random(is_taken)
            }
        }
    }

    /// Draws codes from the generator until one is free.
    pub fn random(&self, is_taken: impl Fn(&str) -> bool) -> ShortCode {
        let mut candidate: ShortCode = self.generator.generate().into();
        for _ in 1..MAX_RANDOM_ATTEMPTS {
            if !is_taken(candidate.as_str()) {
                return candidate;
            }
            candidate = self.generator.generate().into();
        }
        if !is_taken(candidate.as_str()) {
            return candidate;
        }

        debug!(candidate = %candidate, "random space crowded, probing suffixes");
        probe(candidate.as_str(), is_taken)
    }
}

impl Default for AliasGenerator<RandomGenerator> {
    fn default() -> Self {
        Self::new(RandomGenerator::default())
    }
}

/// The alias a URL would get before collision handling: the cleaned
/// filename, else the host with dots as hyphens and no leading `www-`.
/// Truncated to the maximum code length.
pub fn smart_base(url: &str) -> Option<String> {
    let base = classifier::extract_filename(url).or_else(|| {
        let domain = classifier::domain(url);
        if domain == UNKNOWN_DOMAIN {
            return None;
        }
        let dashed = domain.replace('.', "-");
        let dashed = dashed.strip_prefix("www-").unwrap_or(&dashed);
        let clean: String = dashed.chars().filter(|c| ShortCode::is_valid_char(*c)).collect();
        (!clean.is_empty()).then_some(clean)
    })?;

    // Only ASCII survives cleaning, so byte truncation is safe.
    Some(base[..base.len().min(MAX_LENGTH)].to_string())
}

/// Returns `base` if free, else the first free `base-N` for N = 1, 2, ...
///
/// The base is shortened as needed so the suffixed code stays within the
/// maximum length.
fn probe(base: &str, is_taken: impl Fn(&str) -> bool) -> ShortCode {
    if !is_taken(base) {
        return ShortCode::new_unchecked(base);
    }

    let mut counter: u64 = 1;
    loop {
        let suffix = format!("-{counter}");
        let keep = base.len().min(MAX_LENGTH.saturating_sub(suffix.len()));
        let candidate = format!("{}{}", &base[..keep], suffix);
        if !is_taken(&candidate) {
            return ShortCode::new_unchecked(candidate);
        }
        counter += 1;
    }
}

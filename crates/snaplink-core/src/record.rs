use crate::classifier::{FileType, UNKNOWN_DOMAIN};
use crate::shortcode::ShortCode;
use crate::timestamp;
use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

/// A stored URL record in the repository.
///
/// Field names on disk follow the snapshot format (`expiry_date`,
/// `last_accessed`), everything else maps one to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL that was shortened.
    pub long_url: String,
    #[serde(deserialize_with = "stored_short_code")]
    pub short_code: ShortCode,
    #[serde(with = "timestamp")]
    pub created_at: Timestamp,
    #[serde(default = "default_description", deserialize_with = "nullable_description")]
    pub description: String,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub is_supabase: bool,
    #[serde(default)]
    pub file_type: FileType,
    #[serde(default = "default_domain")]
    pub domain: String,
    /// When the record expires, if ever.
    #[serde(rename = "expiry_date", with = "timestamp::option", default)]
    pub expiry_at: Option<Timestamp>,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(rename = "last_accessed", with = "timestamp::option", default)]
    pub last_accessed_at: Option<Timestamp>,
}

fn default_description() -> String {
    "Link".to_string()
}

fn nullable_description<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_description))
}

fn stored_short_code<'de, D>(deserializer: D) -> Result<ShortCode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    ShortCode::from_stored(raw).map_err(serde::de::Error::custom)
}

fn default_domain() -> String {
    UNKNOWN_DOMAIN.to_string()
}

impl UrlRecord {
    /// A record is expired once `now` is strictly past its expiry.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiry_at.is_some_and(|expiry_at| now > expiry_at)
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|h| !h.is_empty())
    }

    /// Projects the record to its public fields. The password hash never
    /// leaves the engine, only whether one is set.
    pub fn to_info(&self, base_url: &str) -> UrlInfo {
        UrlInfo {
            short_url: self.short_code.to_url(base_url),
            short_code: self.short_code.clone(),
            long_url: self.long_url.clone(),
            created_at: self.created_at,
            description: self.description.clone(),
            clicks: self.clicks,
            file_type: self.file_type,
            domain: self.domain.clone(),
            is_supabase: self.is_supabase,
            expiry_at: self.expiry_at,
            has_password: self.has_password(),
            last_accessed_at: self.last_accessed_at,
        }
    }
}

/// Public view of a [`UrlRecord`], as returned by info and list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlInfo {
    pub short_url: String,
    pub short_code: ShortCode,
    pub long_url: String,
    #[serde(with = "timestamp")]
    pub created_at: Timestamp,
    pub description: String,
    pub clicks: u64,
    pub file_type: FileType,
    pub domain: String,
    pub is_supabase: bool,
    #[serde(rename = "expiry_date", with = "timestamp::option", default)]
    pub expiry_at: Option<Timestamp>,
    pub has_password: bool,
    #[serde(rename = "last_accessed", with = "timestamp::option", default)]
    pub last_accessed_at: Option<Timestamp>,
}

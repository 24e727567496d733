use snaplink_core::StorageError;
use snaplink_generator::AliasError;
use thiserror::Error;

pub type Result<T, E = ShortenerError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid alias: {0}")]
    InvalidAlias(String),
    #[error("alias already exists: {0}")]
    AliasTaken(String),
    #[error("short url not found: {0}")]
    NotFound(String),
    #[error("short url has expired: {0}")]
    Expired(String),
    #[error("password required")]
    PasswordRequired,
    #[error("invalid password")]
    InvalidPassword,
    #[error("storage error: {0}")]
    StorageIo(String),
}

impl ShortenerError {
    /// HTTP status a rendering layer should answer with.
    ///
    /// Password failures map to 401 so the caller can show a prompt.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidUrl(_) | Self::InvalidAlias(_) | Self::AliasTaken(_) => 400,
            Self::NotFound(_) | Self::Expired(_) => 404,
            Self::PasswordRequired | Self::InvalidPassword => 401,
            Self::StorageIo(_) => 500,
        }
    }

    /// True for the errors that mean "nothing to serve at this code".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Expired(_))
    }

    pub fn needs_password(&self) -> bool {
        matches!(self, Self::PasswordRequired | Self::InvalidPassword)
    }
}

impl From<AliasError> for ShortenerError {
    fn from(value: AliasError) -> Self {
        match value {
            AliasError::Invalid(message) => Self::InvalidAlias(message),
            AliasError::Taken(alias) => Self::AliasTaken(alias),
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        Self::StorageIo(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ShortenerError::InvalidUrl("x".into()).status_code(), 400);
        assert_eq!(ShortenerError::AliasTaken("x".into()).status_code(), 400);
        assert_eq!(ShortenerError::Expired("x".into()).status_code(), 404);
        assert_eq!(ShortenerError::InvalidPassword.status_code(), 401);
        assert_eq!(ShortenerError::StorageIo("disk".into()).status_code(), 500);
    }

    #[test]
    fn unavailable_and_password_groups() {
        assert!(ShortenerError::NotFound("x".into()).is_unavailable());
        assert!(ShortenerError::Expired("x".into()).is_unavailable());
        assert!(!ShortenerError::PasswordRequired.is_unavailable());
        assert!(ShortenerError::PasswordRequired.needs_password());
        assert!(!ShortenerError::InvalidAlias("x".into()).needs_password());
    }

    #[test]
    fn alias_errors_convert() {
        assert_eq!(
            ShortenerError::from(AliasError::Taken("x".into())),
            ShortenerError::AliasTaken("x".into())
        );
    }
}

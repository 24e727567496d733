//! URL mapping engine.
//!
//! This crate provides [`ShortenerService`], which ties the record store,
//! the alias generator and the password gate together, plus the `snaplink`
//! command line front end. Core types are re-exported from `snaplink_core`.

pub mod config;
pub mod embed;
pub mod error;
pub mod password;
pub mod service;
pub mod shortener;

pub use config::{ConfigError, ShortenerConfig};
pub use error::ShortenerError;
pub use service::ShortenerService;
pub use shortener::{CreateParams, Created, Embed, ListPage, Resolved, Shortener, Stats};
pub use snaplink_core::{FileType, ShortCode, UrlInfo, UrlRecord};

//! Core types and traits for the snaplink URL shortener.
//!
//! This crate provides the record model, the repository contract, the
//! clock abstraction and the pure URL classifier shared by the storage,
//! generator and shortener crates.

pub mod classifier;
pub mod clock;
pub mod error;
pub mod record;
pub mod repository;
pub mod shortcode;
pub mod timestamp;

pub use classifier::FileType;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, StorageError};
pub use record::{UrlInfo, UrlRecord};
pub use repository::{ReadRepository, Repository};
pub use shortcode::ShortCode;

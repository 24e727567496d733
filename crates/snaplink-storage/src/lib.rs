//! Record store backends for snaplink.
//!
//! Both backends keep the whole mapping in memory. [`FileRepository`]
//! additionally mirrors it to a JSON snapshot on every [`Repository::save`].

pub mod file;
pub mod memory;
mod table;

pub use file::FileRepository;
pub use memory::InMemoryRepository;
pub use snaplink_core::repository::{ReadRepository, Repository, Result};
pub use snaplink_core::StorageError;

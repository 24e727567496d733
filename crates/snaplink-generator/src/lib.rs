//! Short code generation.
//!
//! [`Generator`] implementations produce raw candidates without looking at
//! storage. [`AliasGenerator`] layers the alias policy on top: custom alias
//! validation, smart (filename/host derived) aliases, and collision probing
//! against a caller supplied "is this code taken" predicate.

pub mod alias;
pub mod random;
pub mod seq;

pub use alias::{AliasError, AliasGenerator};
pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use snaplink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
///
/// Implementations can vary from simple random generators to
/// sequential counters.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a type that can be converted into a short code.
    ///
    /// Output must satisfy the short code charset and length rules; it does
    /// not have to be unique, callers re-roll on collision.
    fn generate(&self) -> Self::Output;
}

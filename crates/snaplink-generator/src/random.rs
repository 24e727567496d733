use crate::Generator;
use rand::distributions::Alphanumeric;
use rand::Rng;
use snaplink_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use snaplink_core::ShortCode;

pub const DEFAULT_LENGTH: usize = 6;

/// Uniformly samples fixed-length codes from `[A-Za-z0-9]`.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of `length` characters.
    ///
    /// The length is clamped to the valid short code range.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_LENGTH, MAX_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let code: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

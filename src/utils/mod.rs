//! Miscellaneous utils
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

pub(crate) mod pass;

const KEY_LENGTH: usize = 32;

/// Pair of keys intended for use in the session store and cookies
#[derive(Debug)]
pub(crate) struct RKeys {
    /// Key without prefix
    pub(crate) base_key: String,
    /// Key with prefix
    pub(crate) prefixed_key: String,
}

impl RKeys {
    /// Generate a random alphanumeric key `KEY_LENGTH` long and return its' `(raw, prefixed)` variations.
    pub(crate) fn generate(prefix: &'static str) -> Self {
        let base_key = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_LENGTH)
            .map(char::from)
            .collect();
        Self::from_base(prefix, base_key)
    }

    /// Rebuild the pair from a key that came back in a cookie.
    pub(crate) fn from_base(prefix: &'static str, base_key: String) -> Self {
        let prefixed_key = format!("{}{}", prefix, base_key);
        Self {
            base_key,
            prefixed_key,
        }
    }
}

//! Password-related utilities.

use lazy_static::lazy_static;
use libreauth::pass::{Algorithm, HashBuilder, Hasher};

use crate::error::ReviewlyError;

pub(crate) const PWD_ALGORITHM: Algorithm = Algorithm::Argon2;
pub(crate) const PWD_SCHEME_VERSION: usize = 1;
pub(crate) const PWD_MIN_LEN: usize = 3;
pub(crate) const PWD_MAX_LEN: usize = 128;

// If the Hasher changes, make sure to increment PWD_SCHEME_VERSION
lazy_static! {
    pub(crate) static ref HASHER: Hasher = {
        HashBuilder::new()
            .algorithm(PWD_ALGORITHM)
            .version(PWD_SCHEME_VERSION)
            .min_len(PWD_MIN_LEN)
            .max_len(PWD_MAX_LEN)
            .finalize()
            .expect("password hasher parameters are valid")
    };
}

/// Hash a plaintext password into PHC form.
pub(crate) fn hash(password: &str) -> Result<String, ReviewlyError> {
    HASHER
        .hash(password)
        .map_err(|e| ReviewlyError::PasswordHash(format!("{:?}", e)))
}

/// The outcome of checking a password against a stored hash.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Verified {
    No,
    Yes,
    /// Correct, but hashed under an older scheme version.
    YesNeedsRehash,
}

/// Check a plaintext password against the stored PHC string. A malformed stored hash never verifies.
pub(crate) fn verify(stored: &str, password: &str) -> Verified {
    let checker = match HashBuilder::from_phc(stored) {
        Ok(checker) => checker,
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {:?}", e);
            return Verified::No;
        }
    };

    if !checker.is_valid(password) {
        Verified::No
    } else if checker.needs_update(Some(PWD_SCHEME_VERSION)) {
        Verified::YesNeedsRehash
    } else {
        Verified::Yes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_equals_plaintext_and_verifies() {
        let stored = hash("hunter22").unwrap();
        assert_ne!(stored, "hunter22");
        assert_eq!(verify(&stored, "hunter22"), Verified::Yes);
        assert_eq!(verify(&stored, "hunter23"), Verified::No);
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert_eq!(verify("not-a-phc-string", "whatever"), Verified::No);
    }
}

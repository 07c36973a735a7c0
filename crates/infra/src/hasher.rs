//! bcrypt-backed password hashing.

use stockroom_auth::PasswordHasher;
use stockroom_core::{AuthError, AuthResult};

/// Password hasher with a configurable cost factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Minimum-cost hasher for tests (hashing dominates test runtime
    /// otherwise).
    pub fn fast_for_tests() -> Self {
        // bcrypt's minimum cost is 4; the crate does not export the constant.
        Self::new(4)
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> AuthResult<String> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> AuthResult<bool> {
        bcrypt::verify(plaintext, hash)
            .map_err(|e| AuthError::internal(format!("password verification failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = BcryptHasher::fast_for_tests();
        let hash = hasher.hash("Secret1!").unwrap();

        assert_ne!(hash, "Secret1!");
        assert!(hasher.verify("Secret1!", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }
}

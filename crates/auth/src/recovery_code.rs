//! Recovery code generation.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Arc;

use stockroom_core::{AuthResult, Clock};

use crate::store::PrincipalStore;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 4;

/// A freshly generated, collision-free recovery code with its absolute
/// expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Generates short, human-enterable recovery codes.
///
/// Codes are 4-character uppercase alphanumerics. Uniqueness among all
/// principals currently holding an unredeemed code is guaranteed by a
/// generate-and-check retry loop; with a 36^4 code space the loop practically
/// terminates on the first attempt.
pub struct RecoverySecretManager {
    principals: Arc<dyn PrincipalStore>,
    clock: Arc<dyn Clock>,
    code_ttl: Duration,
}

impl RecoverySecretManager {
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        clock: Arc<dyn Clock>,
        code_ttl_secs: u64,
    ) -> Self {
        Self {
            principals,
            clock,
            code_ttl: Duration::seconds(code_ttl_secs as i64),
        }
    }

    /// A code no live principal currently holds, stamped with
    /// `now + code_ttl`.
    pub fn generate_code(&self) -> AuthResult<RecoveryCode> {
        loop {
            let code = Self::random_code();
            if self.principals.find_by_recovery_code(&code)?.is_none() {
                return Ok(RecoveryCode {
                    code,
                    expires_at: self.clock.now() + self.code_ttl,
                });
            }
        }
    }

    fn random_code() -> String {
        let mut rng = rand::thread_rng();
        (0..CODE_LEN)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_codes_are_four_uppercase_alphanumerics() {
        for _ in 0..200 {
            let code = RecoverySecretManager::random_code();
            assert_eq!(code.len(), 4);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }
}

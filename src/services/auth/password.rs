//! Salted one-way password hashing (Argon2id, PHC string format).
//!
//! The salt and cost parameters are embedded in the digest, so verification
//! needs nothing but the stored string. Plaintext never leaves this module
//! except as bytes fed to argon2.
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};
use tracing::error;

use crate::config::PasswordHashConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

impl PasswordHasher {
    pub fn new(cost: PasswordHashConfig) -> Result<Self, AppError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| {
                error!(error = %e, ?cost, "invalid argon2 parameters");
                AppError::Internal
            })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| {
                error!(error = %e, "failed to hash password");
                AppError::Internal
            })
    }

    /// `false` for a wrong password and for a digest that does not parse.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

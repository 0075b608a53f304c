//! Password hashing and verification
//!
//! New digests are Argon2id PHC strings. Digests written by older deployments
//! (bcrypt, other Argon2 variants or parameters) still verify, and are flagged
//! so the caller can upgrade them after a successful login.

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};

/// Outcome of checking a password against a stored digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Invalid,
    Valid,
    /// The password matches but the digest uses a deprecated scheme
    ValidNeedsRehash,
}

impl Verification {
    pub fn is_valid(self) -> bool {
        !matches!(self, Verification::Invalid)
    }
}

/// Password hasher configured with the current Argon2id parameters
#[derive(Debug, Clone, Default)]
pub struct Passwords {
    params: Params,
    decoy: Arc<OnceLock<String>>,
}

impl Passwords {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            decoy: Arc::default(),
        }
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored digest
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        Ok(self.check(password, digest)?.is_valid())
    }

    /// Verify a password and report whether the digest should be upgraded
    pub fn check(&self, password: &str, digest: &str) -> Result<Verification> {
        if is_bcrypt(digest) {
            let valid = bcrypt::verify(password, digest)
                .map_err(|e| anyhow::anyhow!("Invalid bcrypt hash: {}", e))?;
            return Ok(if valid {
                Verification::ValidNeedsRehash
            } else {
                Verification::Invalid
            });
        }

        let parsed = PasswordHash::new(digest)
            .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;

        // Argon2 verifies with the variant and parameters encoded in the digest.
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(Verification::Invalid);
        }

        if self.is_current(&parsed) {
            Ok(Verification::Valid)
        } else {
            Ok(Verification::ValidNeedsRehash)
        }
    }

    /// Verify against a throwaway digest with the current parameters
    ///
    /// Lets a lookup miss cost as much as a wrong password.
    pub fn check_decoy(&self, password: &str) -> Result<()> {
        let digest = match self.decoy.get() {
            Some(digest) => digest,
            None => {
                let digest = self.hash("decoy-password")?;
                self.decoy.get_or_init(|| digest)
            }
        };

        self.check(password, digest)?;
        Ok(())
    }

    /// [`Passwords::hash`] on the blocking thread pool
    pub async fn hash_blocking(&self, password: String) -> Result<String> {
        let passwords = self.clone();
        tokio::task::spawn_blocking(move || passwords.hash(&password)).await?
    }

    /// [`Passwords::check`] on the blocking thread pool
    pub async fn check_blocking(&self, password: String, digest: String) -> Result<Verification> {
        let passwords = self.clone();
        tokio::task::spawn_blocking(move || passwords.check(&password, &digest)).await?
    }

    /// [`Passwords::check_decoy`] on the blocking thread pool
    pub async fn check_decoy_blocking(&self, password: String) -> Result<()> {
        let passwords = self.clone();
        tokio::task::spawn_blocking(move || passwords.check_decoy(&password)).await?
    }

    fn is_current(&self, parsed: &PasswordHash<'_>) -> bool {
        let algorithm_current = Algorithm::try_from(parsed.algorithm)
            .map(|algorithm| algorithm == Algorithm::Argon2id)
            .unwrap_or(false);
        let version_current = parsed.version == Some(Version::V0x13 as u32);
        let params_current = Params::try_from(parsed)
            .map(|params| {
                params.m_cost() == self.params.m_cost()
                    && params.t_cost() == self.params.t_cost()
                    && params.p_cost() == self.params.p_cost()
            })
            .unwrap_or(false);

        algorithm_current && version_current && params_current
    }
}

fn is_bcrypt(digest: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| digest.starts_with(prefix))
}

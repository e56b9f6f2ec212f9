/// Password hashing module using Argon2id
///
/// Passwords are hashed with Argon2id, a salted, memory-hard algorithm. The
/// cost parameters are carried by a [`PasswordPolicy`] so the auth service owns
/// its hashing policy explicitly instead of relying on crate defaults.
///
/// # Default Policy
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// Verification reads the parameters embedded in the stored PHC string, so
/// hashes produced under an older policy keep verifying after the policy
/// changes.
///
/// # Example
///
/// ```
/// use repofav_shared::auth::password::{verify_password, PasswordPolicy};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = PasswordPolicy::default();
/// let hash = policy.hash("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, ParamsBuilder, Version,
};
use serde::{Deserialize, Serialize};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_kib: 65536, // 64 MB
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl PasswordPolicy {
    /// Hashes a password with a fresh 16-byte random salt
    ///
    /// # Returns
    ///
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// ```text
    /// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if the parameters are out of range or
    /// hashing fails
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, self.params()?);

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Checks that the parameters are accepted by Argon2
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` for out-of-range costs (e.g. zero
    /// passes, or less than 8 KiB of memory per lane)
    pub fn validate(&self) -> Result<(), PasswordError> {
        self.params().map(|_| ())
    }

    fn params(&self) -> Result<Params, PasswordError> {
        ParamsBuilder::new()
            .m_cost(self.memory_kib)
            .t_cost(self.iterations)
            .p_cost(self.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))
    }
}

/// Verifies a password against a hash
///
/// Comparison is constant-time. Parameters come from the hash itself.
///
/// # Returns
///
/// `Ok(true)` if password matches, `Ok(false)` if it doesn't match
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed and
/// `PasswordError::VerifyError` for any other verification failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false), // Wrong password
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

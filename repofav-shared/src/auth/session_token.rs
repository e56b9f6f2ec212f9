/// Session token utilities
///
/// Session tokens are the opaque values carried in the `sid` cookie.
///
/// # Security
///
/// - **Entropy**: 32 bytes from the OS CSPRNG (256 bits), hex encoded
/// - **Storage**: only the SHA-256 digest of a token is persisted; the session
///   row id is that digest, so a database dump does not yield live cookies
///
/// # Example
///
/// ```
/// use repofav_shared::auth::session_token::{generate_session_token, hash_session_token};
///
/// let token = generate_session_token();
/// assert_eq!(token.len(), 64);
///
/// let digest = hash_session_token(&token);
/// assert_eq!(digest, hash_session_token(&token));
/// assert_ne!(digest, token);
/// ```

use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Number of random bytes in a session token
const TOKEN_BYTES: usize = 32;

/// Length of an encoded session token (hex)
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Generates a new session token
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hashes a session token into its storage key (hex SHA-256, 64 chars)
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

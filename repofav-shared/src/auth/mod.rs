/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session_token`]: Session token generation and at-rest hashing
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with a configurable policy (64 MB, 3 passes by default)
/// - **Session Tokens**: 256-bit random tokens, stored only as SHA-256 digests
/// - **Constant-time Comparison**: Password verification is constant-time
///
/// # Example
///
/// ```
/// use repofav_shared::auth::password::{verify_password, PasswordPolicy};
/// use repofav_shared::auth::session_token::generate_session_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = PasswordPolicy::default().hash("my_secure_password")?;
/// assert!(verify_password("my_secure_password", &hash)?);
///
/// let token = generate_session_token();
/// assert_eq!(token.len(), 64);
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session_token;

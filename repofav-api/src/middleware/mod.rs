/// Middleware modules for the API server
///
/// - `session`: Resolves the `sid` cookie into an [`session::AuthContext`]
/// - `security`: Security response headers

pub mod security;
pub mod session;

/// Authentication primitives and the auth gate
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed session credential generation and validation
/// - [`middleware`]: The auth gate applied in front of protected routes
///
/// A login produces two things that must stay in sync: a signed HS256
/// credential handed to the client, and a session row recording that
/// credential with its own expiry and revocation flags. The gate checks
/// both on every protected request.

pub mod jwt;
pub mod middleware;
pub mod password;

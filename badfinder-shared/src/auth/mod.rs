/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Signed session token generation and validation
/// - [`guard`]: Route guard path classification and decision table
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: HS256 signing, 30-day expiration, issuer check
/// - **Route Guard**: pure decision logic; an invalid or expired token is
///   indistinguishable from no token
///
/// # Example
///
/// ```no_run
/// use badfinder_shared::auth::password::{hash_password, verify_password};
/// use badfinder_shared::auth::session::{create_session_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = SessionClaims::new(Uuid::new_v4(), "user@example.com");
/// let token = create_session_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod guard;
pub mod password;
pub mod session;

/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, logout
/// - `circles`: Circle CRUD and search listing
/// - `reviews`: Circle reviews
/// - `members`: Circle memberships

pub mod auth;
pub mod circles;
pub mod health;
pub mod members;
pub mod reviews;

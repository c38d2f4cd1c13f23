/// Database models for BadFinder
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (credential or OAuth-only)
/// - `circle`: Badminton circle listings, the central searchable entity
/// - `review`: Per-circle user reviews feeding the rating aggregate
/// - `member`: User-circle memberships with an active/pending status
/// - `image`: Circle photo records (URL + caption)

pub mod circle;
pub mod image;
pub mod member;
pub mod review;
pub mod user;

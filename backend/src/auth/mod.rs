//! Credential service: password hashing and access tokens.
//!
//! Wrong passwords and invalid or expired tokens are expected,
//! user-facing outcomes here; the HTTP adapter maps them to 401 with a
//! uniform message that does not reveal which part failed.

pub mod password;
pub mod token;

pub use password::{hash_password, hash_password_with, verify_password};
pub use token::{Claims, DEFAULT_TTL, TokenCodec};

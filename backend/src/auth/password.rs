//! One-way password hashing and verification.
//!
//! Uses Argon2id with a per-hash random salt. Verification is a pure
//! predicate: a wrong password or an undecodable stored hash both
//! yield `false`, never an error, because a failed login is an
//! expected outcome.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};

use crate::domain::{Error, Password, PasswordHash};

/// Hash a password with the default Argon2id cost parameters.
///
/// # Errors
/// Returns an internal error when the hasher itself fails; this never
/// happens for ordinary inputs.
pub fn hash_password(password: &Password) -> Result<PasswordHash, Error> {
    hash_password_with(&Argon2::default(), password)
}

/// Hash a password with caller-supplied cost parameters.
pub fn hash_password_with(argon2: &Argon2<'_>, password: &Password) -> Result<PasswordHash, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.expose().as_bytes(), &salt)
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;
    Ok(PasswordHash::from_phc_string(hash.to_string()))
}

/// Whether a plaintext password matches a stored hash.
///
/// Salted hashes of the same password differ, so equality goes through
/// the verifier rather than string comparison.
pub fn verify_password(password: &Password, stored: &PasswordHash) -> bool {
    let Ok(parsed) = PhcHash::new(stored.as_str()) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok()
}

//! Password hashing and verification

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash a password with a freshly generated random salt
///
/// The salt is embedded in the returned PHC string, so verification only
/// needs the stored hash. Two calls on the same password produce different
/// output.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash
///
/// A malformed stored hash verifies as false rather than erroring, so a
/// corrupt row can never take down the login path.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("password1").unwrap();
        assert!(verify_password("password1", &hash));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("password1").unwrap();
        assert!(!verify_password("password2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("password1").unwrap();
        let second = hash_password("password1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_password("password1", "not-a-phc-string"));
        assert!(!verify_password("password1", ""));
    }
}

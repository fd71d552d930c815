//! Password hashing and verification
//!
//! Argon2 with a per-call random salt: hashing the same plaintext twice
//! yields different hashes. Verification never errors on a malformed hash,
//! it just fails.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::common::ApiError;

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored hash.
/// A malformed hash verifies as false, never as an error.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_success() {
        let hash = hash_password("secure-password-123").unwrap();
        assert!(!hash.is_empty());
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_hash_password_different_each_time() {
        let hash1 = hash_password("same-password").unwrap();
        let hash2 = hash_password("same-password").unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("secure-password-123").unwrap();
        assert!(verify_password("secure-password-123", &hash));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_verify_malformed_hash_is_false() {
        assert!(!verify_password("any-password", "not-a-valid-hash"));
        assert!(!verify_password("any-password", ""));
    }
}

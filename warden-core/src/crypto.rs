//! Password hashing, code generation and constant-time comparison
//!
//! Passwords are hashed with Argon2id through `password-auth`, producing PHC strings that carry
//! their own salt and parameters.
//!
//! Verification codes are short alphanumeric strings drawn from the thread-local CSPRNG. They are
//! compared with [`constant_time_compare`] so the time taken does not reveal how long a matching
//! prefix was.
use rand::Rng;
use rand::distr::Alphanumeric;
use subtle::ConstantTimeEq;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> String {
    password_auth::generate_hash(password)
}

/// Check a password against a stored PHC hash. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    password_auth::verify_password(password, hash).is_ok()
}

/// Generate a random alphanumeric code of `length` characters.
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Compare two strings in constant time.
///
/// Strings of different lengths compare unequal; only the length is leaked.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("p1");

        assert_ne!(hash, "p1");
        assert!(verify_password("p1", &hash));
        assert!(!verify_password("p2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_verify_password_rejects_malformed_hash() {
        assert!(!verify_password("p1", "not-a-phc-string"));
    }

    #[test]
    fn test_generate_code() {
        let code = generate_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

        assert_eq!(generate_code(12).len(), 12);
        assert_ne!(generate_code(32), generate_code(32));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("123456", "123456"));
        assert!(!constant_time_compare("123456", "000000"));
        assert!(!constant_time_compare("123456", "12345"));
        assert!(!constant_time_compare("AbC123", "abc123"));
        assert!(constant_time_compare("", ""));
    }
}

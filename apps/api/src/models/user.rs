use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Account record. Placeholder for future authentication; no route reads it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// `salt$sha256hex`, see [`hash_password`].
    #[serde(skip_serializing)]
    pub password: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl User {
    #[allow(dead_code)]
    pub fn verify_password(&self, candidate: &str) -> bool {
        verify_password(&self.password, candidate)
    }
}

/// Hashes a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password);
    format!("{salt}${digest}")
}

pub fn verify_password(stored: &str, candidate: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => salted_digest(salt, candidate) == digest,
        None => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_never_contains_plain_password() {
        let stored = hash_password("hunter2");
        assert!(!stored.contains("hunter2"));
        assert!(stored.contains('$'));
    }

    #[test]
    fn test_verify_password_roundtrip() {
        let stored = hash_password("correct horse");
        assert!(verify_password(&stored, "correct horse"));
        assert!(!verify_password(&stored, "wrong horse"));
    }

    #[test]
    fn test_same_password_gets_different_salt() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("no-separator", "no-separator"));
    }

    #[test]
    fn test_password_not_serialized() {
        let user = User {
            id: 1,
            username: "ada".to_string(),
            password: hash_password("secret"),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(user.verify_password("secret"));
    }
}

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::database::models::NewUser;

/// Hex SHA-256 of `salt || password`
pub fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compares without short-circuiting on the first differing byte
pub fn verify_password(salt: &str, password: &str, expected_digest: &str) -> bool {
    let actual = digest_password(salt, password);
    if actual.len() != expected_digest.len() {
        return false;
    }
    actual
        .bytes()
        .zip(expected_digest.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Builds a user insert with a fresh salt
pub fn new_user(username: &str, email: &str, password: &str) -> NewUser {
    let salt = Uuid::new_v4().simple().to_string();
    NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: digest_password(&salt, password),
        salt,
    }
}

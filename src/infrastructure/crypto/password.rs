//! Password hashing utilities

use bcrypt::{hash, verify};

/// Hash a password using bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Secret behind the dummy hash. Never stored for any account.
const DUMMY_SECRET: &str = "cms-admin:no-such-account";

/// A hash to compare against when no account matches, so a miss costs the
/// same bcrypt round as a wrong password. Must use the same cost as real
/// hashes.
pub fn dummy_hash(cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(DUMMY_SECRET, cost)
}

/// Burns one verification against `dummy`; always false.
pub fn verify_dummy(password: &str, dummy: &str) -> bool {
    let _ = verify(password, dummy);
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_original() {
        let hashed = hash_password("s3cret-pass", 4).unwrap();
        assert_ne!(hashed, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hashed).unwrap());
        assert!(!verify_password("s3cret-pasS", &hashed).unwrap());
    }

    #[test]
    fn dummy_never_matches() {
        let dummy = dummy_hash(4).unwrap();
        assert!(!verify_dummy("", &dummy));
        assert!(!verify_dummy("anything", &dummy));
        assert!(!verify_dummy(DUMMY_SECRET, &dummy));
    }

    #[test]
    fn dummy_hash_uses_requested_cost() {
        assert!(dummy_hash(5).unwrap().starts_with("$2b$05$"));
        assert!(dummy_hash(6).unwrap().starts_with("$2b$06$"));
    }
}

//! Password hashing
//!
//! bcrypt is CPU-bound, so both directions run on the blocking pool.

use crate::backend::error::ApiError;

/// bcrypt work factor for stored hashes
pub const BCRYPT_COST: u32 = 10;

/// Hash a plain-text password
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| ApiError::internal(format!("password hashing task failed: {e}")))??;
    Ok(hashed)
}

/// Check a plain-text password against a stored hash
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("password verification task failed: {e}")))??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hash = hash_password("password123".to_string()).await.unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong-password".to_string(), hash).await.unwrap());
    }
}

use bcrypt::{hash, verify};

use super::AuthError;

/// bcrypt hashing, run off the async executor.
pub struct PasswordService;

impl PasswordService {
    pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(AuthError::from)
    }

    pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AuthError> {
        let (password, password_hash) = (password.to_string(), password_hash.to_string());
        tokio::task::spawn_blocking(move || verify(password, &password_hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_password_hashing_and_verification() {
        let password = "pw1";
        let hash = PasswordService::hash_password(password, 4).await.unwrap();

        assert_ne!(hash, password);
        assert!(PasswordService::verify_password(password, &hash)
            .await
            .unwrap());
        assert!(!PasswordService::verify_password("wrong_password", &hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_salted_hashes_differ() {
        let h1 = PasswordService::hash_password("pw1", 4).await.unwrap();
        let h2 = PasswordService::hash_password("pw1", 4).await.unwrap();
        assert_ne!(h1, h2);
    }

    #[tokio::test]
    async fn test_verify_against_garbage_hash() {
        let rv = PasswordService::verify_password("pw1", "not-a-bcrypt-hash").await;
        assert!(matches!(rv, Err(AuthError::Hashing(_))));
    }
}

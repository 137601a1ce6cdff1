use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::{engine::general_purpose, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};

use crate::core::error::{AppError, AppResult};

pub struct CryptoService {
    rng: SystemRandom,
}

impl Default for CryptoService {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoService {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Crypto(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    /// Verify a password against its hash
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Crypto(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }

    /// Generate a random session token
    pub fn generate_token(&self) -> AppResult<String> {
        let mut token_bytes = [0u8; 32];
        self.rng
            .fill(&mut token_bytes)
            .map_err(|e| AppError::Crypto(format!("Failed to generate token: {}", e)))?;

        Ok(general_purpose::URL_SAFE_NO_PAD.encode(token_bytes))
    }

    /// Hash data using SHA-256
    pub fn hash_data(&self, data: &str) -> String {
        use ring::digest;
        let digest = digest::digest(&digest::SHA256, data.as_bytes());
        general_purpose::STANDARD.encode(digest.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies() {
        let crypto = CryptoService::new();
        let hash = crypto.hash_password("hunter2").unwrap();
        assert!(crypto.verify_password("hunter2", &hash).unwrap());
        assert!(!crypto.verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn tokens_are_unique() {
        let crypto = CryptoService::new();
        let a = crypto.generate_token().unwrap();
        let b = crypto.generate_token().unwrap();
        assert_ne!(a, b);
        assert_eq!(crypto.hash_data(&a), crypto.hash_data(&a));
        assert_ne!(crypto.hash_data(&a), crypto.hash_data(&b));
    }
}

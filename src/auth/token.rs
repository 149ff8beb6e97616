// JWT token generation and validation service

use crate::auth::error::AuthError;
use crate::auth::models::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // employee_id
    pub email: String,
    pub role: Role,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Token service for JWT operations
pub struct TokenService {
    secret: String,
    token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key.
    /// Tokens expire after one working day (8 hours).
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            token_duration: 28800, // 8 hours
        }
    }

    /// Generate a signed token for an employee
    pub fn generate_token(
        &self,
        employee_id: &str,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: employee_id.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.token_duration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            if e.to_string().contains("ExpiredSignature") {
                AuthError::ExpiredToken
            } else {
                AuthError::InvalidToken
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[test]
    fn test_token_expiration_is_eight_hours() {
        let service = test_token_service();
        let token = service
            .generate_token("E12345", "test@example.com", Role::Employee)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 28800);
    }

    #[test]
    fn test_token_claims_contain_employee_identity() {
        let service = test_token_service();
        let token = service
            .generate_token("E00042", "user@example.com", Role::Admin)
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "E00042");
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_token("").is_err());
        assert!(service.validate_token("not.a.token").is_err());
        assert!(service.validate_token("invalid_token_format").is_err());
        assert!(service
            .validate_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1".to_string());
        let service2 = TokenService::new("secret2".to_string());

        let token = service1
            .generate_token("E12345", "test@example.com", Role::Employee)
            .unwrap();

        assert!(service1.validate_token(&token).is_ok());
        assert!(service2.validate_token(&token).is_err());
    }

    proptest! {
        #[test]
        fn prop_token_claims_contain_identity(
            employee_id in "E[0-9]{5}",
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();

            let token = service.generate_token(&employee_id, &email, Role::Employee)?;
            let claims = service.validate_token(&token)?;
            prop_assert_eq!(claims.sub, employee_id);
            prop_assert_eq!(claims.email, email);
        }

        #[test]
        fn prop_malformed_tokens_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.validate_token(&malformed).is_err());
        }
    }
}

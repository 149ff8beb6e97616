// Authentication middleware for protected routes

use crate::auth::{error::AuthError, models::Role, token::TokenService};
use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// Authenticated employee extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedEmployee {
    pub employee_id: String,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedEmployee
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::ConfigError("JWT_SECRET not configured".to_string()))?;

        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate_token(token)?;

        Ok(AuthenticatedEmployee {
            employee_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Authorization middleware that requires a specific role
#[derive(Debug, Clone)]
pub struct RequireRole {
    required_role: Role,
}

impl RequireRole {
    pub fn new(required_role: Role) -> Self {
        Self { required_role }
    }

    /// Middleware requiring the Admin role
    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    /// Middleware function that validates role-based access
    pub async fn middleware(self, request: Request<Body>, next: Next) -> Result<Response, AuthError> {
        let endpoint = request.uri().path().to_string();

        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(|| {
                warn!(
                    "Missing Authorization header in request to protected endpoint: {}",
                    endpoint
                );
                AuthError::MissingToken
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header format for endpoint: {}", endpoint);
                AuthError::InvalidToken
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!(
                "Authorization header missing 'Bearer ' prefix for endpoint: {}",
                endpoint
            );
            AuthError::InvalidToken
        })?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::ConfigError("JWT_SECRET not configured".to_string()))?;

        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate_token(token)?;

        if claims.role != self.required_role {
            warn!(
                "Authorization failed: employee_id={}, required_role={}, actual_role={}, endpoint={}",
                claims.sub, self.required_role, claims.role, endpoint
            );
            return Err(AuthError::InsufficientPermissions {
                required: self.required_role,
                actual: claims.role,
            });
        }

        debug!(
            "Authorization successful: employee_id={}, role={}, endpoint={}",
            claims.sub, claims.role, endpoint
        );
        Ok(next.run(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenService;
    use axum::http::Request;

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    fn create_parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let service = test_token_service();
        let token = service
            .generate_token("E00042", "test@example.com", Role::Employee)
            .unwrap();
        let auth_header = format!("Bearer {}", token);

        let mut parts = create_parts_with_auth(&auth_header);
        let result = AuthenticatedEmployee::from_request_parts(&mut parts, &()).await;

        assert!(result.is_ok());
        let employee = result.unwrap();
        assert_eq!(employee.employee_id, "E00042");
        assert_eq!(employee.email, "test@example.com");
        assert_eq!(employee.role, Role::Employee);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        use crate::auth::token::Claims;
        use chrono::Utc;
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = Claims {
            sub: "E00001".to_string(),
            email: "test@example.com".to_string(),
            role: Role::Employee,
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        let auth_header = format!("Bearer {}", token);
        let mut parts = create_parts_with_auth(&auth_header);

        let result = AuthenticatedEmployee::from_request_parts(&mut parts, &()).await;

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::ExpiredToken));
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let malformed_tokens = vec![
            "Bearer invalid_token",
            "Bearer not.a.valid.jwt",
            "Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
        ];

        for token in malformed_tokens {
            let mut parts = create_parts_with_auth(token);
            let result = AuthenticatedEmployee::from_request_parts(&mut parts, &()).await;
            assert!(result.is_err());
        }
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let mut parts = create_parts_without_auth();
        let result = AuthenticatedEmployee::from_request_parts(&mut parts, &()).await;

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let invalid_formats = vec![
            "InvalidFormat token",
            "token_without_bearer",
            "Basic dXNlcjpwYXNz",
        ];

        for auth_value in invalid_formats {
            let mut parts = create_parts_with_auth(auth_value);
            let result = AuthenticatedEmployee::from_request_parts(&mut parts, &()).await;
            assert!(result.is_err());
        }
    }
}

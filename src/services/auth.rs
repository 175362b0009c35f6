use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::config::AuthSettings;
use crate::models::auth::Claims;
use crate::models::user::User;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub struct AuthService {
    secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            secret: settings.jwt_secret.clone(),
            token_ttl_hours: settings.token_ttl_hours,
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user.id, user.email.clone(), user.role, self.token_ttl_hours);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use chrono::Utc;
    use uuid::Uuid;

    fn service() -> AuthService {
        AuthService::new(&AuthSettings {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
        })
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            phone: None,
            role: UserRole::Driver,
            establishment_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_roundtrip_preserves_identity() {
        let service = service();
        let user = test_user();
        let token = service.generate_token(&user).unwrap();
        let claims = service.decode_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Driver);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = service().generate_token(&test_user()).unwrap();
        let other = AuthService::new(&AuthSettings {
            jwt_secret: "other-secret".to_string(),
            token_ttl_hours: 1,
        });
        assert!(other.decode_token(&token).is_err());
    }
}

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, err, ok};
use uuid::Uuid;

use crate::config::Settings;
use crate::models::auth::Claims;
use crate::models::user::UserRole;
use crate::services::auth::AuthService;

/// Extractor for endpoints behind `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_provider(&self) -> bool {
        self.role == UserRole::Provider
    }

    pub fn can_manage_catalog(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Provider)
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(settings) = req.app_data::<web::Data<Settings>>() else {
            return err(actix_web::error::ErrorInternalServerError(
                "Authentication not configured",
            ));
        };

        let Some(token) = bearer_token(req) else {
            return err(actix_web::error::ErrorUnauthorized(
                "Missing bearer token",
            ));
        };

        match AuthService::new(&settings.auth).decode_token(token) {
            Ok(claims) => ok(AuthenticatedUser::from(claims)),
            Err(_) => err(actix_web::error::ErrorUnauthorized("Invalid token")),
        }
    }
}

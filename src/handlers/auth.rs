use crate::{
    config::Settings,
    database::connection::DbPool,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo},
        user::{CreateUser, User, UserError, UserRole},
    },
    services::auth::AuthService,
    utils::helpers::ApiResponse,
};
use actix_web::{HttpResponse, Result, web};
use tracing::{error, info};

pub async fn register(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let role = match request.role.as_deref() {
        // Admin accounts are provisioned out of band.
        Some("admin") => UserRole::Driver,
        Some(role_str) => role_str.parse().unwrap_or(UserRole::Driver),
        None => UserRole::Driver,
    };

    let create_user = CreateUser {
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        password: request.password.clone(),
        phone: request.phone.clone(),
        role,
    };

    let user = match User::create(&pool, create_user).await {
        Ok(user) => user,
        Err(UserError::EmailTaken { email }) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::<()>::error(format!(
                "Email {} is already registered",
                email
            ))));
        }
        Err(e) => {
            error!("Failed to create user: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create user".to_string())));
        }
    };

    info!("Registered user {} with role {:?}", user.id, user.role);

    let token = AuthService::new(&settings.auth)
        .generate_token(&user)
        .map_err(|e| {
            error!("Failed to generate token: {}", e);
            actix_web::error::ErrorInternalServerError("Failed to generate token")
        })?;

    let response = AuthResponse {
        token,
        user: UserInfo {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        },
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

pub async fn login(
    pool: web::Data<DbPool>,
    settings: web::Data<Settings>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let user = User::authenticate(&pool, &request.email, &request.password)
        .await
        .map_err(|e| {
            error!("Authentication error: {}", e);
            actix_web::error::ErrorInternalServerError("Authentication error")
        })?;

    let Some(user) = user else {
        info!("Invalid credentials for: {}", request.email);
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::<()>::error("Invalid credentials".to_string())));
    };

    let token = AuthService::new(&settings.auth)
        .generate_token(&user)
        .map_err(|e| {
            error!("Failed to generate token: {}", e);
            actix_web::error::ErrorInternalServerError("Failed to generate token")
        })?;

    let response = AuthResponse {
        token,
        user: UserInfo {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn me(pool: web::Data<DbPool>, user: AuthenticatedUser) -> Result<HttpResponse> {
    match User::find_by_id(&pool, user.user_id).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error("User not found".to_string()))),
        Err(e) => {
            error!("Failed to load profile: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to load profile".to_string())))
        }
    }
}

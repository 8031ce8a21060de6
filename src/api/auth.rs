use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::services::auth_service;
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Signup successful", body = AuthResponse),
        (status = 400, description = "Missing field or unknown account type"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    db: web::Data<MongoDB>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /auth/signup - email: {}, accountType: {}", request.email, request.account_type);

    let user = auth_service::signup(db.get_ref(), &request).await.map_err(|e| {
        log::warn!("❌ Signup failed: {} - {}", request.email, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Signup successful".to_string(),
        user,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid email or password")
    )
)]
pub async fn login(
    db: web::Data<MongoDB>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    let user = auth_service::login(db.get_ref(), &request).await.map_err(|e| {
        log::warn!("❌ Login failed: {} - {}", request.email, e);
        e
    })?;

    log::info!("✅ Login successful: {}", user.email);

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        user,
    }))
}

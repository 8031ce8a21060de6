use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::database::MongoDB;
use crate::models::{ProfilePictureRequest, UpdateProfileRequest, UserProfile};
use crate::services::profile_service;
use crate::utils::error::AppError;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    params(("email" = String, Query, description = "Account email")),
    responses(
        (status = 200, description = "Profile found", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    db: web::Data<MongoDB>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
    let profile = profile_service::get_profile(db.get_ref(), &query.email).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profile",
    params(("email" = String, Query, description = "Account email")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile(
    db: web::Data<MongoDB>,
    query: web::Query<EmailQuery>,
    body: Option<web::Json<UpdateProfileRequest>>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️ PUT /profile - email: {}", query.email);

    let update = body.map(web::Json::into_inner).unwrap_or_default();
    let profile = profile_service::update_profile(db.get_ref(), &query.email, &update).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    put,
    path = "/profile/image",
    tag = "Profile",
    params(("email" = String, Query, description = "Account email")),
    request_body = ProfilePictureRequest,
    responses(
        (status = 200, description = "Profile picture updated", body = UserProfile),
        (status = 400, description = "Invalid image data"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile_picture(
    db: web::Data<MongoDB>,
    query: web::Query<EmailQuery>,
    body: web::Json<ProfilePictureRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🖼️ PUT /profile/image - email: {}", query.email);

    let profile =
        profile_service::update_profile_picture(db.get_ref(), &query.email, &body.profile_pic).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    get,
    path = "/profile/role/{account_type}",
    tag = "Profile",
    params(("account_type" = String, Path, description = "Student, Mentor or Admin (any casing)")),
    responses(
        (status = 200, description = "Users with the role", body = [UserProfile]),
        (status = 400, description = "Unknown account type")
    )
)]
pub async fn get_by_role(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let users = profile_service::users_by_role(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/group/{mentor_name}",
    tag = "Profile",
    params(("mentor_name" = String, Path, description = "Mentor's full name")),
    responses(
        (status = 200, description = "Members of the mentor group", body = [UserProfile])
    )
)]
pub async fn get_group_members(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let members = profile_service::group_members(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(members))
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "Profile",
    params(("limit" = Option<i64>, Query, description = "Number of users (default 10, max 100)")),
    responses(
        (status = 200, description = "Users ordered by points", body = [UserProfile])
    )
)]
pub async fn get_leaderboard(
    db: web::Data<MongoDB>,
    query: web::Query<LeaderboardQuery>,
) -> Result<HttpResponse, AppError> {
    let users = profile_service::leaderboard(db.get_ref(), query.limit).await?;
    Ok(HttpResponse::Ok().json(users))
}

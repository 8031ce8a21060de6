use crate::database::{ImageStore, UserStore};
use crate::models::{AccountType, UpdateProfileRequest, UserProfile};
use crate::services::image_service;
use crate::utils::error::AppError;

pub const DEFAULT_LEADERBOARD_SIZE: i64 = 10;
pub const MAX_LEADERBOARD_SIZE: i64 = 100;

pub async fn get_profile<S>(db: &S, email: &str) -> Result<UserProfile, AppError>
where
    S: UserStore + ?Sized,
{
    db.find_user_by_email(email.trim())
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Writes only the provided fields. Points and role are not editable here.
pub async fn update_profile<S>(
    db: &S,
    email: &str,
    update: &UpdateProfileRequest,
) -> Result<UserProfile, AppError>
where
    S: UserStore + ?Sized,
{
    if update.is_empty() {
        return Err(AppError::InvalidInput("No fields to update".to_string()));
    }
    if update.full_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(AppError::InvalidInput("fullName cannot be empty".to_string()));
    }

    let user = db
        .update_profile(email.trim(), update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    log::info!("✏️ Profile updated: {}", user.email);

    Ok(UserProfile::from(user))
}

/// Stores the picture in the image store and points the profile at it
pub async fn update_profile_picture<S>(
    db: &S,
    email: &str,
    payload: &str,
) -> Result<UserProfile, AppError>
where
    S: UserStore + ImageStore + ?Sized,
{
    let email = email.trim();
    if db.find_user_by_email(email).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let url = image_service::store_profile_picture(db, email, payload).await?;

    let user = db
        .set_profile_picture(email, &url)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(UserProfile::from(user))
}

pub async fn users_by_role<S>(db: &S, account_type: &str) -> Result<Vec<UserProfile>, AppError>
where
    S: UserStore + ?Sized,
{
    let account_type: AccountType = account_type.parse().map_err(AppError::InvalidInput)?;
    let users = db.find_users_by_account_type(account_type).await?;
    Ok(users.into_iter().map(UserProfile::from).collect())
}

/// Everyone whose mentor is `mentor_name`
pub async fn group_members<S>(db: &S, mentor_name: &str) -> Result<Vec<UserProfile>, AppError>
where
    S: UserStore + ?Sized,
{
    let members = db.find_group_members(mentor_name).await?;
    Ok(members.into_iter().map(UserProfile::from).collect())
}

pub async fn leaderboard<S>(db: &S, limit: Option<i64>) -> Result<Vec<UserProfile>, AppError>
where
    S: UserStore + ?Sized,
{
    let limit = limit
        .unwrap_or(DEFAULT_LEADERBOARD_SIZE)
        .clamp(1, MAX_LEADERBOARD_SIZE);
    let users = db.top_users_by_points(limit).await?;
    Ok(users.into_iter().map(UserProfile::from).collect())
}

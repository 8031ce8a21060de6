use bcrypt::{hash, verify, DEFAULT_COST};

use crate::database::{BucketListStore, UserStore};
use crate::models::{AccountType, LoginRequest, SignupRequest, User, UserProfile};
use crate::utils::error::AppError;

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(value)
}

// User registration
pub async fn signup<S>(db: &S, request: &SignupRequest) -> Result<UserProfile, AppError>
where
    S: UserStore + BucketListStore + ?Sized,
{
    let account_type: AccountType = request
        .account_type
        .parse()
        .map_err(AppError::InvalidInput)?;
    let full_name = required(&request.full_name, "fullName")?;
    let email = required(&request.email, "email")?;
    if request.password.is_empty() {
        return Err(AppError::InvalidInput("password is required".to_string()));
    }

    if db.find_user_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let mentor_name = request
        .mentor_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let mut user = User {
        id: None,
        account_type,
        full_name: full_name.to_string(),
        email: email.to_string(),
        password_hash: hash(&request.password, DEFAULT_COST)?,
        mentor_name,
        points: 0,
        fun_facts: Some(request.fun_facts.clone().unwrap_or_default()),
        profile_pic: request.profile_pic.clone(),
    };

    user.id = Some(db.insert_user(&user).await?);

    if account_type == AccountType::Mentor {
        db.ensure_bucket_list(&user.full_name).await?;
        log::info!("📋 Bucket list ready for mentor group '{}'", user.full_name);
    }

    log::info!("✅ User registered successfully: {} ({})", user.email, account_type);

    Ok(UserProfile::from(user))
}

// User login
pub async fn login<S>(db: &S, request: &LoginRequest) -> Result<UserProfile, AppError>
where
    S: UserStore + ?Sized,
{
    let invalid = || AppError::InvalidInput("Invalid email or password".to_string());

    let user = db
        .find_user_by_email(request.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify(&request.password, &user.password_hash)? {
        return Err(invalid());
    }

    Ok(UserProfile::from(user))
}

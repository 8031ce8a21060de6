use crate::database::UserStore;
use crate::models::AccountType;
use crate::utils::error::AppError;

/// Roles allowed to mutate a mentor group's bucket list
pub const TASK_EDITORS: &[AccountType] = &[AccountType::Mentor, AccountType::Admin];

/// Looks up the acting user and checks their role.
///
/// An unknown email fails with `NotFound` before any role is evaluated.
/// Roles are compared after normalisation, so legacy lowercase values match.
pub async fn authorize<S>(
    users: &S,
    acting_user_email: &str,
    required_roles: &[AccountType],
) -> Result<AccountType, AppError>
where
    S: UserStore + ?Sized,
{
    let email = acting_user_email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidInput("user_email is required".to_string()));
    }

    let user = users
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !required_roles.contains(&user.account_type) {
        log::warn!(
            "⛔ {} ({}) attempted an action reserved for {:?}",
            email,
            user.account_type,
            required_roles
        );
        return Err(AppError::Forbidden(format!(
            "Role {} is not authorized for this action",
            user.account_type
        )));
    }

    Ok(user.account_type)
}

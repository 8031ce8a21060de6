use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. Stored as "Student" / "Mentor" / "Admin"; older documents
/// carry lowercase values and are normalised on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccountType {
    Student,
    Mentor,
    Admin,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Student => "Student",
            AccountType::Mentor => "Mentor",
            AccountType::Admin => "Admin",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "mentee" => Ok(AccountType::Student),
            "mentor" => Ok(AccountType::Mentor),
            "admin" => Ok(AccountType::Admin),
            other => Err(format!(
                "Invalid account type: {}. Supported: Student, Mentor, Admin",
                other
            )),
        }
    }
}

impl TryFrom<String> for AccountType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountType> for String {
    fn from(value: AccountType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User account as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "accountType")]
    pub account_type: AccountType,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    /// fullName of the mentor whose group this user belongs to
    #[serde(default)]
    pub mentor_name: Option<String>,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub fun_facts: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserProfile {
    pub id: String,
    #[serde(rename = "accountType")]
    pub account_type: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub mentor_name: Option<String>,
    pub fun_facts: String,
    pub points: i64,
    pub profile_pic: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            account_type: user.account_type.to_string(),
            full_name: user.full_name,
            email: user.email,
            mentor_name: user.mentor_name,
            fun_facts: user.fun_facts.unwrap_or_default(),
            points: user.points,
            profile_pic: user.profile_pic,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    #[serde(rename = "accountType")]
    pub account_type: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub mentor_name: Option<String>,
    pub fun_facts: Option<String>,
    pub profile_pic: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; only `Some` fields are written
#[derive(Debug, Default, Clone, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub mentor_name: Option<String>,
    pub fun_facts: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.mentor_name.is_none() && self.fun_facts.is_none()
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ProfilePictureRequest {
    /// Base64 image, optionally as a data URL
    pub profile_pic: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
}

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;

use super::{collect_documents, MongoDB, USERS};
use crate::models::{AccountType, UpdateProfileRequest, User};
use crate::utils::error::AppError;

/// Account persistence used by auth, profiles and the points ledger
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    async fn insert_user(&self, user: &User) -> Result<ObjectId, AppError>;

    /// Adds `delta` to the mentor account named `mentor_name`; returns how many accounts matched
    async fn increment_mentor_points(&self, mentor_name: &str, delta: i64) -> Result<u64, AppError>;

    /// Adds `delta` to every user whose `mentor_name` matches; returns how many matched
    async fn increment_mentee_points(&self, mentor_name: &str, delta: i64) -> Result<u64, AppError>;

    /// Sets every user's points to zero; returns how many accounts matched, including those already at zero
    async fn reset_all_points(&self) -> Result<u64, AppError>;

    async fn find_users_by_account_type(&self, account_type: AccountType) -> Result<Vec<User>, AppError>;

    async fn find_group_members(&self, mentor_name: &str) -> Result<Vec<User>, AppError>;

    async fn top_users_by_points(&self, limit: i64) -> Result<Vec<User>, AppError>;

    async fn update_profile(
        &self,
        email: &str,
        update: &UpdateProfileRequest,
    ) -> Result<Option<User>, AppError>;

    async fn set_profile_picture(&self, email: &str, url: &str) -> Result<Option<User>, AppError>;
}

/// Stored role values that mean `account_type`, including pre-normalisation casing
fn role_aliases(account_type: AccountType) -> Vec<String> {
    let canonical = account_type.as_str();
    vec![canonical.to_string(), canonical.to_ascii_lowercase()]
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = self
            .collection::<User>(USERS)
            .find_one(doc! { "email": email })
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let user = self
            .collection::<User>(USERS)
            .find_one(doc! { "_id": *id })
            .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, AppError> {
        let result = self.collection::<User>(USERS).insert_one(user).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("Inserted user has no ObjectId".to_string()))
    }

    async fn increment_mentor_points(&self, mentor_name: &str, delta: i64) -> Result<u64, AppError> {
        let result = self
            .collection::<Document>(USERS)
            .update_one(
                doc! {
                    "fullName": mentor_name,
                    "accountType": { "$in": role_aliases(AccountType::Mentor) },
                },
                doc! { "$inc": { "points": delta } },
            )
            .await?;
        Ok(result.matched_count)
    }

    async fn increment_mentee_points(&self, mentor_name: &str, delta: i64) -> Result<u64, AppError> {
        let result = self
            .collection::<Document>(USERS)
            .update_many(
                doc! { "mentor_name": mentor_name },
                doc! { "$inc": { "points": delta } },
            )
            .await?;
        Ok(result.matched_count)
    }

    async fn reset_all_points(&self) -> Result<u64, AppError> {
        let result = self
            .collection::<Document>(USERS)
            .update_many(doc! {}, doc! { "$set": { "points": 0_i64 } })
            .await?;
        Ok(result.matched_count)
    }

    async fn find_users_by_account_type(&self, account_type: AccountType) -> Result<Vec<User>, AppError> {
        let cursor = self
            .collection::<User>(USERS)
            .find(doc! { "accountType": { "$in": role_aliases(account_type) } })
            .await?;
        Ok(collect_documents(cursor, USERS).await)
    }

    async fn find_group_members(&self, mentor_name: &str) -> Result<Vec<User>, AppError> {
        let cursor = self
            .collection::<User>(USERS)
            .find(doc! { "mentor_name": mentor_name })
            .await?;
        Ok(collect_documents(cursor, USERS).await)
    }

    async fn top_users_by_points(&self, limit: i64) -> Result<Vec<User>, AppError> {
        let cursor = self
            .collection::<User>(USERS)
            .find(doc! {})
            .sort(doc! { "points": -1 })
            .limit(limit)
            .await?;
        Ok(collect_documents(cursor, USERS).await)
    }

    async fn update_profile(
        &self,
        email: &str,
        update: &UpdateProfileRequest,
    ) -> Result<Option<User>, AppError> {
        let mut update_doc = doc! {};

        if let Some(full_name) = &update.full_name {
            update_doc.insert("fullName", full_name.as_str());
        }
        if let Some(mentor_name) = &update.mentor_name {
            update_doc.insert("mentor_name", mentor_name.as_str());
        }
        if let Some(fun_facts) = &update.fun_facts {
            update_doc.insert("fun_facts", fun_facts.as_str());
        }

        let user = self
            .collection::<User>(USERS)
            .find_one_and_update(doc! { "email": email }, doc! { "$set": update_doc })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn set_profile_picture(&self, email: &str, url: &str) -> Result<Option<User>, AppError> {
        let user = self
            .collection::<User>(USERS)
            .find_one_and_update(
                doc! { "email": email },
                doc! { "$set": { "profile_pic": url } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }
}

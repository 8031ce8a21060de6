//! In-memory stores for unit tests.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{BucketListScan, BucketListStore, ImageStore, UserStore};
use crate::models::{AccountType, BucketList, ImageFile, Task, UpdateProfileRequest, User};
use crate::utils::error::AppError;

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    bucket_lists: Mutex<Vec<BucketList>>,
    images: Mutex<Vec<(ImageFile, Vec<u8>)>>,
    pub fail_mentor_updates: AtomicBool,
    pub fail_mentee_updates: AtomicBool,
    pub fail_list_reads: AtomicBool,
    /// Removes the target task just before a completion update, as a concurrent delete would
    pub delete_before_update: AtomicBool,
    /// Stored lists a scan reports as undecodable
    pub unreadable_lists: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account with a placeholder password hash
    pub fn add_user(&self, full_name: &str, account_type: AccountType, mentor_name: Option<&str>) {
        let email = format!("{}@example.com", full_name.to_lowercase());
        self.users.lock().unwrap().push(User {
            id: Some(ObjectId::new()),
            account_type,
            full_name: full_name.to_string(),
            email,
            password_hash: "not-a-real-hash".to_string(),
            mentor_name: mentor_name.map(str::to_string),
            points: 0,
            fun_facts: None,
            profile_pic: None,
        });
    }

    pub fn points(&self, full_name: &str) -> i64 {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.full_name == full_name)
            .map(|u| u.points)
            .unwrap_or_else(|| panic!("no user named {}", full_name))
    }

    pub fn set_points(&self, full_name: &str, points: i64) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.full_name == full_name) {
            user.points = points;
        }
    }

    pub fn insert_bucket_list(&self, list: BucketList) {
        self.bucket_lists.lock().unwrap().push(list);
    }

    pub fn bucket_list_count(&self) -> usize {
        self.bucket_lists.lock().unwrap().len()
    }

    pub fn image_count(&self) -> usize {
        self.images.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        let mut user = user.clone();
        user.id = Some(id);
        self.users.lock().unwrap().push(user);
        Ok(id)
    }

    async fn increment_mentor_points(&self, mentor_name: &str, delta: i64) -> Result<u64, AppError> {
        if self.fail_mentor_updates.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("mentor update failed".to_string()));
        }
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.full_name == mentor_name && u.account_type == AccountType::Mentor)
        {
            Some(mentor) => {
                mentor.points += delta;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn increment_mentee_points(&self, mentor_name: &str, delta: i64) -> Result<u64, AppError> {
        if self.fail_mentee_updates.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("mentee update failed".to_string()));
        }
        let mut matched = 0;
        for user in self.users.lock().unwrap().iter_mut() {
            if user.mentor_name.as_deref() == Some(mentor_name) {
                user.points += delta;
                matched += 1;
            }
        }
        Ok(matched)
    }

    async fn reset_all_points(&self) -> Result<u64, AppError> {
        let mut users = self.users.lock().unwrap();
        for user in users.iter_mut() {
            user.points = 0;
        }
        Ok(users.len() as u64)
    }

    async fn find_users_by_account_type(&self, account_type: AccountType) -> Result<Vec<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.account_type == account_type)
            .cloned()
            .collect())
    }

    async fn find_group_members(&self, mentor_name: &str) -> Result<Vec<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.mentor_name.as_deref() == Some(mentor_name))
            .cloned()
            .collect())
    }

    async fn top_users_by_points(&self, limit: i64) -> Result<Vec<User>, AppError> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.points.cmp(&a.points));
        users.truncate(limit.max(0) as usize);
        Ok(users)
    }

    async fn update_profile(
        &self,
        email: &str,
        update: &UpdateProfileRequest,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.email == email) else {
            return Ok(None);
        };
        if let Some(full_name) = &update.full_name {
            user.full_name = full_name.clone();
        }
        if let Some(mentor_name) = &update.mentor_name {
            user.mentor_name = Some(mentor_name.clone());
        }
        if let Some(fun_facts) = &update.fun_facts {
            user.fun_facts = Some(fun_facts.clone());
        }
        Ok(Some(user.clone()))
    }

    async fn set_profile_picture(&self, email: &str, url: &str) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.email == email).map(|user| {
            user.profile_pic = Some(url.to_string());
            user.clone()
        }))
    }
}

#[async_trait]
impl BucketListStore for MemoryStore {
    async fn find_bucket_list(&self, mentor_name: &str) -> Result<Option<BucketList>, AppError> {
        Ok(self
            .bucket_lists
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.mentor_name == mentor_name)
            .cloned())
    }

    async fn all_bucket_lists(&self) -> Result<Vec<BucketList>, AppError> {
        if self.fail_list_reads.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("bucket list read failed".to_string()));
        }
        Ok(self.bucket_lists.lock().unwrap().clone())
    }

    async fn scan_bucket_lists(&self) -> Result<BucketListScan, AppError> {
        let lists = self.all_bucket_lists().await?;
        Ok(BucketListScan {
            lists,
            unreadable: self.unreadable_lists.load(Ordering::SeqCst),
        })
    }

    async fn ensure_bucket_list(&self, mentor_name: &str) -> Result<(), AppError> {
        let mut lists = self.bucket_lists.lock().unwrap();
        if !lists.iter().any(|l| l.mentor_name == mentor_name) {
            lists.push(BucketList::empty(mentor_name));
        }
        Ok(())
    }

    async fn push_task(&self, mentor_name: &str, task: &Task) -> Result<(), AppError> {
        let mut lists = self.bucket_lists.lock().unwrap();
        match lists.iter_mut().find(|l| l.mentor_name == mentor_name) {
            Some(list) => list.tasks.push(task.clone()),
            None => {
                let mut list = BucketList::empty(mentor_name);
                list.tasks.push(task.clone());
                lists.push(list);
            }
        }
        Ok(())
    }

    async fn set_task_completed(
        &self,
        mentor_name: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<bool, AppError> {
        let mut lists = self.bucket_lists.lock().unwrap();
        if self.delete_before_update.load(Ordering::SeqCst) {
            for list in lists.iter_mut().filter(|l| l.mentor_name == mentor_name) {
                list.tasks.retain(|t| t.id != task_id);
            }
        }
        let task = lists
            .iter_mut()
            .find(|l| l.mentor_name == mentor_name)
            .and_then(|l| l.tasks.iter_mut().find(|t| t.id == task_id));
        match task {
            Some(task) if task.completed != completed => {
                task.completed = completed;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_task(&self, mentor_name: &str, task_id: &str) -> Result<bool, AppError> {
        let mut lists = self.bucket_lists.lock().unwrap();
        let Some(list) = lists.iter_mut().find(|l| l.mentor_name == mentor_name) else {
            return Ok(false);
        };
        let before = list.tasks.len();
        list.tasks.retain(|t| t.id != task_id);
        Ok(list.tasks.len() != before)
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn insert_image(&self, file: &ImageFile, bytes: Vec<u8>) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        let mut file = file.clone();
        file.id = Some(id);
        self.images.lock().unwrap().push((file, bytes));
        Ok(id)
    }

    async fn find_image_file(&self, id: &ObjectId) -> Result<Option<ImageFile>, AppError> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .find(|(f, _)| f.id.as_ref() == Some(id))
            .map(|(f, _)| f.clone()))
    }

    async fn find_image_data(&self, id: &ObjectId) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .find(|(f, _)| f.id.as_ref() == Some(id))
            .map(|(_, bytes)| bytes.clone()))
    }

    async fn find_images_by_user(&self, user_id: &str) -> Result<Vec<ImageFile>, AppError> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|(f, _)| f.metadata.user_id.as_deref() == Some(user_id))
            .map(|(f, _)| f.clone())
            .collect())
    }

    async fn delete_image(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|(f, _)| f.id.as_ref() != Some(id));
        Ok(images.len() != before)
    }
}

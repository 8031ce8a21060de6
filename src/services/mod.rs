pub mod auth_service;
pub mod authorization;
pub mod bucket_list_service;
pub mod image_service;
pub mod points_ledger;
pub mod profile_service;

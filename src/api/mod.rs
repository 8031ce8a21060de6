pub mod auth;
pub mod bucket_list;
pub mod health;
pub mod images;
pub mod metrics;
pub mod profile;
pub mod swagger;

pub mod bucket_list;
pub mod image;
pub mod storage;
pub mod user;

pub use bucket_list::*;
pub use image::*;
pub use storage::*;
pub use user::*;

// Utility functions
pub mod error;
pub mod image_data;

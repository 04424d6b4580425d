pub mod error;
pub mod health;
pub mod tenant;
pub mod upload;

pub use error::AppError;

pub mod auth;
pub mod cache;
pub mod db;
pub mod error;
pub mod handlers;
pub mod matching;
pub mod models;
pub mod notifications;
pub mod workflow;

pub use db::create_pool;
pub use error::ApiError;

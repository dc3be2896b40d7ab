/// API route modules
pub mod auth;
pub mod health;
pub mod posts;
pub mod profile;

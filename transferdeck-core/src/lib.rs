pub mod access;
pub mod auth;
pub mod directory;
pub mod sessions;
mod services;
pub mod store;

pub use services::Services;

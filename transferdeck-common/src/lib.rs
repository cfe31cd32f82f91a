pub mod api;
mod config;
mod data;
mod error;
pub mod helpers;
mod types;
pub mod version;

pub use config::*;
pub use data::*;
pub use error::TransferdeckError;
pub use types::*;

pub type Result<T, E = TransferdeckError> = std::result::Result<T, E>;

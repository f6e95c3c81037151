pub mod config;
pub mod error;

pub use config::ServerConfig;
pub use error::{NluError, Result};

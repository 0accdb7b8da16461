pub mod config;
pub mod entity;
pub mod error;
pub mod time;

pub use config::Config;
pub use entity::*;
pub use error::*;

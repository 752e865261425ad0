pub mod config;
pub mod error;
pub mod style;
pub mod templates;

pub use config::Config;
pub use error::ConfigError;
pub use style::{Numeric, PageSize, StyleConfig, StyleSettings};

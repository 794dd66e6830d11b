pub mod config;
pub mod error;
pub mod types;

pub use config::{DictaConfig, DictationConfig, GeneralConfig};
pub use error::{DictaError, Result};
pub use types::*;

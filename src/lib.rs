pub mod browser;
pub mod cli;
pub mod download;
pub mod error;
pub mod export;
pub mod settings;
pub mod util;

pub use error::{Error, Result};
pub use settings::Settings;

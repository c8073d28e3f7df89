use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::settings::MissingFields;

/// Errors that can abort an export run
#[derive(Error, Debug)]
pub enum Error {
    /// One or more of the five required settings is empty
    #[error("settings incomplete; missing: {0}")]
    SettingsIncomplete(MissingFields),

    /// The site rejected the submitted credentials
    #[error("can't log in: the site did not accept the username or password")]
    LoginRejected,

    /// A UI element did not become interactive within the wait budget
    #[error("timed out after {timeout:?} waiting for {locator}")]
    UiTimeout { locator: String, timeout: Duration },

    /// The save-path argument does not name an existing directory
    #[error("save path is not a directory: {0}")]
    InvalidSavePath(PathBuf),

    #[error(transparent)]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid download url: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode settings: {0}")]
    SettingsEncode(#[from] toml::ser::Error),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a UI timeout error for a locator that never became interactive
    pub fn ui_timeout(locator: impl ToString, timeout: Duration) -> Self {
        Self::UiTimeout {
            locator: locator.to_string(),
            timeout,
        }
    }
}

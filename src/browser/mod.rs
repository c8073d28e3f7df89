use std::fmt;
use std::time::Duration;

use crate::error::Result;

pub mod session;
pub mod webdriver;

pub use session::{LoginState, Session};
pub use webdriver::WebDriverSurface;

/// How a UI element is addressed in the target site's DOM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    Id(&'a str),
    ClassName(&'a str),
    XPath(&'a str),
}

impl fmt::Display for Locator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={id}"),
            Locator::ClassName(class) => write!(f, "class={class}"),
            Locator::XPath(xpath) => write!(f, "xpath={xpath}"),
        }
    }
}

/// An authentication cookie copied out of the live browser session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

/// The capabilities the export sequence needs from a browser.
///
/// Timing policy lives behind `wait_clickable`; the login and export state
/// machines only say which capability gates each transition.
#[allow(async_fn_in_trait)]
pub trait UiSurface {
    /// Navigate to `url`
    async fn open(&self, url: &str) -> Result<()>;

    /// Block until the element is present and interactive, or time out
    async fn wait_clickable(&self, locator: Locator<'_>, timeout: Duration) -> Result<()>;

    /// Click the element
    async fn click(&self, locator: Locator<'_>) -> Result<()>;

    /// Type `text` into the element
    async fn type_into(&self, locator: Locator<'_>, text: &str) -> Result<()>;

    /// Text content of the element, or `None` if it is not in the DOM
    async fn element_text(&self, locator: Locator<'_>) -> Result<Option<String>>;

    /// Choose the option with the given value in a `<select>` element
    async fn select_value(&self, locator: Locator<'_>, value: &str) -> Result<()>;

    /// Every cookie the session currently holds
    async fn cookies(&self) -> Result<Vec<SessionCookie>>;

    /// Close the browser
    async fn close(&self) -> Result<()>;
}

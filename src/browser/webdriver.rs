use std::time::Duration;
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;

use super::{Locator, SessionCookie, UiSurface};
use crate::error::{Error, Result};

/// Poll interval for element waits
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A real browser behind a WebDriver endpoint (chromedriver, selenium, ...)
pub struct WebDriverSurface {
    driver: WebDriver,
}

impl WebDriverSurface {
    /// Start a Chrome session against `endpoint` and maximize the window
    pub async fn launch(endpoint: &str) -> Result<Self> {
        let caps = DesiredCapabilities::chrome();
        let driver = WebDriver::new(endpoint, caps).await?;
        driver.maximize_window().await?;
        Ok(Self { driver })
    }

    fn by(locator: Locator<'_>) -> By {
        match locator {
            Locator::Id(id) => By::Id(id),
            Locator::ClassName(class) => By::ClassName(class),
            Locator::XPath(xpath) => By::XPath(xpath),
        }
    }
}

impl UiSurface for WebDriverSurface {
    async fn open(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn wait_clickable(&self, locator: Locator<'_>, timeout: Duration) -> Result<()> {
        let elem = self
            .driver
            .query(Self::by(locator))
            .wait(timeout, POLL_INTERVAL)
            .first()
            .await
            .map_err(|_| Error::ui_timeout(locator, timeout))?;

        elem.wait_until()
            .wait(timeout, POLL_INTERVAL)
            .clickable()
            .await
            .map_err(|_| Error::ui_timeout(locator, timeout))?;

        Ok(())
    }

    async fn click(&self, locator: Locator<'_>) -> Result<()> {
        self.driver.find(Self::by(locator)).await?.click().await?;
        Ok(())
    }

    async fn type_into(&self, locator: Locator<'_>, text: &str) -> Result<()> {
        self.driver
            .find(Self::by(locator))
            .await?
            .send_keys(text)
            .await?;
        Ok(())
    }

    async fn element_text(&self, locator: Locator<'_>) -> Result<Option<String>> {
        let found = self.driver.find_all(Self::by(locator)).await?;
        match found.first() {
            Some(elem) => Ok(Some(elem.text().await?)),
            None => Ok(None),
        }
    }

    async fn select_value(&self, locator: Locator<'_>, value: &str) -> Result<()> {
        let elem = self.driver.find(Self::by(locator)).await?;
        SelectElement::new(&elem).await?.select_by_value(value).await?;
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<SessionCookie>> {
        let cookies = self.driver.get_all_cookies().await?;
        Ok(cookies
            .into_iter()
            .map(|cookie| SessionCookie {
                name: cookie.name,
                value: cookie.value,
            })
            .collect())
    }

    async fn close(&self) -> Result<()> {
        // WebDriver is a cheap clone over the shared session handle; quit()
        // consumes one and ends the session server-side.
        self.driver.clone().quit().await?;
        Ok(())
    }
}

use std::path::Path;

use async_trait::async_trait;
use thirtyfour::{prelude::*, ChromiumLikeCapabilities};

use crate::{configuration::WebDriverSettings, domain::locator::Locator};

use super::{DriverError, PageDriver};

/// A live Chrome session behind a WebDriver server.
pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &WebDriverSettings) -> Result<Self, DriverError> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }
        caps.add_arg(&format!(
            "--window-size={},{}",
            settings.window_width, settings.window_height
        ))?;

        log::info!("Connecting to webdriver at {}", settings.server_url);
        let driver = WebDriver::new(&settings.server_url, caps).await?;

        Ok(Droid { driver })
    }

    /// End the browser session.
    pub async fn quit(self) -> Result<(), DriverError> {
        self.driver.quit().await?;
        Ok(())
    }
}

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(s) => By::Css(s.clone()),
        Locator::XPath(s) => By::XPath(s.clone()),
    }
}

#[async_trait]
impl PageDriver for Droid {
    type Element = WebElement;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn ready_state(&self) -> Result<String, DriverError> {
        let ret = self
            .driver
            .execute("return document.readyState;", vec![])
            .await?;
        Ok(ret.json().as_str().unwrap_or_default().to_string())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<WebElement>, DriverError> {
        Ok(self.driver.find_all(by(locator)).await?)
    }

    async fn find_all_in(
        &self,
        parent: &WebElement,
        locator: &Locator,
    ) -> Result<Vec<WebElement>, DriverError> {
        Ok(parent.find_all(by(locator)).await?)
    }

    async fn text(&self, element: &WebElement) -> Result<String, DriverError> {
        Ok(element.text().await?)
    }

    async fn attribute(
        &self,
        element: &WebElement,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        Ok(element.attr(name).await?)
    }

    async fn click(&self, element: &WebElement) -> Result<(), DriverError> {
        element.click().await?;
        Ok(())
    }

    async fn clear(&self, element: &WebElement) -> Result<(), DriverError> {
        element.send_keys(Key::Control + "a").await?;
        element.clear().await?;
        Ok(())
    }

    async fn type_text(&self, element: &WebElement, text: &str) -> Result<(), DriverError> {
        element.send_keys(text).await?;
        Ok(())
    }

    async fn submit(&self, element: &WebElement) -> Result<(), DriverError> {
        element.send_keys(Key::Enter + "").await?;
        Ok(())
    }

    async fn document(&self) -> Result<WebElement, DriverError> {
        Ok(self.driver.find(By::Tag("html")).await?)
    }

    async fn is_stale(&self, element: &WebElement) -> Result<bool, DriverError> {
        Ok(!element.is_present().await?)
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriverError> {
        self.driver.screenshot(path).await?;
        Ok(())
    }
}

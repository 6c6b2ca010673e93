use std::{path::Path, time::Duration};

use async_trait::async_trait;

use crate::domain::locator::Locator;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("webdriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("browser session failed: {0}")]
    Session(String),
}

/// Everything the navigator and extractor need from a browser session.
///
/// Lookups return an empty result when nothing matches; an `Err` means the
/// session itself misbehaved.
#[async_trait]
pub trait PageDriver: Send + Sync {
    type Element: Send + Sync;

    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// `document.readyState` of the current page.
    async fn ready_state(&self) -> Result<String, DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, DriverError>;

    async fn find_all_in(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>, DriverError>;

    async fn text(&self, element: &Self::Element) -> Result<String, DriverError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    async fn click(&self, element: &Self::Element) -> Result<(), DriverError>;

    /// Select whatever is in the field and wipe it.
    async fn clear(&self, element: &Self::Element) -> Result<(), DriverError>;

    async fn type_text(&self, element: &Self::Element, text: &str) -> Result<(), DriverError>;

    /// Submit the form owning `element`, as pressing Enter would.
    async fn submit(&self, element: &Self::Element) -> Result<(), DriverError>;

    /// Root element of the current document. Goes stale once the browser
    /// navigates away, which is how navigation is detected.
    async fn document(&self) -> Result<Self::Element, DriverError>;

    async fn is_stale(&self, element: &Self::Element) -> Result<bool, DriverError>;

    async fn screenshot(&self, path: &Path) -> Result<(), DriverError>;

    async fn find(&self, locator: &Locator) -> Result<Option<Self::Element>, DriverError> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    async fn find_in(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Option<Self::Element>, DriverError> {
        Ok(self.find_all_in(parent, locator).await?.into_iter().next())
    }
}

#[derive(Debug)]
pub enum NavigationOutcome {
    Navigated,
    TimedOut,
    Failed(DriverError),
}

/// Wait for the page behind `marker` to be replaced by a new, interactive
/// document, or for `timeout` to elapse, whichever comes first.
pub async fn await_navigation<D: PageDriver>(
    driver: &D,
    marker: &D::Element,
    timeout: Duration,
    poll: Duration,
) -> NavigationOutcome {
    let navigation = async {
        loop {
            if driver.is_stale(marker).await? && is_interactive(&driver.ready_state().await?) {
                return Ok::<(), DriverError>(());
            }
            tokio::time::sleep(poll).await;
        }
    };

    match tokio::time::timeout(timeout, navigation).await {
        Ok(Ok(())) => NavigationOutcome::Navigated,
        Ok(Err(e)) => NavigationOutcome::Failed(e),
        Err(_) => NavigationOutcome::TimedOut,
    }
}

/// Wait for the current document to become interactive.
pub async fn await_ready<D: PageDriver>(
    driver: &D,
    timeout: Duration,
    poll: Duration,
) -> NavigationOutcome {
    let ready = async {
        while !is_interactive(&driver.ready_state().await?) {
            tokio::time::sleep(poll).await;
        }
        Ok::<(), DriverError>(())
    };

    match tokio::time::timeout(timeout, ready).await {
        Ok(Ok(())) => NavigationOutcome::Navigated,
        Ok(Err(e)) => NavigationOutcome::Failed(e),
        Err(_) => NavigationOutcome::TimedOut,
    }
}

pub fn is_interactive(ready_state: &str) -> bool {
    matches!(ready_state, "interactive" | "complete")
}

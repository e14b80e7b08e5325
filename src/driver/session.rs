//! Live Chrome session over thirtyfour.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tokio::time::{Instant, sleep};
use tracing::info;

use crate::driver::{DriverError, DriverResult, Target, UiDriver, UiElement};
use crate::selectors::{WINDOW_HEIGHT, WINDOW_WIDTH};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn wrap(e: WebDriverError) -> DriverError {
    DriverError::Session(e.into())
}

fn to_by(target: &Target) -> By {
    match target {
        Target::Css(s) => By::Css(s),
        Target::XPath(s) => By::XPath(s),
        Target::Name(s) => By::Name(s),
        Target::Id(s) => By::Id(s),
    }
}

pub struct Session {
    driver: WebDriver,
}

impl Session {
    /// Connect to a running chromedriver and open the automation window.
    /// The session is never quit by this tool; the window stays open for
    /// manual inspection after the run, successful or not.
    pub async fn connect(webdriver_url: &str, headless: bool) -> DriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.set_headless().map_err(wrap)?;
        }
        caps.add_arg("--no-sandbox").map_err(wrap)?;
        caps.add_arg("--disable-dev-shm-usage").map_err(wrap)?;
        caps.add_arg("--disable-gpu").map_err(wrap)?;
        caps.add_arg("--disable-notifications").map_err(wrap)?;

        let driver = WebDriver::new(webdriver_url, caps).await.map_err(wrap)?;
        driver
            .set_window_rect(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT)
            .await
            .map_err(wrap)?;

        info!("browser session ready at {webdriver_url}");
        Ok(Session { driver })
    }
}

pub struct SessionElement {
    inner: WebElement,
}

#[async_trait]
impl UiElement for SessionElement {
    async fn click(&self) -> DriverResult<()> {
        self.inner.click().await.map_err(wrap)
    }

    async fn text(&self) -> DriverResult<String> {
        self.inner.text().await.map_err(wrap)
    }

    async fn attr(&self, name: &str) -> DriverResult<Option<String>> {
        self.inner.attr(name).await.map_err(wrap)
    }

    async fn clear(&self) -> DriverResult<()> {
        self.inner.clear().await.map_err(wrap)
    }

    async fn type_text(&self, text: &str) -> DriverResult<()> {
        self.inner.send_keys(text).await.map_err(wrap)
    }

    async fn scroll_into_view(&self) -> DriverResult<()> {
        self.inner.scroll_into_view().await.map_err(wrap)
    }
}

#[async_trait]
impl UiDriver for Session {
    type Element = SessionElement;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.driver.goto(url).await.map_err(wrap)
    }

    async fn wait_visible(
        &self,
        target: &Target,
        timeout: Duration,
    ) -> DriverResult<Self::Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(el) = self.driver.find(to_by(target)).await {
                if el.is_displayed().await.unwrap_or(false) {
                    return Ok(SessionElement { inner: el });
                }
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(target.to_string()));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_clickable(
        &self,
        target: &Target,
        timeout: Duration,
    ) -> DriverResult<Self::Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(el) = self.driver.find(to_by(target)).await {
                let displayed = el.is_displayed().await.unwrap_or(false);
                let enabled = el.is_enabled().await.unwrap_or(false);
                if displayed && enabled {
                    return Ok(SessionElement { inner: el });
                }
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(target.to_string()));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_invisible(&self, target: &Target, timeout: Duration) -> DriverResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let gone = match self.driver.find(to_by(target)).await {
                Ok(el) => !el.is_displayed().await.unwrap_or(false),
                Err(_) => true,
            };
            if gone {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(format!("{target} to disappear")));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn find_all(&self, target: &Target) -> DriverResult<Vec<Self::Element>> {
        let elements = self.driver.find_all(to_by(target)).await.map_err(wrap)?;
        Ok(elements
            .into_iter()
            .map(|inner| SessionElement { inner })
            .collect())
    }

    async fn execute_on(&self, script: &str, element: &Self::Element) -> DriverResult<()> {
        let args: Vec<Value> = vec![element.inner.to_json().map_err(wrap)?];
        self.driver
            .execute(script, Arc::from(args))
            .await
            .map_err(wrap)?;
        Ok(())
    }
}

//! The UI driver seam.
//!
//! The booking flow never talks to thirtyfour directly; it goes through
//! [`UiDriver`]/[`UiElement`] so the slot engine can run against a scripted
//! fake in tests. [`Session`](session::Session) is the production
//! implementation over a live Chrome session.

pub mod session;

#[cfg(test)]
pub mod fake;

use std::time::Duration;

use async_trait::async_trait;

/// Element locator, resolved by the driver implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Css(String),
    XPath(String),
    Name(String),
    Id(String),
}

impl Target {
    pub fn css(s: &str) -> Self {
        Target::Css(s.to_string())
    }

    pub fn xpath(s: &str) -> Self {
        Target::XPath(s.to_string())
    }

    pub fn name(s: &str) -> Self {
        Target::Name(s.to_string())
    }

    pub fn id(s: &str) -> Self {
        Target::Id(s.to_string())
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Css(s) => write!(f, "css {s}"),
            Target::XPath(s) => write!(f, "xpath {s}"),
            Target::Name(s) => write!(f, "name {s}"),
            Target::Id(s) => write!(f, "id {s}"),
        }
    }
}

/// Driver failures. `Timeout` is its own variant because the slot engine
/// classifies "no matching option within the bound" as an expected empty
/// result; every other failure stays opaque and propagates.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("driver session error: {0}")]
    Session(#[source] anyhow::Error),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout(_))
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// A handle to a rendered element. Handles go stale whenever the remote UI
/// re-renders; callers re-query instead of caching them across interactions.
#[async_trait]
pub trait UiElement: Send + Sync {
    async fn click(&self) -> DriverResult<()>;

    async fn text(&self) -> DriverResult<String>;

    async fn attr(&self, name: &str) -> DriverResult<Option<String>>;

    async fn clear(&self) -> DriverResult<()>;

    async fn type_text(&self, text: &str) -> DriverResult<()>;

    async fn scroll_into_view(&self) -> DriverResult<()>;
}

/// One browser session. All waits are bounded; expiry raises
/// [`DriverError::Timeout`].
#[async_trait]
pub trait UiDriver: Send + Sync {
    type Element: UiElement;

    async fn goto(&self, url: &str) -> DriverResult<()>;

    /// Wait until the target is present and displayed.
    async fn wait_visible(&self, target: &Target, timeout: Duration)
    -> DriverResult<Self::Element>;

    /// Wait until the target is displayed and enabled.
    async fn wait_clickable(
        &self,
        target: &Target,
        timeout: Duration,
    ) -> DriverResult<Self::Element>;

    /// Wait until no displayed element matches the target.
    async fn wait_invisible(&self, target: &Target, timeout: Duration) -> DriverResult<()>;

    /// All current matches, in document order. The returned list is a
    /// snapshot; a fresh call is required after the UI re-renders.
    async fn find_all(&self, target: &Target) -> DriverResult<Vec<Self::Element>>;

    /// Run a script with the element bound as `arguments[0]`.
    async fn execute_on(&self, script: &str, element: &Self::Element) -> DriverResult<()>;
}

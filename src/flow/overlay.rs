//! Overlay guard.
//!
//! The site renders a transient modal backdrop after nearly every state
//! transition, and clicks landing on an active backdrop are silently
//! swallowed. Every click-producing step goes through [`safe_click`].

use std::time::Duration;

use tokio::time::sleep;

use crate::driver::{DriverResult, Target, UiDriver};
use crate::flow::{OVERLAY_WAIT, SETTLE};
use crate::selectors::OVERLAY_BACKDROP;

pub(crate) const JS_CLICK: &str = "arguments[0].click();";
pub(crate) const JS_SCROLL_CENTER: &str = "arguments[0].scrollIntoView({block:'center'});";

/// Block until no backdrop is covering the page.
pub async fn await_interactable<D: UiDriver>(ui: &D, timeout: Duration) -> DriverResult<()> {
    ui.wait_invisible(&Target::css(OVERLAY_BACKDROP), timeout)
        .await
}

/// Overlay-guarded click: wait out the backdrop, scroll the element to the
/// viewport center, click through script, then give the re-render a moment.
pub async fn safe_click<D: UiDriver>(ui: &D, element: &D::Element) -> DriverResult<()> {
    await_interactable(ui, OVERLAY_WAIT).await?;
    ui.execute_on(JS_SCROLL_CENTER, element).await?;
    ui.execute_on(JS_CLICK, element).await?;
    sleep(SETTLE).await;
    Ok(())
}

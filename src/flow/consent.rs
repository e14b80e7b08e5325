//! Terms-of-service gate.

use tracing::{info, warn};

use crate::driver::{DriverResult, Target, UiDriver};
use crate::error::BookingError;
use crate::flow::{ELEMENT_WAIT, OVERLAY_WAIT, overlay};
use crate::selectors::{AGREE_BUTTON_XPATH, OVERLAY_BACKDROP, TERMS_CONTAINER};

const MAX_ATTEMPTS: u32 = 5;

const JS_SCROLL_TO_END: &str = "arguments[0].scrollTop = arguments[0].scrollHeight;";

/// Accept the terms dialog. The site only arms the agree control once the
/// terms container has been scrolled through, and the click only counts once
/// the backdrop clears afterwards; the whole sequence is retried as a unit.
pub async fn accept_terms<D: UiDriver>(ui: &D) -> Result<(), BookingError> {
    for attempt in 1..=MAX_ATTEMPTS {
        match try_accept(ui).await {
            Ok(()) => {
                info!("terms accepted on attempt {attempt}");
                return Ok(());
            }
            Err(e) => warn!("consent attempt {attempt} failed: {e}"),
        }
    }
    Err(BookingError::ConsentFailure {
        attempts: MAX_ATTEMPTS,
    })
}

async fn try_accept<D: UiDriver>(ui: &D) -> DriverResult<()> {
    let terms = ui
        .wait_visible(&Target::css(TERMS_CONTAINER), ELEMENT_WAIT)
        .await?;
    ui.execute_on(JS_SCROLL_TO_END, &terms).await?;

    let agree = ui
        .wait_visible(&Target::xpath(AGREE_BUTTON_XPATH), ELEMENT_WAIT)
        .await?;
    ui.execute_on(overlay::JS_CLICK, &agree).await?;

    // the click registered only if the backdrop goes away
    ui.wait_invisible(&Target::css(OVERLAY_BACKDROP), OVERLAY_WAIT)
        .await
}

//! Payment trigger, gateway handoff and transaction-id recovery.

use tracing::{info, warn};

use crate::driver::{DriverResult, Target, UiDriver, UiElement};
use crate::error::BookingError;
use crate::flow::ELEMENT_WAIT;
use crate::selectors::{BANK_LOGO, GATEWAY_CONTINUE_URL, PAY_BUTTON_XPATH, TRANS_ID_INPUT};

pub async fn trigger_payment<D: UiDriver>(ui: &D) -> Result<(), BookingError> {
    let pay = ui
        .wait_clickable(&Target::xpath(PAY_BUTTON_XPATH), ELEMENT_WAIT)
        .await
        .map_err(BookingError::PaymentHandoff)?;
    pay.click().await.map_err(BookingError::PaymentHandoff)?;
    info!("payment triggered");
    Ok(())
}

/// Click through to the external gateway. There is no recovery path once the
/// invoice exists, so a missing logo is fatal.
pub async fn open_gateway<D: UiDriver>(ui: &D) -> Result<(), BookingError> {
    let logo = ui
        .wait_clickable(&Target::css(BANK_LOGO), ELEMENT_WAIT)
        .await
        .map_err(BookingError::PaymentHandoff)?;
    logo.scroll_into_view()
        .await
        .map_err(BookingError::PaymentHandoff)?;
    logo.click().await.map_err(BookingError::PaymentHandoff)?;
    info!("handed off to the payment gateway");
    Ok(())
}

/// Best effort only. The booking already succeeded; a missing transaction id
/// must never mask that.
pub async fn recover_transaction_id<D: UiDriver>(ui: &D) {
    match read_transaction_id(ui).await {
        Ok(Some(id)) => info!("transaction: {GATEWAY_CONTINUE_URL}{id}"),
        Ok(None) => warn!("transaction id field was empty"),
        Err(e) => warn!("could not recover the transaction id: {e}"),
    }
}

async fn read_transaction_id<D: UiDriver>(ui: &D) -> DriverResult<Option<String>> {
    let input = ui
        .wait_visible(&Target::css(TRANS_ID_INPUT), ELEMENT_WAIT)
        .await?;
    input.attr("value").await
}

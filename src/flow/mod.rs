//! The booking flow, step by step: consent, identity, slot search, payment,
//! transaction recovery. Only the slot search iterates; everything else is a
//! straight line over the driver session.

pub mod consent;
pub mod identity;
pub mod overlay;
pub mod payment;
pub mod slots;

use std::time::Duration;

use tracing::info;

use crate::driver::UiDriver;
use crate::error::BookingError;
use crate::models::booking::{BookingRequest, ChosenSlot};
use crate::selectors;

/// Standard bound for element waits, matching the site's slowest renders.
pub(crate) const ELEMENT_WAIT: Duration = Duration::from_secs(5);

/// Bound for the invoice marker after a reservation attempt. Kept short:
/// a slot that was really booked shows the invoice well within this.
pub(crate) const CONFIRM_WAIT: Duration = Duration::from_secs(5);

/// Bound for the modal backdrop to clear.
pub(crate) const OVERLAY_WAIT: Duration = Duration::from_secs(5);

/// Pause after each click; option re-renders are asynchronous to the click.
pub(crate) const SETTLE: Duration = Duration::from_millis(200);

/// Interval for option-list polling.
pub(crate) const POLL: Duration = Duration::from_millis(250);

pub async fn run<D: UiDriver>(
    ui: &D,
    request: &BookingRequest,
    max_rounds: Option<u32>,
) -> Result<ChosenSlot, BookingError> {
    ui.goto(selectors::BOOKING_URL).await?;

    consent::accept_terms(ui).await?;
    identity::fill_identity(ui, request).await?;

    let mut engine = slots::SlotEngine::new(ui, request, max_rounds);
    let slot = engine.run().await?;

    payment::trigger_payment(ui).await?;
    payment::open_gateway(ui).await?;
    payment::recover_transaction_id(ui).await;

    info!(
        "booked {} on {} at {}",
        slot.city,
        slot.date.format(crate::models::booking::DATE_FORMAT),
        slot.time
    );
    Ok(slot)
}

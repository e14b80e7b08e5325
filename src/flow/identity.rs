//! Applicant identity form.

use tracing::info;

use crate::driver::{DriverResult, Target, UiDriver, UiElement};
use crate::error::BookingError;
use crate::flow::{ELEMENT_WAIT, OVERLAY_WAIT, overlay};
use crate::models::booking::BookingRequest;
use crate::selectors::{
    self, CATEGORY_SELECT_ID, PERSONAL_NUMBER_FIELD, PHONE_NUMBER_FIELD, SEARCH_BUTTON,
};

/// Fill the personal number, run the lookup, fill the phone number and pick
/// the service category. There is no retry at this step; any failure aborts
/// the run.
pub async fn fill_identity<D: UiDriver>(
    ui: &D,
    request: &BookingRequest,
) -> Result<(), BookingError> {
    fill(ui, request).await.map_err(BookingError::IdentityFill)
}

async fn fill<D: UiDriver>(ui: &D, request: &BookingRequest) -> DriverResult<()> {
    let personal = ui
        .wait_clickable(&Target::name(PERSONAL_NUMBER_FIELD), ELEMENT_WAIT)
        .await?;
    personal.clear().await?;
    personal.type_text(&request.personal_number).await?;

    click_search(ui).await?;

    let phone = ui
        .wait_clickable(&Target::name(PHONE_NUMBER_FIELD), ELEMENT_WAIT)
        .await?;
    phone.clear().await?;
    phone.type_text(&request.phone_number).await?;

    let category = ui
        .wait_clickable(&Target::id(CATEGORY_SELECT_ID), ELEMENT_WAIT)
        .await?;
    category.click().await?;

    // labels carry extra decoration around the category code
    let option = ui
        .wait_clickable(
            &selectors::option_with_label(&request.category),
            ELEMENT_WAIT,
        )
        .await?;
    option.click().await?;

    info!("identity filled, category {}", request.category);
    Ok(())
}

async fn click_search<D: UiDriver>(ui: &D) -> DriverResult<()> {
    overlay::await_interactable(ui, OVERLAY_WAIT).await?;
    let search = ui
        .wait_clickable(&Target::css(SEARCH_BUTTON), ELEMENT_WAIT)
        .await?;
    search.scroll_into_view().await?;
    ui.execute_on(overlay::JS_CLICK, &search).await
}

//! Slot selection: the city → date → time search loop.
//!
//! The option sets the site renders are coupled to the previously selected
//! city, and several controls only have index-based ids, so a failed date or
//! time phase restarts the whole round from city selection rather than
//! retrying in place. Option lists are re-read from the live document on
//! every probe; handles from before a re-render are never reused.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::driver::{DriverError, DriverResult, Target, UiDriver, UiElement};
use crate::error::BookingError;
use crate::flow::{CONFIRM_WAIT, ELEMENT_WAIT, OVERLAY_WAIT, POLL, overlay};
use crate::models::booking::{BookingRequest, ChosenSlot, DATE_FORMAT};
use crate::models::session::{SessionState, Step};
use crate::selectors::{
    self, CITY_SELECT_XPATH, CLEAR_OPTION_LABEL, DATE_OPTION, DATE_SELECT_ID,
    INVOICE_MARKER_XPATH, RESERVE_BUTTON_XPATH, TIME_OPTION_XPATH, TIME_SELECT_ID,
};

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").unwrap());

/// Option labels render with stray whitespace around and inside them.
fn squash(text: &str) -> String {
    text.split_whitespace().collect()
}

pub struct SlotEngine<'a, D: UiDriver> {
    ui: &'a D,
    request: &'a BookingRequest,
    max_rounds: Option<u32>,
    state: SessionState,
}

impl<'a, D: UiDriver> SlotEngine<'a, D> {
    pub fn new(ui: &'a D, request: &'a BookingRequest, max_rounds: Option<u32>) -> Self {
        SlotEngine {
            ui,
            request,
            max_rounds,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Loop until a slot is confirmed. Unbounded by default: availability
    /// changes over time and the caller expects the search to keep polling.
    /// With a configured round cap, exhaustion is a fatal error.
    pub async fn run(&mut self) -> Result<ChosenSlot, BookingError> {
        let mut rounds = 0u32;
        loop {
            if let Some(cap) = self.max_rounds {
                if rounds >= cap {
                    return Err(BookingError::SearchExhausted { rounds });
                }
            }
            rounds += 1;
            self.state.begin_round();

            self.select_city().await?;

            self.state.enter(Step::SelectDate);
            let Some(date) = self.choose_date_in_range().await? else {
                info!(
                    "no available dates in {}..{}, restarting from city selection",
                    self.request.min_date.format(DATE_FORMAT),
                    self.request.max_date.format(DATE_FORMAT)
                );
                continue;
            };
            self.state.date = Some(date);

            self.state.enter(Step::SelectTime);
            let Some(time) = self.try_first_available_time().await? else {
                info!("no bookable time on {date}, restarting from city selection");
                continue;
            };
            self.state.time = Some(time.clone());
            self.state.enter(Step::Confirmed);
            debug!("{}", self.state.describe());

            return Ok(ChosenSlot {
                city: self.request.city.clone(),
                date,
                time,
            });
        }
    }

    async fn select_city(&mut self) -> DriverResult<()> {
        self.state.enter(Step::SelectCity);
        let select = self
            .ui
            .wait_visible(&Target::xpath(CITY_SELECT_XPATH), ELEMENT_WAIT)
            .await?;
        overlay::safe_click(self.ui, &select).await?;

        let option = self
            .ui
            .wait_visible(&selectors::city_option(&self.request.city), ELEMENT_WAIT)
            .await?;
        overlay::safe_click(self.ui, &option).await?;

        info!("selected city {}", self.request.city);
        self.state.city = Some(self.request.city.clone());
        Ok(())
    }

    /// Pick the first date option, in document order, that falls inside the
    /// requested range. `Ok(None)` covers both "no dates rendered at all"
    /// (the option wait timing out) and "dates rendered, none in range";
    /// neither is an error.
    async fn choose_date_in_range(&mut self) -> Result<Option<NaiveDate>, DriverError> {
        overlay::await_interactable(self.ui, OVERLAY_WAIT).await?;
        let select = self
            .ui
            .wait_visible(&Target::id(DATE_SELECT_ID), ELEMENT_WAIT)
            .await?;
        overlay::safe_click(self.ui, &select).await?;

        let options = match self.wait_for_date_options().await {
            Ok(options) => options,
            Err(e) if e.is_timeout() => {
                info!("no dates offered");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        for (label, option) in &options {
            if label == CLEAR_OPTION_LABEL || !DATE_PATTERN.is_match(label) {
                continue;
            }
            let Ok(date) = NaiveDate::parse_from_str(label, DATE_FORMAT) else {
                continue;
            };
            if self.request.date_in_range(date) {
                overlay::safe_click(self.ui, option).await?;
                info!("selected date {label}");
                return Ok(Some(date));
            }
        }
        Ok(None)
    }

    /// Wait until the date dropdown shows at least one date-shaped option.
    async fn wait_for_date_options(&self) -> DriverResult<Vec<(String, D::Element)>> {
        let deadline = Instant::now() + ELEMENT_WAIT;
        loop {
            let options = self.ui.find_all(&Target::css(DATE_OPTION)).await?;
            let mut labeled = Vec::with_capacity(options.len());
            let mut any_date = false;
            for option in options {
                let label = squash(&option.text().await?);
                if DATE_PATTERN.is_match(&label) {
                    any_date = true;
                }
                labeled.push((label, option));
            }
            if any_date {
                return Ok(labeled);
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout("date options".into()));
            }
            sleep(POLL).await;
        }
    }

    /// Probe time options in document order until one survives confirmation.
    /// A rejected option means another party raced us to it; the list is
    /// re-read after every rejection because the rejection re-renders it.
    /// The probe never attempts more than the originally rendered count.
    async fn try_first_available_time(&mut self) -> Result<Option<String>, DriverError> {
        self.open_time_select().await?;

        let mut options = match self.wait_for_time_options().await {
            Ok(options) => options,
            Err(e) if e.is_timeout() => {
                info!("no times offered");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let total = options.len();
        for index in 0..total {
            let Some((label, option)) = options.get(index) else {
                // the list shrank past our cursor while we were probing
                break;
            };
            let label = label.clone();

            overlay::safe_click(self.ui, option).await?;
            info!("trying time {label}");
            self.click_reserve().await?;

            if self.invoice_visible().await? {
                info!("time {label} confirmed");
                return Ok(Some(label));
            }

            warn!("time {label} was taken, trying the next one");
            self.open_time_select().await?;
            options = self.read_time_options().await?;
        }
        Ok(None)
    }

    async fn open_time_select(&self) -> DriverResult<()> {
        let select = self
            .ui
            .wait_clickable(&Target::id(TIME_SELECT_ID), ELEMENT_WAIT)
            .await?;
        select.scroll_into_view().await?;
        select.click().await
    }

    /// Wait until the time dropdown shows at least one real option.
    async fn wait_for_time_options(&self) -> DriverResult<Vec<(String, D::Element)>> {
        let deadline = Instant::now() + ELEMENT_WAIT;
        loop {
            let options = self.read_time_options().await?;
            if !options.is_empty() {
                return Ok(options);
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout("time options".into()));
            }
            sleep(POLL).await;
        }
    }

    /// Current non-clear time options, in document order.
    async fn read_time_options(&self) -> DriverResult<Vec<(String, D::Element)>> {
        let options = self.ui.find_all(&Target::xpath(TIME_OPTION_XPATH)).await?;
        let mut labeled = Vec::with_capacity(options.len());
        for option in options {
            let label = squash(&option.text().await?);
            if label.is_empty() || label == CLEAR_OPTION_LABEL {
                continue;
            }
            labeled.push((label, option));
        }
        Ok(labeled)
    }

    async fn click_reserve(&self) -> DriverResult<()> {
        let button = self
            .ui
            .wait_clickable(&Target::xpath(RESERVE_BUTTON_XPATH), ELEMENT_WAIT)
            .await?;
        button.scroll_into_view().await?;
        self.ui.execute_on(overlay::JS_CLICK, &button).await
    }

    async fn invoice_visible(&self) -> DriverResult<bool> {
        match self
            .ui
            .wait_visible(&Target::xpath(INVOICE_MARKER_XPATH), CONFIRM_WAIT)
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

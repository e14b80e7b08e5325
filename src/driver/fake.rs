//! Scripted driver for tests.
//!
//! `FakeUi` resolves the real selector constants to roles, plays back
//! configured date/time option rounds, and records every interaction so
//! tests can assert on ordering and restart behavior.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::{DriverError, DriverResult, Target, UiDriver, UiElement};
use crate::selectors::{
    AGREE_BUTTON_XPATH, BANK_LOGO, CATEGORY_SELECT_ID, CITY_SELECT_XPATH, DATE_OPTION,
    DATE_SELECT_ID, INVOICE_MARKER_XPATH, OVERLAY_BACKDROP, PAY_BUTTON_XPATH,
    PERSONAL_NUMBER_FIELD, PHONE_NUMBER_FIELD, RESERVE_BUTTON_XPATH, SEARCH_BUTTON,
    TERMS_CONTAINER, TIME_OPTION_XPATH, TIME_SELECT_ID, TRANS_ID_INPUT,
};

#[derive(Debug, Clone, PartialEq)]
enum Role {
    Named(String),
    Overlay,
    CityOption(String),
    DateSelect,
    DateOptions,
    DateOption(String),
    TimeSelect,
    TimeOptions,
    TimeOption(String),
    Invoice,
}

impl Role {
    fn name(&self) -> String {
        match self {
            Role::Named(name) => name.clone(),
            Role::Overlay => "overlay".into(),
            Role::CityOption(frag) => format!("city:{frag}"),
            Role::DateSelect => "date-select".into(),
            Role::DateOptions => "date-options".into(),
            Role::DateOption(label) => format!("date:{label}"),
            Role::TimeSelect => "time-select".into(),
            Role::TimeOptions => "time-options".into(),
            Role::TimeOption(label) => format!("time:{label}"),
            Role::Invoice => "invoice".into(),
        }
    }
}

fn classify(target: &Target) -> Role {
    match target {
        Target::Css(s) if s == OVERLAY_BACKDROP => Role::Overlay,
        Target::Css(s) if s == TERMS_CONTAINER => Role::Named("terms".into()),
        Target::Css(s) if s == SEARCH_BUTTON => Role::Named("search".into()),
        Target::Css(s) if s == DATE_OPTION => Role::DateOptions,
        Target::Css(s) if s == BANK_LOGO => Role::Named("bank-logo".into()),
        Target::Css(s) if s == TRANS_ID_INPUT => Role::Named("trans-id".into()),
        Target::XPath(s) if s == AGREE_BUTTON_XPATH => Role::Named("agree".into()),
        Target::XPath(s) if s == CITY_SELECT_XPATH => Role::Named("city-select".into()),
        Target::XPath(s) if s == TIME_OPTION_XPATH => Role::TimeOptions,
        Target::XPath(s) if s == RESERVE_BUTTON_XPATH => Role::Named("reserve".into()),
        Target::XPath(s) if s == INVOICE_MARKER_XPATH => Role::Invoice,
        Target::XPath(s) if s == PAY_BUTTON_XPATH => Role::Named("pay".into()),
        Target::XPath(s) => {
            if let Some(frag) = s
                .strip_prefix("//mat-option//span[contains(text(),'")
                .and_then(|rest| rest.strip_suffix("')]"))
            {
                Role::CityOption(frag.to_string())
            } else if let Some(frag) = s
                .strip_prefix("//span[contains(text(),'")
                .and_then(|rest| rest.strip_suffix("')]"))
            {
                Role::Named(format!("option:{frag}"))
            } else {
                Role::Named(format!("xpath:{s}"))
            }
        }
        Target::Name(s) if s == PERSONAL_NUMBER_FIELD => Role::Named("personal".into()),
        Target::Name(s) if s == PHONE_NUMBER_FIELD => Role::Named("phone".into()),
        Target::Id(s) if s == CATEGORY_SELECT_ID => Role::Named("category-select".into()),
        Target::Id(s) if s == DATE_SELECT_ID => Role::DateSelect,
        Target::Id(s) if s == TIME_SELECT_ID => Role::TimeSelect,
        other => Role::Named(other.to_string()),
    }
}

#[derive(Default)]
struct Inner {
    log: Vec<String>,
    overlay_stuck: bool,
    overlay_blocked_waits: usize,
    missing: HashSet<String>,
    date_rounds: VecDeque<Vec<String>>,
    current_dates: Vec<String>,
    time_rounds: VecDeque<Vec<String>>,
    current_times: Vec<String>,
    fresh_time_round: bool,
    confirmable: HashSet<String>,
    consume_rejected: bool,
    pending_time: Option<String>,
    trans_id: Option<String>,
}

impl Inner {
    fn click(&mut self, role: &Role) {
        match role {
            Role::Named(name) => {
                self.log.push(format!("click:{name}"));
                if name == "reserve" {
                    if let Some(pending) = self.pending_time.clone() {
                        if self.consume_rejected && !self.confirmable.contains(&pending) {
                            self.current_times.retain(|t| t != &pending);
                        }
                    }
                }
            }
            Role::CityOption(frag) => {
                self.log.push(format!("click:city:{frag}"));
                self.fresh_time_round = true;
            }
            Role::DateSelect => {
                self.current_dates = self.date_rounds.pop_front().unwrap_or_default();
                self.log.push("open:dates".into());
            }
            Role::DateOption(label) => self.log.push(format!("click:date:{label}")),
            Role::TimeSelect => {
                if self.fresh_time_round {
                    self.current_times = self.time_rounds.pop_front().unwrap_or_default();
                    self.fresh_time_round = false;
                }
                self.log.push("open:times".into());
            }
            Role::TimeOption(label) => {
                self.pending_time = Some(label.clone());
                self.log.push(format!("click:time:{label}"));
            }
            Role::DateOptions | Role::TimeOptions | Role::Invoice | Role::Overlay => {}
        }
    }
}

#[derive(Clone)]
pub struct FakeUi {
    inner: Arc<Mutex<Inner>>,
}

impl FakeUi {
    pub fn new() -> Self {
        FakeUi {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// The modal backdrop never clears.
    pub fn stuck_overlay(self) -> Self {
        self.inner.lock().unwrap().overlay_stuck = true;
        self
    }

    /// The first `waits` overlay waits fail, then the backdrop clears.
    pub fn overlay_clears_after(self, waits: usize) -> Self {
        self.inner.lock().unwrap().overlay_blocked_waits = waits;
        self
    }

    /// The named control never appears; waits on it time out.
    pub fn missing(self, name: &str) -> Self {
        self.inner.lock().unwrap().missing.insert(name.to_string());
        self
    }

    /// Date options rendered by the next opening of the date dropdown.
    pub fn date_round(self, dates: &[&str]) -> Self {
        self.inner
            .lock()
            .unwrap()
            .date_rounds
            .push_back(dates.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Time options rendered at the start of the next search round.
    pub fn time_round(self, times: &[&str]) -> Self {
        self.inner
            .lock()
            .unwrap()
            .time_rounds
            .push_back(times.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Reserving this time label makes the invoice marker appear.
    pub fn confirmable(self, label: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .confirmable
            .insert(label.to_string());
        self
    }

    /// Rejected time options disappear from subsequent re-reads.
    pub fn consume_rejected_times(self) -> Self {
        self.inner.lock().unwrap().consume_rejected = true;
        self
    }

    pub fn trans_id(self, id: &str) -> Self {
        self.inner.lock().unwrap().trans_id = Some(id.to_string());
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.inner.lock().unwrap().log.clone()
    }

    fn element(&self, role: Role) -> FakeElement {
        FakeElement {
            inner: Arc::clone(&self.inner),
            role,
        }
    }

    fn appear(&self, role: Role) -> DriverResult<FakeElement> {
        let mut inner = self.inner.lock().unwrap();
        if inner.missing.contains(&role.name()) {
            return Err(DriverError::Timeout(role.name()));
        }
        if let Role::Invoice = role {
            let confirmed = inner
                .pending_time
                .as_ref()
                .is_some_and(|t| inner.confirmable.contains(t));
            if !confirmed {
                return Err(DriverError::Timeout("invoice".into()));
            }
            inner.log.push("invoice-visible".into());
        }
        drop(inner);
        Ok(self.element(role))
    }
}

pub struct FakeElement {
    inner: Arc<Mutex<Inner>>,
    role: Role,
}

#[async_trait]
impl UiElement for FakeElement {
    async fn click(&self) -> DriverResult<()> {
        self.inner.lock().unwrap().click(&self.role);
        Ok(())
    }

    async fn text(&self) -> DriverResult<String> {
        Ok(match &self.role {
            Role::DateOption(label) | Role::TimeOption(label) => label.clone(),
            _ => String::new(),
        })
    }

    async fn attr(&self, name: &str) -> DriverResult<Option<String>> {
        let mut inner = self.inner.lock().unwrap();
        if self.role == Role::Named("trans-id".into()) {
            inner.log.push(format!("read-attr:trans-id:{name}"));
            return Ok(inner.trans_id.clone());
        }
        Ok(None)
    }

    async fn clear(&self) -> DriverResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let name = self.role.name();
        inner.log.push(format!("clear:{name}"));
        Ok(())
    }

    async fn type_text(&self, text: &str) -> DriverResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let name = self.role.name();
        inner.log.push(format!("type:{name}:{text}"));
        Ok(())
    }

    async fn scroll_into_view(&self) -> DriverResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UiDriver for FakeUi {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.inner.lock().unwrap().log.push(format!("goto:{url}"));
        Ok(())
    }

    async fn wait_visible(&self, target: &Target, _timeout: Duration) -> DriverResult<FakeElement> {
        self.appear(classify(target))
    }

    async fn wait_clickable(
        &self,
        target: &Target,
        _timeout: Duration,
    ) -> DriverResult<FakeElement> {
        self.appear(classify(target))
    }

    async fn wait_invisible(&self, target: &Target, _timeout: Duration) -> DriverResult<()> {
        if classify(target) != Role::Overlay {
            return Ok(());
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.overlay_stuck {
            return Err(DriverError::Timeout("overlay".into()));
        }
        if inner.overlay_blocked_waits > 0 {
            inner.overlay_blocked_waits -= 1;
            return Err(DriverError::Timeout("overlay".into()));
        }
        Ok(())
    }

    async fn find_all(&self, target: &Target) -> DriverResult<Vec<FakeElement>> {
        let inner = self.inner.lock().unwrap();
        let elements = match classify(target) {
            Role::DateOptions => inner
                .current_dates
                .iter()
                .map(|label| Role::DateOption(label.clone()))
                .collect::<Vec<_>>(),
            Role::TimeOptions => inner
                .current_times
                .iter()
                .map(|label| Role::TimeOption(label.clone()))
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };
        drop(inner);
        Ok(elements.into_iter().map(|role| self.element(role)).collect())
    }

    async fn execute_on(&self, script: &str, element: &FakeElement) -> DriverResult<()> {
        if script.contains(".click()") {
            self.inner.lock().unwrap().click(&element.role);
        } else if script.contains("scrollTop") {
            let mut inner = self.inner.lock().unwrap();
            let name = element.role.name();
            inner.log.push(format!("scroll-to-end:{name}"));
        }
        Ok(())
    }
}

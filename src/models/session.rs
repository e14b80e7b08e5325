use chrono::NaiveDate;
use tracing::debug;

/// Slot-engine state machine positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SelectCity,
    SelectDate,
    SelectTime,
    Confirmed,
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::SelectCity => "select-city",
            Step::SelectDate => "select-date",
            Step::SelectTime => "select-time",
            Step::Confirmed => "confirmed",
        }
    }
}

/// Mutable run state, owned exclusively by the slot engine for the duration
/// of its loop. A restart clears the date/time picks; a previous round's
/// selections are never reused.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub step: Step,
    pub city: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            step: Step::SelectCity,
            city: None,
            date: None,
            time: None,
        }
    }

    pub fn begin_round(&mut self) {
        self.step = Step::SelectCity;
        self.date = None;
        self.time = None;
    }

    pub fn enter(&mut self, step: Step) {
        debug!("entering {}", step.label());
        self.step = step;
    }

    /// One-line summary for progress output.
    pub fn describe(&self) -> String {
        format!(
            "step={} city={} date={} time={}",
            self.step.label(),
            self.city.as_deref().unwrap_or("-"),
            self.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            self.time.as_deref().unwrap_or("-"),
        )
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

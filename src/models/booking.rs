use chrono::NaiveDate;
use serde::Serialize;

/// Dates on the booking site render as `dd-mm-yyyy`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Immutable input for one booking run, built once from configuration.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub personal_number: String,
    pub phone_number: String,
    pub category: String,
    pub city: String,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl BookingRequest {
    /// Inclusive on both ends.
    pub fn date_in_range(&self, date: NaiveDate) -> bool {
        self.min_date <= date && date <= self.max_date
    }
}

/// The confirmed appointment produced by the slot engine.
#[derive(Debug, Clone, Serialize)]
pub struct ChosenSlot {
    pub city: String,
    pub date: NaiveDate,
    pub time: String,
}

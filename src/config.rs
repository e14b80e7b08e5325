//! Run configuration.
//!
//! Read once at startup from a key=value file (default `booking.env`):
//!
//! ```text
//! PERSONAL_NUMBER=01001000001
//! PHONE_NUMBER=599000000
//! CATEGORY=B
//! CITY=თბილისი
//! MIN_DATE=10-06-2025
//! MAX_DATE=15-06-2025
//! # optional:
//! MAX_SEARCH_ROUNDS=200
//! WEBDRIVER_URL=http://localhost:9515
//! HEADLESS=1
//! ```

use std::env;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::BookingError;
use crate::models::booking::{BookingRequest, DATE_FORMAT};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub webdriver_url: String,
    pub headless: bool,
    /// `None` keeps the slot search unbounded; availability changes over
    /// time and the default is to poll until success.
    pub max_rounds: Option<u32>,
}

pub fn load(path: &str) -> Result<(BookingRequest, RunOptions), BookingError> {
    dotenv::from_path(Path::new(path))
        .map_err(|e| BookingError::Config(format!("cannot read {path}: {e}")))?;
    let get = |key: &str| env::var(key).ok();
    Ok((booking_request(&get)?, run_options(&get)?))
}

pub fn booking_request(
    get: &dyn Fn(&str) -> Option<String>,
) -> Result<BookingRequest, BookingError> {
    let request = BookingRequest {
        personal_number: required(get, "PERSONAL_NUMBER")?,
        phone_number: required(get, "PHONE_NUMBER")?,
        category: required(get, "CATEGORY")?,
        city: required(get, "CITY")?,
        min_date: date(get, "MIN_DATE")?,
        max_date: date(get, "MAX_DATE")?,
    };
    if request.min_date > request.max_date {
        return Err(BookingError::Config(format!(
            "MIN_DATE {} is after MAX_DATE {}",
            request.min_date.format(DATE_FORMAT),
            request.max_date.format(DATE_FORMAT)
        )));
    }
    Ok(request)
}

pub fn run_options(get: &dyn Fn(&str) -> Option<String>) -> Result<RunOptions, BookingError> {
    let max_rounds = match get("MAX_SEARCH_ROUNDS") {
        None => None,
        Some(v) => Some(v.trim().parse::<u32>().map_err(|_| {
            BookingError::Config(format!("MAX_SEARCH_ROUNDS must be a number, got {v:?}"))
        })?),
    };
    let headless = get("HEADLESS")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    Ok(RunOptions {
        webdriver_url: get("WEBDRIVER_URL")
            .unwrap_or_else(|| "http://localhost:9515".to_string()),
        headless,
        max_rounds,
    })
}

fn required(get: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<String, BookingError> {
    match get(key) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(BookingError::Config(format!("missing required key {key}"))),
    }
}

fn date(get: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<NaiveDate, BookingError> {
    let raw = required(get, key)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|_| BookingError::Config(format!("{key} must be dd-mm-yyyy, got {raw:?}")))
}

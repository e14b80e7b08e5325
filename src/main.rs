mod config;
mod driver;
mod error;
mod flow;
mod models;
mod selectors;

use tracing::{error, info};

use crate::driver::session::Session;
use crate::models::booking::DATE_FORMAT;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "booking.env".to_string());

    let (request, options) = match config::load(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    info!(
        "booking {} in {}, {}..{}",
        request.category,
        request.city,
        request.min_date.format(DATE_FORMAT),
        request.max_date.format(DATE_FORMAT)
    );

    let session = match Session::connect(&options.webdriver_url, options.headless).await {
        Ok(session) => session,
        Err(e) => {
            error!("could not open a browser session: {e}");
            std::process::exit(1);
        }
    };

    // The session stays open either way so the operator can inspect the page
    // or finish the gateway payment by hand.
    match flow::run(&session, &request, options.max_rounds).await {
        Ok(slot) => info!(
            "form filled successfully: {} on {} at {}",
            slot.city,
            slot.date.format(DATE_FORMAT),
            slot.time
        ),
        Err(e) => {
            error!("booking failed: {e}");
            std::process::exit(1);
        }
    }
}

use crate::driver::DriverError;

/// Failure taxonomy for the booking run. Everything here is fatal: expected
/// empty results (no date in range, no confirmable time) never become errors,
/// they drive the slot engine's restart transitions instead.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not accept the terms dialog after {attempts} attempts")]
    ConsentFailure { attempts: u32 },

    #[error("failed to fill applicant identity: {0}")]
    IdentityFill(#[source] DriverError),

    #[error("payment handoff failed: {0}")]
    PaymentHandoff(#[source] DriverError),

    #[error("no bookable slot found after {rounds} search rounds")]
    SearchExhausted { rounds: u32 },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::WebhookGateway;
pub use config::BookingConfig;
pub use core::{controller::SubmitAttempt, workflow::ReservationWorkflow};
pub use domain::model::{FormField, ReservationDraft, SubmissionStatus};
pub use utils::error::{BookingError, Result};

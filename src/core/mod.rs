pub mod controller;
pub mod form;
pub mod workflow;

pub use crate::domain::model::{FormField, ReservationDraft, StatusKind, SubmissionStatus};
pub use crate::domain::ports::{BookingGateway, ConfigProvider, StatusMessages, SubmitOutcome};
pub use crate::utils::error::Result;

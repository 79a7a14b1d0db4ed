pub mod flight_registry;
pub mod ledger;
pub mod passenger_registry;
pub mod priority_queue;
pub mod scheduler;
pub mod standard_queue;

pub use crate::domain::model::{BoardingRecord, BoardingResult, Flight, Passenger};
pub use crate::domain::ports::{AuditSink, ConfigProvider};
pub use crate::utils::error::Result;

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::audit::{build_audit_sink, FileAuditSink, MemoryAuditSink, NullAuditSink};
pub use adapters::credentials::CredentialStore;
pub use app::{console::ConsoleSession, gate::GateOps, shared::SharedGate};
pub use config::GateConfig;
pub use crate::core::scheduler::BoardingScheduler;
pub use utils::error::{GateError, Result};

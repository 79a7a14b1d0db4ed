// Adapters layer: concrete implementations for external systems (audit files, credentials, CSV rosters).

pub mod audit;
pub mod credentials;
pub mod roster;

pub mod toml_config;

pub use toml_config::GateConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "airline-boarding")]
#[command(about = "Gate operations console: flights, check-in and priority boarding")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "gate.toml")]
    pub config: String,

    /// Credentials file with `username password ROLE` lines
    #[arg(long)]
    pub credentials: Option<String>,

    /// Directory for the daily boarding audit files
    #[arg(long)]
    pub audit_dir: Option<String>,

    /// Disable the boarding audit file
    #[arg(long)]
    pub no_audit: bool,

    /// Seed flights from a CSV file
    #[arg(long)]
    pub flights_csv: Option<String>,

    /// Seed passengers from a CSV file
    #[arg(long)]
    pub passengers_csv: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut GateConfig) {
        if let Some(credentials) = &self.credentials {
            config.auth.credentials_file = credentials.clone();
        }
        if let Some(dir) = &self.audit_dir {
            config.audit.directory = dir.clone();
        }
        if self.no_audit {
            config.audit.enabled = false;
        }
        if let Some(path) = &self.flights_csv {
            config.roster.flights_csv = Some(path.clone());
        }
        if let Some(path) = &self.passengers_csv {
            config.roster.passengers_csv = Some(path.clone());
        }
    }
}

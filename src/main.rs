use airline_boarding::core::ConfigProvider;
use airline_boarding::utils::error::ErrorSeverity;
use airline_boarding::utils::logger::{self, LogFormat};
use airline_boarding::utils::validation::Validate;
use airline_boarding::{
    build_audit_sink, CliConfig, ConsoleSession, CredentialStore, GateConfig, GateError, GateOps,
};
use anyhow::Context;
use clap::Parser;
use std::fs::File;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match GateConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    let log_format = config
        .logging
        .format
        .as_deref()
        .and_then(LogFormat::from_name)
        .unwrap_or_default();
    logger::init_cli_logger(cli.verbose, config.logging.level.as_deref(), log_format);

    tracing::info!("Starting {}", config.gate.name);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let credentials = CredentialStore::load_or_empty(config.credentials_file());
    if credentials.is_empty() {
        tracing::warn!("⚠️ No usable accounts in {}", config.credentials_file());
    }

    let mut gate = GateOps::new(build_audit_sink(&config)?);
    seed_roster(&mut gate, &config)?;

    // 控制台讀取 stdin 會阻塞，交給 blocking 執行緒
    let title = config.gate.name.clone();
    let manifest_dir = config.audit_directory().to_string();
    let outcome = tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ConsoleSession::new(&mut gate, &credentials, stdin.lock(), stdout.lock())
            .with_title(&title)
            .with_manifest_dir(manifest_dir)
            .run()
    })
    .await?;

    if let Err(e) = outcome {
        report_fatal(&e);
    }

    tracing::info!("Session ended");
    Ok(())
}

fn seed_roster(gate: &mut GateOps, config: &GateConfig) -> anyhow::Result<()> {
    if let Some(path) = &config.roster.flights_csv {
        let file = File::open(path).with_context(|| format!("opening flights roster {}", path))?;
        let summary = gate.import_flights(file)?;
        tracing::info!("✈️ {} flights loaded from {}", summary.imported, path);
    }

    if let Some(path) = &config.roster.passengers_csv {
        let file =
            File::open(path).with_context(|| format!("opening passengers roster {}", path))?;
        let summary = gate.import_passengers(file)?;
        tracing::info!("🧳 {} passengers loaded from {}", summary.imported, path);
    }

    Ok(())
}

fn report_fatal(e: &GateError) -> ! {
    tracing::error!(
        "❌ Console session failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

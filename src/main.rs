use std::process::ExitCode;

use clap::Parser;
use promo_sheet_sync::{
    application::{factory::PromoSheetSyncFactory, promo_sheet_sync::ROUTINE_NAME},
    cli::{render_preview, Cli, Command},
    config::AppConfig,
    logging::init_tracing,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(report) => {
            eprintln!("❌ {ROUTINE_NAME}: {report:?}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(report) = init_tracing(&config.logging, cli.verbose) {
        eprintln!("❌ {ROUTINE_NAME}: {report:?}");
        return ExitCode::FAILURE;
    }

    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));

    tracing::debug!(
        spreadsheet_id = %config.sheets.spreadsheet_id,
        sheet = %config.sheets.sheet_name,
        database = %config.database.redacted_connection_string(),
        "Loaded configuration"
    );

    let mut pipeline = PromoSheetSyncFactory::create(&config);

    let outcome = match cli.command() {
        Command::Run => pipeline.run().await.map(|report| report.to_string()),
        Command::Check => pipeline.check().await.map(|report| report.to_string()),
        Command::Preview { limit } => pipeline.preview().await.map(|payload| {
            println!("{}", render_preview(&payload, limit));
            format!("previewed {} data row(s)", payload.data_row_count())
        }),
    };

    match outcome {
        Ok(summary) => {
            tracing::info!("✅ {}: {}", ROUTINE_NAME, summary);
            ExitCode::SUCCESS
        }
        Err(report) => {
            tracing::error!("❌ {}: {:?}", ROUTINE_NAME, report);
            ExitCode::FAILURE
        }
    }
}

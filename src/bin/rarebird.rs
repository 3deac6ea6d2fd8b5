use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use rarebird_snapshot::app::App;
use rarebird_snapshot::config::{ConfigLoader, SettingsOverrides};
use rarebird_snapshot::ebird::EbirdHttpClient;
use rarebird_snapshot::error::RarebirdError;
use rarebird_snapshot::output::{ConsoleOutput, JsonOutput, OutputMode};

#[derive(Parser)]
#[command(name = "rarebird")]
#[command(about = "Snapshot recent notable eBird sightings for a region")]
#[command(version, author)]
struct Cli {
    /// eBird region code, e.g. US-NY (overrides EBIRD_REGION)
    #[arg(long)]
    region: Option<String>,

    /// Days of history to request (overrides DAYS_BACK)
    #[arg(long)]
    days_back: Option<u32>,

    /// Snapshot location (overrides RAREBIRD_OUTPUT)
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Print a JSON run report instead of progress lines
    #[arg(long)]
    non_interactive: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<RarebirdError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &RarebirdError) -> u8 {
    match error {
        RarebirdError::InvalidRegion(_) | RarebirdError::ConfigParse(_) => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let settings = ConfigLoader::from_env()?;
    let settings = ConfigLoader::apply_overrides(
        settings,
        SettingsOverrides {
            region: cli.region,
            days_back: cli.days_back,
            output_path: cli.output,
        },
    )?;

    let client = EbirdHttpClient::new(&settings.api_key, &settings.base_url)?;
    let app = App::new(client, settings);

    match output_mode {
        OutputMode::Interactive => {
            app.run(&ConsoleOutput)?;
            Ok(())
        }
        OutputMode::NonInteractive => {
            let report = app.run(&JsonOutput)?;
            JsonOutput::print_report(&report).into_diagnostic()?;
            Ok(())
        }
    }
}

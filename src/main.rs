use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use costnav::config::{self, Config};
use costnav::{
    AskResponse, CostNavigator, Database, Provider, QueryTranslator, SearchFilter,
    SearchFilterError,
};
use tracing_subscriber::EnvFilter;

/// costnav - hospital pricing and quality lookups
#[derive(Parser)]
#[command(name = "costnav")]
#[command(about = "Answer hospital pricing questions and search providers by DRG and distance")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask a natural-language question about prices or ratings
    Ask(AskCommand),
    /// Search providers by DRG and distance, cheapest first
    Providers(ProvidersCommand),
}

#[derive(Parser)]
struct AskCommand {
    /// The question, e.g. "What is the average charge for DRG 470?"
    #[arg(value_name = "QUESTION")]
    question: String,
}

#[derive(Parser)]
struct ProvidersCommand {
    /// DRG code, or text to find in the DRG description
    #[arg(long, value_name = "DRG")]
    drg: Option<String>,

    /// Origin postal code for radius filtering
    #[arg(long, value_name = "ZIP")]
    zip: Option<String>,

    /// Search radius in kilometres (requires --zip)
    #[arg(long, value_name = "KM")]
    radius_km: Option<f64>,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Ask(cmd) => handle_ask(cmd),
        Commands::Providers(cmd) => handle_providers(cmd),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if is_user_error(&e) {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// User errors are bad command-line input; everything else is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<SearchFilterError>().is_some()
        || error.to_string().contains("cannot be empty")
}

fn open_navigator() -> Result<CostNavigator> {
    let config = Config::from_env()?;
    config::ensure_database_directory(&config.database_path)?;

    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database: {}",
            config.database_path.display()
        )
    })?;
    let postal_codes = config.postal_codes()?;
    let translator = QueryTranslator::new(config::completion_client_from_env());

    Ok(CostNavigator::new(db, translator, postal_codes))
}

/// Handles the ask command. Refusals exit 1, failed queries exit 2.
fn handle_ask(cmd: &AskCommand) -> Result<ExitCode> {
    if cmd.question.trim().is_empty() {
        anyhow::bail!("Question cannot be empty");
    }

    let navigator = open_navigator()?;
    let response = navigator.ask(&cmd.question);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(match response {
        AskResponse::Answer { .. } => ExitCode::SUCCESS,
        AskResponse::Refusal { .. } => ExitCode::from(1),
        AskResponse::ExecutionError { .. } => ExitCode::from(2),
    })
}

fn handle_providers(cmd: &ProvidersCommand) -> Result<ExitCode> {
    let filter = build_filter(cmd)?;
    let navigator = open_navigator()?;
    let providers: Vec<Provider> = navigator.search_providers(&filter)?;
    println!("{}", serde_json::to_string_pretty(&providers)?);
    Ok(ExitCode::SUCCESS)
}

fn build_filter(cmd: &ProvidersCommand) -> Result<SearchFilter> {
    let mut filter = SearchFilter::new();
    if let Some(drg) = &cmd.drg {
        filter = filter.with_drg(drg);
    }
    if let Some(zip) = &cmd.zip {
        filter = filter.with_postal_code(zip);
    }
    if let Some(radius_km) = cmd.radius_km {
        filter = filter.with_radius_km(radius_km)?;
    }
    Ok(filter)
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{debug, info};

use relief_core::{ApiConfig, AuthMode, ClaimInput, Credentials};
use relief_http::ReqwestTransport;
use relief_ui::{
    Console, app, logging,
    settings::{ApiOverrides, Settings, resolve_api_config},
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Flood-relief claim estimator.
///
/// Signs in against the auth service and asks the prediction service for a
/// compensation estimate. Without a subcommand an interactive console starts.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// TOML settings file with `[api]` and `[logging]` tables.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Auth service base URL (overrides RELIEF_AUTH_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    auth_url: Option<String>,

    /// Prediction service base URL (overrides RELIEF_PREDICTION_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    prediction_url: Option<String>,

    /// Fail instead of falling back to the production services.
    #[arg(long, global = true)]
    require_explicit_urls: bool,

    /// Log level or filter directive, e.g. `debug` or `relief_core=trace`.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Do not write log records to stderr.
    #[arg(long, global = true)]
    quiet_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive sign-in and estimate session (the default).
    Console,
    /// Check credentials against the auth service.
    Login(LoginArgs),
    /// Create an account.
    Signup(SignupArgs),
    /// Sign in and request one estimate.
    Estimate(EstimateArgs),
    /// List cause-of-damage codes.
    Causes,
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
}

#[derive(Debug, Args)]
struct SignupArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    /// Defaults to `--password`.
    #[arg(long)]
    repeat_password: Option<String>,
}

#[derive(Debug, Args)]
struct EstimateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    /// Water depth in feet.
    #[arg(long, allow_hyphen_values = true)]
    water_depth: String,
    /// Flood water duration in hours.
    #[arg(long, allow_hyphen_values = true)]
    duration: String,
    /// Cause-of-damage code (see `causes`).
    #[arg(long)]
    cause: String,
    /// Flood event name.
    #[arg(long)]
    event: String,
}

// ─── setup ───────────────────────────────────────────────────────────────────

/// Applies logging settings; flags win over the settings file.
fn configure_logging(
    cli: &Cli,
    settings: &Settings,
) -> Result<()> {
    if let Some(level) = cli.log_level.as_deref().or(settings.logging.level.as_deref()) {
        logging::set_log_level(level)?;
    }
    let console = !cli.quiet_logs && settings.logging.console.unwrap_or(true);
    logging::set_console_enabled(console)?;
    if let Some(path) = cli.log_file.as_ref().or(settings.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

/// Resolves the endpoints and builds the HTTP transport.
fn connect(
    cli: &Cli,
    settings: &Settings,
) -> Result<(ApiConfig, ReqwestTransport)> {
    let overrides = ApiOverrides {
        auth_url: cli.auth_url.clone(),
        prediction_url: cli.prediction_url.clone(),
        require_explicit: cli.require_explicit_urls,
    };
    let config = resolve_api_config(&settings.api, &overrides, |key| std::env::var(key).ok())?;
    debug!(auth = %config.auth_base, prediction = %config.prediction_base, "api endpoints");
    Ok((config, app::build_transport()?))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    configure_logging(&cli, &settings)?;

    match &cli.command {
        Some(Command::Causes) => println!("{}", app::causes_table()),
        None | Some(Command::Console) => {
            let (config, transport) = connect(&cli, &settings)?;
            let stdin = BufReader::new(tokio::io::stdin());
            Console::new(&transport, &config, stdin, std::io::stdout())
                .run()
                .await
                .context("console session failed")?;
        }
        Some(Command::Login(args)) => {
            let (config, transport) = connect(&cli, &settings)?;
            let credentials = Credentials::new(&args.username, &args.password);
            let session =
                app::authenticate_once(&transport, &config, AuthMode::SignIn, &credentials)
                    .await?;
            println!("Signed in as {}.", session.username);
        }
        Some(Command::Signup(args)) => {
            let (config, transport) = connect(&cli, &settings)?;
            let repeat = args.repeat_password.as_deref().unwrap_or(&args.password);
            let credentials =
                Credentials::new(&args.username, &args.password).with_repeat_password(repeat);
            let session =
                app::authenticate_once(&transport, &config, AuthMode::SignUp, &credentials)
                    .await?;
            println!("Account created; signed in as {}.", session.username);
        }
        Some(Command::Estimate(args)) => {
            let input = ClaimInput {
                water_depth: args.water_depth.clone(),
                flood_water_duration: args.duration.clone(),
                cause_of_damage: Some(app::parse_cause(&args.cause)?),
                flood_event: args.event.clone(),
            };
            let (config, transport) = connect(&cli, &settings)?;
            let credentials = Credentials::new(&args.username, &args.password);
            let (session, inference) =
                app::estimate_once(&transport, &config, &credentials, input).await?;
            info!(username = %session.username, "estimate complete");
            let text = app::render_inference(&inference);
            if !text.is_empty() {
                println!("{text}");
            }
        }
    }

    Ok(())
}

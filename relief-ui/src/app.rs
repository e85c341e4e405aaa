//! One-shot operations behind the non-interactive subcommands.

use anyhow::{Context, Result, bail};
use relief_core::{
    ApiConfig, AppState, AuthMode, CauseOfDamage, ClaimInput, Credentials, EstimateForm,
    EstimatePhase, Inference, Session, SessionGate, Transport,
};
use relief_http::ReqwestTransport;
use tracing::{debug, info};

/// Builds the production HTTP transport.
pub fn build_transport() -> Result<ReqwestTransport> {
    ReqwestTransport::new().context("failed to build HTTP client")
}

/// Runs one sign-in or sign-up exchange and returns the session.
///
/// The error carries the same user-facing message the console shows.
pub async fn authenticate_once<T: Transport + ?Sized>(
    transport: &T,
    config: &ApiConfig,
    mode: AuthMode,
    credentials: &Credentials,
) -> Result<Session> {
    let gate = SessionGate::new()
        .with_mode(mode)
        .with_username(credentials.username.clone())
        .with_password(credentials.password.clone())
        .with_repeat_password(credentials.repeat_password.clone());

    match gate.submit(transport, config).await {
        AppState::Authenticated { session, .. } => {
            info!(username = %session.username, mode = mode.label(), "authenticated");
            Ok(session)
        }
        AppState::Unauthenticated(gate) => match gate.error() {
            Some(error) => bail!("{error}"),
            None => bail!("{} did not complete", mode.label()),
        },
    }
}

/// Signs in, then requests one estimate for `input`.
///
/// An estimate is only requested once a session exists.
pub async fn estimate_once<T: Transport + ?Sized>(
    transport: &T,
    config: &ApiConfig,
    credentials: &Credentials,
    input: ClaimInput,
) -> Result<(Session, Inference)> {
    let session = authenticate_once(transport, config, AuthMode::SignIn, credentials).await?;

    if !input.has_required() {
        bail!("Please fill in water depth, flood water duration, cause of damage and flood event.");
    }

    let form = EstimateForm::new()
        .with_water_depth(input.water_depth)
        .with_flood_water_duration(input.flood_water_duration)
        .with_cause_of_damage(input.cause_of_damage)
        .with_flood_event(input.flood_event)
        .submit(transport, config)
        .await;

    match form.phase() {
        EstimatePhase::Showing { inference } => {
            debug!(?inference, "estimate received");
            Ok((session, inference.clone()))
        }
        EstimatePhase::Editing { error: Some(error) } => bail!("{error}"),
        phase => bail!("estimate did not complete ({phase:?})"),
    }
}

/// Parses a cause-of-damage code typed on the command line.
pub fn parse_cause(code: &str) -> Result<CauseOfDamage> {
    CauseOfDamage::parse(code).with_context(|| {
        format!("unknown cause of damage '{code}'; run `relief-estimate causes` for the list")
    })
}

/// The cause-of-damage table, one `code  label` row per line.
pub fn causes_table() -> String {
    CauseOfDamage::all()
        .iter()
        .map(|cause| format!("{:>2}  {}", cause.as_str(), cause.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text shown for a received estimate; empty when there is nothing to show.
pub fn render_inference(inference: &Inference) -> String {
    match inference.display() {
        Some(text) => format!("Estimated compensation: {text}"),
        None => String::new(),
    }
}

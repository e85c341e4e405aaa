//! Interactive terminal front-end.
//!
//! Drives [`AppState`] from line-based input: the session gate first, then
//! the estimate form. Pressing Enter at any field prompt keeps the value
//! already held, so a failed submission can be retried without retyping.
//! End of input exits cleanly.

use std::io::Write;

use anyhow::Result;
use relief_core::{
    ApiConfig, AppState, AuthMode, CauseOfDamage, EstimateForm, EstimatePhase, Session,
    SessionGate, Transport,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::app::{causes_table, render_inference};

const MISSING_CLAIM_FIELDS: &str =
    "Please fill in water depth, flood water duration, cause of damage and flood event.";

/// What the user picked after a submission attempt.
enum NextStep {
    Continue(AppState),
    Quit,
}

pub struct Console<'a, T: ?Sized, R, W> {
    transport: &'a T,
    config: &'a ApiConfig,
    input: R,
    output: W,
}

impl<'a, T, R, W> Console<'a, T, R, W>
where
    T: Transport + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        transport: &'a T,
        config: &'a ApiConfig,
        input: R,
        output: W,
    ) -> Self {
        Self {
            transport,
            config,
            input,
            output,
        }
    }

    /// Runs until the user quits or input ends.
    pub async fn run(mut self) -> Result<()> {
        writeln!(self.output, "Flood Relief Claim Estimator")?;
        let mut state = AppState::new();
        loop {
            let step = match state {
                AppState::Unauthenticated(gate) => self.gate_step(gate).await?,
                AppState::Authenticated { session, form } => {
                    self.form_step(session, form).await?
                }
            };
            match step {
                NextStep::Continue(next) => state = next,
                NextStep::Quit => break,
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(())
    }

    // ── session gate ─────────────────────────────────────────────────────

    async fn gate_step(
        &mut self,
        gate: SessionGate,
    ) -> Result<NextStep> {
        let current = match gate.mode() {
            AuthMode::SignIn => "i",
            AuthMode::SignUp => "u",
        };
        writeln!(self.output)?;
        let Some(choice) = self
            .prompt(&format!("Sign [i]n or sign [u]p, [q] to quit [{current}]"))
            .await?
        else {
            return Ok(NextStep::Quit);
        };
        let gate = match choice.trim().to_ascii_lowercase().as_str() {
            "" => gate,
            "i" | "in" => gate.with_mode(AuthMode::SignIn),
            "u" | "up" => gate.with_mode(AuthMode::SignUp),
            "q" | "quit" => return Ok(NextStep::Quit),
            other => {
                writeln!(self.output, "Unrecognised choice '{other}'.")?;
                return Ok(NextStep::Continue(AppState::Unauthenticated(gate)));
            }
        };

        let creds = gate.credentials().clone();
        let Some(username) = self.prompt_field("Username", &creds.username, false).await? else {
            return Ok(NextStep::Quit);
        };
        let Some(password) = self.prompt_field("Password", &creds.password, true).await? else {
            return Ok(NextStep::Quit);
        };
        let mut gate = gate.with_username(username).with_password(password);
        if gate.mode() == AuthMode::SignUp {
            let Some(repeat) = self
                .prompt_field("Repeat password", &creds.repeat_password, true)
                .await?
            else {
                return Ok(NextStep::Quit);
            };
            gate = gate.with_repeat_password(repeat);
        }

        let busy = match gate.mode() {
            AuthMode::SignIn => "Signing in…",
            AuthMode::SignUp => "Creating account…",
        };
        writeln!(self.output, "{busy}")?;
        self.output.flush()?;

        let state = gate.submit(self.transport, self.config).await;
        match &state {
            AppState::Authenticated { session, .. } => {
                writeln!(self.output, "Signed in as {}.", session.username)?;
            }
            AppState::Unauthenticated(gate) => {
                if let Some(error) = gate.error() {
                    writeln!(self.output, "Error: {error}")?;
                }
            }
        }
        Ok(NextStep::Continue(state))
    }

    // ── estimate form ────────────────────────────────────────────────────

    async fn form_step(
        &mut self,
        session: Session,
        form: EstimateForm,
    ) -> Result<NextStep> {
        writeln!(self.output)?;
        writeln!(self.output, "New claim estimate ({}).", session.username)?;

        let Some(form) = self.edit_claim(form).await? else {
            return Ok(NextStep::Quit);
        };

        let form = if form.can_submit() {
            writeln!(self.output, "Calculating…")?;
            self.output.flush()?;
            let form = form.submit(self.transport, self.config).await;
            match form.phase() {
                EstimatePhase::Showing { inference } => {
                    let text = render_inference(inference);
                    if !text.is_empty() {
                        writeln!(self.output, "{text}")?;
                    }
                }
                EstimatePhase::Editing { error: Some(error) } => {
                    writeln!(self.output, "Error: {error}")?;
                }
                phase => debug!(?phase, "submission left no result"),
            }
            form
        } else {
            writeln!(self.output, "{MISSING_CLAIM_FIELDS}")?;
            form
        };

        self.after_submit(session, form).await
    }

    /// Prompts for each claim field in turn. `None` means input ended.
    async fn edit_claim(
        &mut self,
        mut form: EstimateForm,
    ) -> Result<Option<EstimateForm>> {
        let input = form.input().clone();

        let Some(depth) = self
            .prompt_field("Water depth (ft)", &input.water_depth, false)
            .await?
        else {
            return Ok(None);
        };
        form = form.with_water_depth(depth);

        let Some(duration) = self
            .prompt_field("Flood water duration (hours)", &input.flood_water_duration, false)
            .await?
        else {
            return Ok(None);
        };
        form = form.with_flood_water_duration(duration);

        let Some(cause) = self.prompt_cause(input.cause_of_damage).await? else {
            return Ok(None);
        };
        form = form.with_cause_of_damage(cause);

        let Some(event) = self
            .prompt_field("Flood event", &input.flood_event, false)
            .await?
        else {
            return Ok(None);
        };
        Ok(Some(form.with_flood_event(event)))
    }

    /// Reads a cause code, listing the table on `?` and re-asking on a bad
    /// code. The outer `None` means input ended.
    async fn prompt_cause(
        &mut self,
        current: Option<CauseOfDamage>,
    ) -> Result<Option<Option<CauseOfDamage>>> {
        let shown = current.map(|c| c.as_str()).unwrap_or("");
        loop {
            let Some(line) = self
                .prompt(&format!("Cause of damage code, ? to list [{shown}]"))
                .await?
            else {
                return Ok(None);
            };
            let code = line.trim();
            if code.is_empty() {
                return Ok(Some(current));
            }
            if code == "?" {
                writeln!(self.output, "{}", causes_table())?;
                continue;
            }
            match CauseOfDamage::parse(code) {
                Some(cause) => return Ok(Some(Some(cause))),
                None => writeln!(self.output, "Unknown cause code '{code}'. Type ? to list.")?,
            }
        }
    }

    async fn after_submit(
        &mut self,
        session: Session,
        form: EstimateForm,
    ) -> Result<NextStep> {
        let showing = form.inference().is_some();
        let menu = if showing {
            "[n]ew estimate, [l]ogout, [q]uit [n]"
        } else {
            "[e]dit claim, [l]ogout, [q]uit [e]"
        };
        loop {
            let Some(choice) = self.prompt(menu).await? else {
                return Ok(NextStep::Quit);
            };
            let state = |form| AppState::Authenticated {
                session: session.clone(),
                form,
            };
            match choice.trim().to_ascii_lowercase().as_str() {
                "" | "n" | "e" => {
                    let form = if showing { form.reset() } else { form };
                    return Ok(NextStep::Continue(state(form)));
                }
                "l" | "logout" => {
                    writeln!(self.output, "Logged out.")?;
                    return Ok(NextStep::Continue(state(form).logout()));
                }
                "q" | "quit" => return Ok(NextStep::Quit),
                other => writeln!(self.output, "Unrecognised choice '{other}'.")?,
            }
        }
    }

    // ── line input ───────────────────────────────────────────────────────

    /// Prompts for a field; an empty answer keeps `current`.
    async fn prompt_field(
        &mut self,
        label: &str,
        current: &str,
        secret: bool,
    ) -> Result<Option<String>> {
        let shown = if secret && !current.is_empty() {
            "******"
        } else {
            current
        };
        let answer = self.prompt(&format!("{label} [{shown}]")).await?;
        Ok(answer.map(|line| if line.is_empty() { current.to_string() } else { line }))
    }

    /// Writes `label: ` and reads one line without its terminator.
    /// `None` at end of input.
    async fn prompt(
        &mut self,
        label: &str,
    ) -> Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

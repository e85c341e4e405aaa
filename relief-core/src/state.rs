//! Application state for the relief estimator front-ends.
//!
//! State is held in plain values. Every transition consumes the current
//! value and returns the next one, so a front-end only ever swaps one
//! [`AppState`] for another.

use tracing::debug;

use crate::api::{ApiConfig, Transport};
use crate::exchange::{
    AuthError, PredictionError, authenticate, estimate, validate_credentials,
};
use crate::models::{AuthMode, CauseOfDamage, ClaimInput, Credentials, Inference, Session};

/// Top-level state: the estimate form is only reachable with a session.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Unauthenticated(SessionGate),
    Authenticated { session: Session, form: EstimateForm },
}

impl Default for AppState {
    fn default() -> Self {
        Self::Unauthenticated(SessionGate::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated { session, .. } => Some(session),
            Self::Unauthenticated(_) => None,
        }
    }

    /// Drops the session and any claim in progress; the gate starts over
    /// in sign-in mode.
    pub fn logout(self) -> Self {
        if let Self::Authenticated { session, .. } = &self {
            debug!(username = %session.username, "logged out");
        }
        Self::default()
    }
}

// ─── session gate ────────────────────────────────────────────────────────────

/// Credential-entry state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionGate {
    mode: AuthMode,
    credentials: Credentials,
    error: Option<AuthError>,
    loading: bool,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn error(&self) -> Option<&AuthError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Switching tabs clears the previous error but keeps typed values.
    pub fn with_mode(
        mut self,
        mode: AuthMode,
    ) -> Self {
        self.mode = mode;
        self.error = None;
        self
    }

    pub fn with_username(
        mut self,
        username: impl Into<String>,
    ) -> Self {
        self.credentials.username = username.into();
        self
    }

    pub fn with_password(
        mut self,
        password: impl Into<String>,
    ) -> Self {
        self.credentials.password = password.into();
        self
    }

    pub fn with_repeat_password(
        mut self,
        repeat_password: impl Into<String>,
    ) -> Self {
        self.credentials.repeat_password = repeat_password.into();
        self
    }

    /// Marks a submission as in flight.
    ///
    /// Ignored while a submission is already in flight. When local checks
    /// fail the error is recorded and the gate stays idle.
    pub fn begin_submit(mut self) -> Self {
        if self.loading {
            return self;
        }
        match validate_credentials(self.mode, &self.credentials) {
            Ok(()) => {
                self.error = None;
                self.loading = true;
            }
            Err(error) => self.error = Some(error),
        }
        self
    }

    /// Applies the outcome of the in-flight submission.
    ///
    /// A session clears the typed credentials (they are dropped with the
    /// gate). Outcomes arriving with nothing in flight are ignored.
    pub fn finish(
        mut self,
        outcome: Result<Session, AuthError>,
    ) -> AppState {
        if !self.loading {
            return AppState::Unauthenticated(self);
        }
        self.loading = false;
        match outcome {
            Ok(session) => AppState::Authenticated {
                session,
                form: EstimateForm::new(),
            },
            Err(error) => {
                self.error = Some(error);
                AppState::Unauthenticated(self)
            }
        }
    }

    /// Runs a full submission: local checks, one request, outcome applied.
    pub async fn submit<T: Transport + ?Sized>(
        self,
        transport: &T,
        config: &ApiConfig,
    ) -> AppState {
        let gate = self.begin_submit();
        if !gate.loading {
            return AppState::Unauthenticated(gate);
        }
        let outcome = authenticate(transport, config, gate.mode, &gate.credentials).await;
        gate.finish(outcome)
    }
}

// ─── estimate form ───────────────────────────────────────────────────────────

/// Where the estimate form is in its edit/submit/show cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatePhase {
    Editing { error: Option<PredictionError> },
    Submitting { ticket: u64 },
    Showing { inference: Inference },
}

/// Claim fields plus the phase of the current submission.
///
/// Each submission gets a ticket; a completion is applied only if its
/// ticket is the one still outstanding.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateForm {
    input: ClaimInput,
    phase: EstimatePhase,
    issued: u64,
}

impl Default for EstimateForm {
    fn default() -> Self {
        Self {
            input: ClaimInput::default(),
            phase: EstimatePhase::Editing { error: None },
            issued: 0,
        }
    }
}

impl EstimateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &ClaimInput {
        &self.input
    }

    pub fn phase(&self) -> &EstimatePhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match &self.phase {
            EstimatePhase::Editing { error } => error.as_ref(),
            _ => None,
        }
    }

    pub fn inference(&self) -> Option<&Inference> {
        match &self.phase {
            EstimatePhase::Showing { inference } => Some(inference),
            _ => None,
        }
    }

    /// Submission is possible while editing with every required field set.
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, EstimatePhase::Editing { .. }) && self.input.has_required()
    }

    /// Applies an edit to the claim fields. Only allowed while editing.
    pub fn edit(
        mut self,
        f: impl FnOnce(&mut ClaimInput),
    ) -> Self {
        if matches!(self.phase, EstimatePhase::Editing { .. }) {
            f(&mut self.input);
        }
        self
    }

    pub fn with_water_depth(
        self,
        value: impl Into<String>,
    ) -> Self {
        let value = value.into();
        self.edit(|input| input.water_depth = value)
    }

    pub fn with_flood_water_duration(
        self,
        value: impl Into<String>,
    ) -> Self {
        let value = value.into();
        self.edit(|input| input.flood_water_duration = value)
    }

    pub fn with_cause_of_damage(
        self,
        cause: Option<CauseOfDamage>,
    ) -> Self {
        self.edit(|input| input.cause_of_damage = cause)
    }

    pub fn with_flood_event(
        self,
        value: impl Into<String>,
    ) -> Self {
        let value = value.into();
        self.edit(|input| input.flood_event = value)
    }

    /// Starts a submission and returns its ticket.
    ///
    /// Returns `None`, leaving the form untouched, when [`Self::can_submit`]
    /// is false.
    pub fn begin_submit(mut self) -> (Self, Option<u64>) {
        if !self.can_submit() {
            return (self, None);
        }
        self.issued += 1;
        let ticket = self.issued;
        self.phase = EstimatePhase::Submitting { ticket };
        (self, Some(ticket))
    }

    /// Applies the outcome for `ticket`; superseded outcomes are ignored.
    pub fn complete(
        mut self,
        ticket: u64,
        outcome: Result<Inference, PredictionError>,
    ) -> Self {
        if self.phase != (EstimatePhase::Submitting { ticket }) {
            debug!(ticket, "ignoring superseded prediction outcome");
            return self;
        }
        self.phase = match outcome {
            Ok(inference) => EstimatePhase::Showing { inference },
            Err(error) => EstimatePhase::Editing { error: Some(error) },
        };
        self
    }

    /// Clears every claim field and any stored result.
    pub fn reset(self) -> Self {
        Self {
            issued: self.issued,
            ..Self::default()
        }
    }

    /// Runs a full submission; a no-op when required fields are missing.
    pub async fn submit<T: Transport + ?Sized>(
        self,
        transport: &T,
        config: &ApiConfig,
    ) -> Self {
        let (form, ticket) = self.begin_submit();
        let Some(ticket) = ticket else {
            return form;
        };
        let outcome = estimate(transport, config, &form.input).await;
        form.complete(ticket, outcome)
    }
}

pub mod api;
pub mod currency;
pub mod exchange;
pub mod models;
pub mod state;

pub use api::{ApiConfig, BaseUrlPolicy, ConfigError, RawResponse, Transport, TransportError};
pub use exchange::{AuthError, PredictionError, authenticate, estimate};
pub use models::*;
pub use state::{AppState, EstimateForm, EstimatePhase, SessionGate};

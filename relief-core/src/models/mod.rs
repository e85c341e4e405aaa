mod cause_of_damage;
mod claim_input;
mod credentials;
mod inference;

pub use cause_of_damage::CauseOfDamage;
pub use claim_input::{ClaimInput, PredictionRequest};
pub use credentials::{AuthMode, AuthRequest, Credentials, MIN_PASSWORD_LEN, Session};
pub use inference::Inference;

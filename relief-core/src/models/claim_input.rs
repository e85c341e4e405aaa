use serde::{Serialize, Serializer};

use super::CauseOfDamage;

/// Claim details as typed into the estimate form.
///
/// Numeric fields stay as text until submission so the form can hold
/// partial input; [`ClaimInput::has_required`] gates submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimInput {
    pub water_depth: String,
    pub flood_water_duration: String,
    pub cause_of_damage: Option<CauseOfDamage>,
    pub flood_event: String,
}

impl ClaimInput {
    /// Every required field is filled in (text fields non-blank, a cause selected).
    pub fn has_required(&self) -> bool {
        !self.water_depth.trim().is_empty()
            && !self.flood_water_duration.trim().is_empty()
            && self.cause_of_damage.is_some()
            && !self.flood_event.trim().is_empty()
    }

    /// Numeric cause value sent to the prediction backend.
    ///
    /// Cause selection is single-valued. Supporting several selected causes
    /// means changing this reduction and nothing else.
    pub fn cause_value(&self) -> Option<f64> {
        match self.cause_of_damage {
            Some(cause) => cause.numeric_str().parse().ok(),
            None => Some(0.0),
        }
    }
}

/// JSON body posted to the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    #[serde(serialize_with = "serialize_number")]
    pub water_depth: f64,
    #[serde(serialize_with = "serialize_number")]
    pub flood_water_duration: f64,
    #[serde(serialize_with = "serialize_number")]
    pub cause_of_damage: f64,
    pub flood_event: String,
}

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Writes whole numbers without a fractional part (`3`, not `3.0`).
fn serialize_number<S: Serializer>(
    value: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

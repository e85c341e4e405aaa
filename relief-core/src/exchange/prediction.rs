//! Claim exchange with the prediction backend.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::common::{FailureClass, classify_failure};
use crate::api::config::PREDICTION_URL_ENV;
use crate::api::{ApiConfig, RawResponse, Transport};
use crate::models::{ClaimInput, Inference, PredictionRequest};

const UNKNOWN_FALLBACK: &str = "Prediction request failed.";

/// Why an estimate could not be produced.
///
/// `Display` is the text shown next to the estimate form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("Please enter valid numbers for water depth and flood water duration.")]
    InvalidNumeric,

    #[error("{0}")]
    ApiError(String),

    #[error("Invalid JSON from prediction API.")]
    MalformedResponse,

    #[error("Prediction API did not return an inference.")]
    NoInference,

    #[error(
        "Could not reach the prediction API at {base_url}. Check your connection or set {} to point \
         at a reachable prediction server.",
        PREDICTION_URL_ENV
    )]
    Unreachable { base_url: String },

    #[error("{0}")]
    Unknown(String),
}

/// Normalizes form text into the wire request.
///
/// Each number is read from the longest numeric prefix of the trimmed text,
/// so `"2.5 ft"` sends 2.5 and `"1,200"` sends 1. The flood event is
/// trimmed and otherwise sent as typed.
///
/// # Errors
/// * [`PredictionError::InvalidNumeric`] when a numeric field has no
///   numeric prefix.
pub fn build_request(input: &ClaimInput) -> Result<PredictionRequest, PredictionError> {
    let water_depth = parse_number(&input.water_depth);
    let flood_water_duration = parse_number(&input.flood_water_duration);
    let cause_of_damage = input.cause_value();

    match (water_depth, flood_water_duration, cause_of_damage) {
        (Some(water_depth), Some(flood_water_duration), Some(cause_of_damage)) => {
            Ok(PredictionRequest {
                water_depth,
                flood_water_duration,
                cause_of_damage,
                flood_event: input.flood_event.trim().to_string(),
            })
        }
        _ => Err(PredictionError::InvalidNumeric),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let text = s.trim();
    let prefix = &text[..numeric_prefix_len(text)];
    match prefix.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        Ok(_) | Err(_) => {
            debug!(input = %s, "no numeric prefix");
            None
        }
    }
}

/// Byte length of the longest leading `[+-]digits[.digits][e[+-]digits]`.
/// Zero when the text does not start with a number.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        mantissa_end = digits_from(int_end + 1);
    }
    // A lone sign or dot is not a number.
    if mantissa_end - end - usize::from(mantissa_end > int_end) == 0 {
        return 0;
    }
    end = mantissa_end;

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

/// Decodes the prediction backend's answer.
///
/// # Errors
/// * [`PredictionError::ApiError`]: non-2xx status; carries the body text,
///   or the status code when the body is empty.
/// * [`PredictionError::MalformedResponse`]: body is not JSON.
/// * [`PredictionError::NoInference`]: JSON without an `inference` property.
pub fn classify_prediction_response(response: &RawResponse) -> Result<Inference, PredictionError> {
    if !response.is_success() {
        return Err(PredictionError::ApiError(if response.body.is_empty() {
            format!("Prediction API error: {}", response.status)
        } else {
            response.body.clone()
        }));
    }

    let value: Value =
        serde_json::from_str(&response.body).map_err(|_| PredictionError::MalformedResponse)?;

    match value {
        Value::Object(mut fields) => fields
            .remove("inference")
            .map(Inference::from_value)
            .ok_or(PredictionError::NoInference),
        _ => Err(PredictionError::NoInference),
    }
}

/// Requests a compensation estimate for `input`.
///
/// Callers gate on [`ClaimInput::has_required`]; this function only checks
/// that the numeric fields parse.
///
/// # Errors
/// See [`build_request`] and [`classify_prediction_response`]; a missing
/// response is [`PredictionError::Unreachable`] or [`PredictionError::Unknown`].
pub async fn estimate<T: Transport + ?Sized>(
    transport: &T,
    config: &ApiConfig,
    input: &ClaimInput,
) -> Result<Inference, PredictionError> {
    let request = build_request(input)?;
    let body = serde_json::to_value(&request).map_err(|e| PredictionError::Unknown(e.to_string()))?;
    let url = config.prediction_url();

    debug!(transport = transport.name(), url = %url, %body, "posting claim");
    let response = match transport.post_json(&url, &body).await {
        Ok(response) => response,
        Err(failure) => {
            warn!(url = %url, error = %failure, "prediction request failed");
            return Err(match classify_failure(&failure, UNKNOWN_FALLBACK) {
                FailureClass::Unreachable => PredictionError::Unreachable {
                    base_url: config.prediction_base.clone(),
                },
                FailureClass::Other(message) => PredictionError::Unknown(message),
            });
        }
    };

    let result = classify_prediction_response(&response);
    match &result {
        Ok(inference) => info!(?inference, "prediction received"),
        Err(error) => warn!(status = response.status, %error, "prediction rejected"),
    }
    result
}

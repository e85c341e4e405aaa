use serde_json::Value;

use crate::currency::format_usd;

/// Compensation estimate returned by the prediction backend.
///
/// Decoded once from the `inference` property so callers never inspect the
/// raw JSON shape again.
#[derive(Debug, Clone, PartialEq)]
pub enum Inference {
    /// A single amount.
    Amount(f64),
    /// A sequence whose first element is numeric; only `first` is displayed.
    Series { first: f64 },
    /// Explicit `null`.
    Empty,
    /// Any other shape, displayed verbatim.
    Other(Value),
}

impl Inference {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Number(n) => match n.as_f64() {
                Some(amount) => Self::Amount(amount),
                None => Self::Other(Value::Number(n)),
            },
            Value::Array(values) => match values.first().and_then(numeric) {
                Some(first) => Self::Series { first },
                // Rendered as JSON text rather than a `$NaN` amount.
                None => Self::Other(Value::Array(values)),
            },
            other => Self::Other(other),
        }
    }

    /// User-facing rendering; `None` when there is nothing to show.
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Amount(amount) | Self::Series { first: amount } => Some(format_usd(*amount)),
            Self::Empty => None,
            Self::Other(Value::String(s)) => Some(s.clone()),
            Self::Other(value) => Some(value.to_string()),
        }
    }
}

/// Numbers and numeric strings both count as amounts inside a sequence.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

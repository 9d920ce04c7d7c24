//! Deserializers for backend fields whose JSON type is not consistent,
//! e.g. a power rating sent as `60` by one endpoint and `"60"` by another.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// Deserialize a JSON string or number as a string.
///
/// `null` and missing values become the empty string when combined with
/// `#[serde(default)]`.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;

    Ok(match value {
        Some(StringOrNumber::String(text)) => text,
        Some(StringOrNumber::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Deserialize a JSON number or numeric string as an `f64`.
///
/// Values that are not numeric or not finite, e.g. `"NaN"` or `"1e400"`, become `None`.
pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;

    let number = match value {
        Some(StringOrNumber::Number(number)) => number.as_f64(),
        Some(StringOrNumber::String(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    };

    Ok(number.filter(|number| number.is_finite()))
}

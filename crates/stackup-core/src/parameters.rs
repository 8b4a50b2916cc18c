//! Query-string parameter codec
//!
//! Turns `Env=prod&Size=2` into the ordered parameter list a create or
//! update request carries. Decoding follows form-urlencoding rules: `+` is a
//! space, `%XX` escapes are percent-decoded, blank values are dropped, and a
//! repeated key keeps the first value seen.

use crate::error::ParameterError;
use std::borrow::Cow;

/// One stack parameter as sent to the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: String,
    /// `None` leaves `UsePreviousValue` out of the request entirely
    pub use_previous_value: Option<bool>,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)?;
        if let Some(use_previous) = self.use_previous_value {
            write!(f, " (use previous: {})", use_previous)?;
        }
        Ok(())
    }
}

/// Decode a query string into parameters, tagging each with `use_previous`
/// when it is set.
pub fn parse_parameters(
    query: &str,
    use_previous: Option<bool>,
) -> Result<Vec<Parameter>, ParameterError> {
    let mut parameters: Vec<Parameter> = Vec::new();

    for segment in query.split('&') {
        let Some((raw_key, raw_value)) = segment.split_once('=') else {
            continue;
        };
        if raw_value.is_empty() {
            continue;
        }

        let key = decode_component(raw_key, segment)?;
        let value = decode_component(raw_value, segment)?;
        if key.is_empty() || value.is_empty() {
            continue;
        }

        if parameters.iter().any(|p| p.key == key) {
            continue;
        }

        parameters.push(Parameter {
            key,
            value,
            use_previous_value: use_previous,
        });
    }

    Ok(parameters)
}

/// Render parameters back into `key=value&...` form
pub fn encode_parameters(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{}={}", urlencoding::encode(&p.key), urlencoding::encode(&p.value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn decode_component(raw: &str, segment: &str) -> Result<String, ParameterError> {
    let spaced: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .map_err(|source| ParameterError::InvalidEncoding {
            segment: segment.to_string(),
            source,
        })
}

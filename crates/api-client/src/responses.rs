//! Decoding of provider response bodies.
//!
//! Bodies are read into a `serde_json::Value` first so a well-formed payload of
//! the wrong shape can be told apart from a malformed record.

use crate::error::ApiError;
use core_types::RawRecord;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key the provider uses for in-band errors on a 200 response.
const ERROR_MESSAGE_KEY: &str = "Error Message";

/// Decodes a historical-price body into raw records.
///
/// Two shapes are accepted: `{ "symbol": .., "historical": [..] }` and a bare
/// array of records. Records without a symbol of their own take the
/// wrapper's symbol, or `symbol` when there is no wrapper.
pub fn parse_historical(body: &str, symbol: &str) -> Result<Vec<RawRecord>, ApiError> {
    let value = parse_value(body)?;

    let (wrapper_symbol, records) = match value {
        Value::Object(mut object) => {
            if let Some(message) = object.get(ERROR_MESSAGE_KEY).and_then(Value::as_str) {
                return Err(ApiError::ApiError(message.to_string()));
            }
            let Some(historical) = object.remove("historical") else {
                return Err(ApiError::UnexpectedFormat(format!(
                    "object without 'historical' (keys: {})",
                    object.keys().cloned().collect::<Vec<_>>().join(", ")
                )));
            };
            let wrapper_symbol = object
                .get("symbol")
                .and_then(Value::as_str)
                .map(str::to_string);
            (wrapper_symbol, historical)
        }
        array @ Value::Array(_) => (None, array),
        other => {
            return Err(ApiError::UnexpectedFormat(format!(
                "expected an object or array, got {}",
                kind_of(&other)
            )));
        }
    };

    let mut records: Vec<RawRecord> = serde_json::from_value(records)
        .map_err(|e| ApiError::Deserialization(e.to_string()))?;

    let fallback = wrapper_symbol.unwrap_or_else(|| symbol.to_string());
    for record in records.iter_mut().filter(|r| r.symbol.is_empty()) {
        record.symbol = fallback.clone();
    }

    Ok(records)
}

/// Decodes an array body into every element.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    match parse_value(body)? {
        array @ Value::Array(_) => {
            serde_json::from_value(array).map_err(|e| ApiError::Deserialization(e.to_string()))
        }
        Value::Object(object) => match object.get(ERROR_MESSAGE_KEY).and_then(Value::as_str) {
            Some(message) => Err(ApiError::ApiError(message.to_string())),
            None => Err(ApiError::UnexpectedFormat(
                "expected an array, got object".to_string(),
            )),
        },
        other => Err(ApiError::UnexpectedFormat(format!(
            "expected an array, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decodes an array body and keeps only its first element.
///
/// Snapshot endpoints answer with a one-element array; an empty array means
/// the provider has nothing for the symbol.
pub fn parse_first<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ApiError> {
    Ok(parse_list::<T>(body)?.into_iter().next())
}

fn parse_value(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

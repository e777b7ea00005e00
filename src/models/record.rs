//! Record-by-record decoding of collaborator input
//!
//! Accounts and transactions arrive as loosely typed documents. Each one is
//! decoded on its own, so a field of the wrong type costs that record only.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::EngineWarning;

/// Key a record is reported under: its id when usable, else `#index`
pub(crate) fn record_key(id: Option<&str>, index: usize) -> String {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("#{}", index),
    }
}

/// Decode and validate every record, turning failures into warnings
///
/// `validate` receives each decoded record with its index and returns the
/// typed value or the `MalformedRecord` key and reason.
pub(crate) fn decode_all<R, T, F>(values: &[Value], mut validate: F) -> (Vec<T>, Vec<EngineWarning>)
where
    R: DeserializeOwned,
    F: FnMut(R, usize) -> Result<T, (String, String)>,
{
    let mut decoded = Vec::with_capacity(values.len());
    let mut warnings = Vec::new();

    for (index, value) in values.iter().enumerate() {
        let result = R::deserialize(value)
            .map_err(|e| {
                let id = value.get("id").and_then(Value::as_str);
                (record_key(id, index), e.to_string())
            })
            .and_then(|record| validate(record, index));

        match result {
            Ok(item) => decoded.push(item),
            Err((key, reason)) => {
                let warning = EngineWarning::malformed_record(key, reason);
                warning.emit();
                warnings.push(warning);
            }
        }
    }

    (decoded, warnings)
}

//! Input validation for multi-stack configuration
//!
//! Region codes are checked against a closed set of known codes. The mapping
//! helpers give every shape error in the raw section the same wording.

use crate::constants::KNOWN_REGIONS;
use crate::error::{MultiStackError, Result};
use crate::models::Region;
use serde_json::{Map, Value};

/// Whether `code` is one of the known region codes
pub fn is_known_region(code: &str) -> bool {
    KNOWN_REGIONS.contains(&code)
}

/// Validates requested region codes, preserving order and dropping duplicates
pub fn validate_regions<'a, I>(codes: I) -> Result<Vec<Region>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut regions: Vec<Region> = Vec::new();
    let mut unknown: Vec<&str> = Vec::new();

    for code in codes {
        if !is_known_region(code) {
            unknown.push(code);
            continue;
        }
        let region = Region::parse(code)?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }

    if !unknown.is_empty() {
        return Err(MultiStackError::validation(format!(
            "unknown region code(s): {}",
            unknown.join(", ")
        )));
    }

    Ok(regions)
}

/// Requires `value[key]` to be present and a mapping
pub fn require_mapping<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>> {
    match value.get(key) {
        None | Some(Value::Null) => Err(MultiStackError::validation(format!(
            "[{key}] is a required field"
        ))),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(MultiStackError::validation(format!(
            "[{key}] must be a mapping"
        ))),
    }
}

/// Accepts a missing or null mapping as empty
pub fn optional_mapping<'a>(
    value: Option<&'a Value>,
    label: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(MultiStackError::validation(format!(
            "{label} must be a mapping"
        ))),
    }
}

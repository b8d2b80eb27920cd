use crate::error::{MultiStackError, Result};
use crate::validation::is_known_region;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated deployment region code
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn parse(code: &str) -> Result<Self> {
        if is_known_region(code) {
            Ok(Self(code.to_string()))
        } else {
            Err(MultiStackError::validation(format!(
                "unknown region code: {code}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Region {
    type Error = MultiStackError;

    fn try_from(value: String) -> Result<Self> {
        Region::parse(&value)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Region {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

pub const DISPLAY_NAME_PREFIX: &str = "Food_Images";

lazy_static! {
    static ref DISPLAY_NAME_REGEX: regex::Regex =
        regex::Regex::new(r"^Food_Images\d+$").unwrap();
}

/// Name a saved image is registered under: the fixed prefix plus unix seconds.
///
/// Two saves within the same second produce the same name; the store decides
/// how to keep both files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DisplayName {
    #[validate(regex(path = *DISPLAY_NAME_REGEX))]
    pub value: String,
}

impl DisplayName {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let name = Self { value };
        name.validate()?;
        Ok(name)
    }

    /// Clocks set before the epoch map to `Food_Images0`.
    pub fn for_timestamp(at: DateTime<Utc>) -> Self {
        Self {
            value: format!("{}{}", DISPLAY_NAME_PREFIX, at.timestamp().max(0)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

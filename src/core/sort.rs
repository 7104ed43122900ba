//! Sort configuration types and their persisted shapes

use crate::core::error::{PreferenceError, PreferenceResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Prefix of every local cache key
pub const CACHE_KEY_PREFIX: &str = "sort-preferences-";

/// Field used when neither a stored preference nor a caller default exists
pub const DEFAULT_SORT_FIELD: &str = "id";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortDirection {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(PreferenceError::InvalidConfig(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

/// How a collection should be ordered: a dotted field path and a direction
///
/// The field is never empty; use [`SortConfig::new`] to build one from
/// untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: String,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Create a sort configuration, rejecting an empty field
    pub fn new(field: impl Into<String>, direction: SortDirection) -> PreferenceResult<Self> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(PreferenceError::InvalidConfig(
                "sort field must not be empty".to_string(),
            ));
        }
        Ok(Self { field, direction })
    }

    /// Ascending configuration on `field`
    pub fn asc(field: impl Into<String>) -> PreferenceResult<Self> {
        Self::new(field, SortDirection::Asc)
    }

    /// Descending configuration on `field`
    pub fn desc(field: impl Into<String>) -> PreferenceResult<Self> {
        Self::new(field, SortDirection::Desc)
    }

    /// Configuration after a header click on `field`
    ///
    /// Same field flips the direction, any other field starts ascending.
    pub fn toggled(&self, field: &str) -> Self {
        if self.field == field {
            Self {
                field: self.field.clone(),
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field: field.to_string(),
                direction: SortDirection::Asc,
            }
        }
    }

    /// Header arrow for `field`: `▲`/`▼` when it is the active field
    pub fn indicator(&self, field: &str) -> &'static str {
        if self.field != field {
            return "";
        }
        match self.direction {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

/// Persisted shape of a preference, shared by the local cache and the remote tier
///
/// ```json
/// { "sortField": "client.name", "sortDirection": "desc" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPreference {
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl From<&SortConfig> for StoredPreference {
    fn from(config: &SortConfig) -> Self {
        Self {
            sort_field: config.field.clone(),
            sort_direction: config.direction,
        }
    }
}

impl TryFrom<StoredPreference> for SortConfig {
    type Error = PreferenceError;

    fn try_from(stored: StoredPreference) -> Result<Self, Self::Error> {
        SortConfig::new(stored.sort_field, stored.sort_direction)
    }
}

impl StoredPreference {
    /// Parse a cache entry; any malformed or invalid payload is an error
    pub fn parse(raw: &str) -> PreferenceResult<SortConfig> {
        let stored: StoredPreference = serde_json::from_str(raw)?;
        stored.try_into()
    }

    /// Serialize a config into the cache entry format
    pub fn encode(config: &SortConfig) -> PreferenceResult<String> {
        Ok(serde_json::to_string(&StoredPreference::from(config))?)
    }
}

/// Body of `POST /api/user-sort-preferences`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePreferenceRequest {
    pub table_name: String,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl SavePreferenceRequest {
    pub fn new(table_name: &str, config: &SortConfig) -> Self {
        Self {
            table_name: table_name.to_string(),
            sort_field: config.field.clone(),
            sort_direction: config.direction,
        }
    }

    /// Split into the table name and a validated config
    pub fn into_parts(self) -> PreferenceResult<(String, SortConfig)> {
        let config = SortConfig::new(self.sort_field, self.sort_direction)?;
        Ok((self.table_name, config))
    }
}

/// Local cache key for a table
pub fn cache_key(table_name: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, table_name)
}

/// Check that a table identifier is usable as a key in both tiers
pub fn validate_table_name(table_name: &str) -> PreferenceResult<()> {
    static TABLE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TABLE_NAME_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,127}$").expect("table name pattern is valid")
    });
    if regex.is_match(table_name) {
        Ok(())
    } else {
        Err(PreferenceError::InvalidTableName(table_name.to_string()))
    }
}

//! Tool invocation profiles
//!
//! Profiles are supplied as a JSON list of `{tool, group, options}` objects.
//! The `options` object is free-form and passed through to the tool
//! unmodified.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;

/// Default group used when a profile does not name one.
pub const DEFAULT_GROUP: &str = "default";

/// Configuration for one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactToolProfile {
    /// Registry identifier of the tool
    pub tool: String,
    /// Group to file artifacts under; defaults to [`DEFAULT_GROUP`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Free-form tool options, passed through unmodified
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl ArtifactToolProfile {
    /// Create a profile with no options.
    pub fn new(tool: impl Into<String>, group: Option<&str>) -> Self {
        Self {
            tool: tool.into(),
            group: group.map(str::to_string),
            options: Map::new(),
        }
    }

    /// Add one option (builder pattern).
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// The effective group for this profile.
    pub fn group_or_default(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }
}

/// Parse a JSON list of profiles from a string.
pub fn profiles_from_str(data: &str) -> Result<Vec<ArtifactToolProfile>> {
    let profiles: Vec<ArtifactToolProfile> = serde_json::from_str(data)?;
    validate_profiles(&profiles)?;
    Ok(profiles)
}

/// Parse a JSON list of profiles from a reader.
pub fn profiles_from_reader(mut reader: impl Read) -> Result<Vec<ArtifactToolProfile>> {
    let mut data = String::new();
    reader.read_to_string(&mut data)?;
    profiles_from_str(&data)
}

fn validate_profiles(profiles: &[ArtifactToolProfile]) -> Result<()> {
    for profile in profiles {
        if profile.tool.is_empty() {
            return Err(Error::InvalidProfile(
                "profile with empty tool name".to_string(),
            ));
        }
    }
    Ok(())
}

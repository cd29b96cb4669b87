use std::collections::BTreeMap;

use nodewire_api::{StreamError, StreamInput, StreamOutput, WireValue};
use serde::{Deserialize, Serialize};

/// Flat `key = value` node settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(pub BTreeMap<String, String>);

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SettingsBuilder {
    entries: BTreeMap<String, String>,
}

impl SettingsBuilder {
    pub fn put(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Settings {
        Settings(self.entries)
    }
}

impl WireValue for Settings {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_string_map(&self.0)
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Settings(input.read_string_map()?))
    }
}

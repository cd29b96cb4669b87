use nodewire_api::{StreamError, StreamInput, StreamOutput, WireValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadPoolEntry {
    pub name: String,
    /// `fixed`, `scaling`, `cached`, ...
    pub kind: String,
    pub min: i32,
    pub max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_size: Option<i64>,
}

impl ThreadPoolEntry {
    /// Fixed-size pool: `min == max == size`, no keep-alive.
    pub fn fixed(name: impl Into<String>, size: i32) -> Self {
        Self {
            name: name.into(),
            kind: "fixed".into(),
            min: size,
            max: size,
            keep_alive_ms: None,
            queue_size: None,
        }
    }
}

impl WireValue for ThreadPoolEntry {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.name)?;
        out.write_string(&self.kind)?;
        out.write_i32(self.min);
        out.write_i32(self.max);
        out.write_optional_i64(self.keep_alive_ms);
        out.write_optional_i64(self.queue_size);
        Ok(())
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            name: input.read_string()?,
            kind: input.read_string()?,
            min: input.read_i32()?,
            max: input.read_i32()?,
            keep_alive_ms: input.read_optional_i64()?,
            queue_size: input.read_optional_i64()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadPoolInfo {
    pub pools: Vec<ThreadPoolEntry>,
}

impl WireValue for ThreadPoolInfo {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_values(&self.pools)
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            pools: input.read_values()?,
        })
    }
}

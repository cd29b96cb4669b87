//! `indices:admin/rebuild`: rebuild secondary indices from the primary
//! data, optionally streaming it from another data center.

use nodewire_api::{
    RecordSchema, StreamError, StreamInput, StreamOutput, VersionRange, VersionedRecord, WireValue,
};
use nodewire_node::versions::V_5_0_0;
use serde::{Deserialize, Serialize};

use crate::action::ClusterAction;

pub struct RebuildAction;

impl ClusterAction for RebuildAction {
    const NAME: &'static str = "indices:admin/rebuild";
    type Request = RebuildRequest;
    type Response = RebuildResponse;
}

/// How index names and wildcards in a request are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicesOptions(u8);

impl IndicesOptions {
    pub const IGNORE_UNAVAILABLE: u8 = 1;
    pub const ALLOW_NO_INDICES: u8 = 2;
    pub const EXPAND_OPEN: u8 = 4;
    pub const EXPAND_CLOSED: u8 = 8;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Unavailable indices are errors, wildcards expand to open indices.
    pub const fn strict_expand_open() -> Self {
        Self(Self::ALLOW_NO_INDICES | Self::EXPAND_OPEN)
    }
}

impl Default for IndicesOptions {
    fn default() -> Self {
        Self::strict_expand_open()
    }
}

// ════════════════════════════════════════════════════════════════
//  Request
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildRequest {
    pub indices: Vec<String>,
    #[serde(default)]
    pub indices_options: IndicesOptions,
    /// Data center to stream from; dropped when talking to peers before 5.0.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_data_center: Option<String>,
}

impl RebuildRequest {
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn source_data_center(mut self, dc: impl Into<String>) -> Self {
        self.source_data_center = Some(dc.into());
        self
    }

    pub fn indices_options(mut self, options: IndicesOptions) -> Self {
        self.indices_options = options;
        self
    }
}

impl VersionedRecord for RebuildRequest {
    const RECORD_TYPE: &'static str = "rebuild_request";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "indices",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_string_array(&r.indices)?),
                |r, dec| {
                    r.indices = dec.input.read_string_array()?;
                    Ok(())
                },
            )
            .field(
                "indices_options",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_u8(r.indices_options.bits());
                    Ok(())
                },
                |r, dec| {
                    r.indices_options = IndicesOptions::from_bits(dec.input.read_u8()?);
                    Ok(())
                },
            )
            .field(
                "source_data_center",
                VersionRange::since(V_5_0_0),
                |r, enc| Ok(enc.out.write_optional_string(r.source_data_center.as_deref())?),
                |r, dec| {
                    r.source_data_center = dec.input.read_optional_string()?;
                    Ok(())
                },
            )
    }
}

// ════════════════════════════════════════════════════════════════
//  Response
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardFailure {
    pub index: String,
    pub shard: i32,
    pub reason: String,
}

impl WireValue for ShardFailure {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.index)?;
        out.write_i32(self.shard);
        out.write_string(&self.reason)
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            index: input.read_string()?,
            shard: input.read_i32()?,
            reason: input.read_string()?,
        })
    }
}

/// Per-shard outcome of a rebuild. `failed_shards` counts every failure,
/// `shard_failures` may hold fewer entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuildResponse {
    pub total_shards: i32,
    pub successful_shards: i32,
    pub failed_shards: i32,
    #[serde(default)]
    pub shard_failures: Vec<ShardFailure>,
}

impl VersionedRecord for RebuildResponse {
    const RECORD_TYPE: &'static str = "rebuild_response";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "total_shards",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i32(r.total_shards);
                    Ok(())
                },
                |r, dec| {
                    r.total_shards = dec.input.read_i32()?;
                    Ok(())
                },
            )
            .field(
                "successful_shards",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i32(r.successful_shards);
                    Ok(())
                },
                |r, dec| {
                    r.successful_shards = dec.input.read_i32()?;
                    Ok(())
                },
            )
            .field(
                "failed_shards",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i32(r.failed_shards);
                    Ok(())
                },
                |r, dec| {
                    r.failed_shards = dec.input.read_i32()?;
                    Ok(())
                },
            )
            .field(
                "shard_failures",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_values(&r.shard_failures)?),
                |r, dec| {
                    r.shard_failures = dec.input.read_values()?;
                    Ok(())
                },
            )
    }
}


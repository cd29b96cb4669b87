use nodewire_api::{RecordSchema, VersionRange, VersionedRecord};
use serde::{Deserialize, Serialize};

use crate::versions::V_2_2_0;

/// Operating-system facts reported by a node.
///
/// Streams older than 2.2.0 only carry the refresh interval and the
/// processor counts; `name`, `arch` and `version` read back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsInfo {
    pub refresh_interval: i64,
    pub available_processors: i32,
    pub allocated_processors: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl VersionedRecord for OsInfo {
    const RECORD_TYPE: &'static str = "os_info";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "refresh_interval",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i64(r.refresh_interval);
                    Ok(())
                },
                |r, dec| {
                    r.refresh_interval = dec.input.read_i64()?;
                    Ok(())
                },
            )
            .field(
                "available_processors",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i32(r.available_processors);
                    Ok(())
                },
                |r, dec| {
                    r.available_processors = dec.input.read_i32()?;
                    Ok(())
                },
            )
            .field(
                "allocated_processors",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i32(r.allocated_processors);
                    Ok(())
                },
                |r, dec| {
                    r.allocated_processors = dec.input.read_i32()?;
                    Ok(())
                },
            )
            .field(
                "name",
                VersionRange::since(V_2_2_0),
                |r, enc| Ok(enc.out.write_optional_string(r.name.as_deref())?),
                |r, dec| {
                    r.name = dec.input.read_optional_string()?;
                    Ok(())
                },
            )
            .field(
                "arch",
                VersionRange::since(V_2_2_0),
                |r, enc| Ok(enc.out.write_optional_string(r.arch.as_deref())?),
                |r, dec| {
                    r.arch = dec.input.read_optional_string()?;
                    Ok(())
                },
            )
            .field(
                "version",
                VersionRange::since(V_2_2_0),
                |r, enc| Ok(enc.out.write_optional_string(r.version.as_deref())?),
                |r, dec| {
                    r.version = dec.input.read_optional_string()?;
                    Ok(())
                },
            )
    }
}

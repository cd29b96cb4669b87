use nodewire_api::{RecordSchema, VersionRange, VersionedRecord};
use serde::{Deserialize, Serialize};

use crate::versions::V_5_0_0;

/// Identifies the exact build a node is running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub short_hash: String,
    pub date: String,
    /// Not streamed before 5.0.0; reads as `false` there.
    #[serde(default)]
    pub snapshot: bool,
}

impl Build {
    pub fn new(short_hash: impl Into<String>, date: impl Into<String>, snapshot: bool) -> Self {
        Self {
            short_hash: short_hash.into(),
            date: date.into(),
            snapshot,
        }
    }
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}][{}]", self.short_hash, self.date)?;
        if self.snapshot {
            write!(f, "[snapshot]")?;
        }
        Ok(())
    }
}

impl VersionedRecord for Build {
    const RECORD_TYPE: &'static str = "build";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "short_hash",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_string(&r.short_hash)?),
                |r, dec| {
                    r.short_hash = dec.input.read_string()?;
                    Ok(())
                },
            )
            .field(
                "date",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_string(&r.date)?),
                |r, dec| {
                    r.date = dec.input.read_string()?;
                    Ok(())
                },
            )
            .field(
                "snapshot",
                VersionRange::since(V_5_0_0),
                |r, enc| {
                    enc.out.write_bool(r.snapshot);
                    Ok(())
                },
                |r, dec| {
                    r.snapshot = dec.input.read_bool()?;
                    Ok(())
                },
            )
    }
}

use crate::error::CodecError;
use crate::registry::{Registry, VersionedRecord};
use crate::stream::{StreamInput, StreamOutput};
use crate::version::Version;

// ════════════════════════════════════════════════════════════════
//  Encoder
// ════════════════════════════════════════════════════════════════

/// Encoding context handed to every field codec: target version, registry
/// for nested records, and the output buffer.
pub struct Encoder<'r> {
    registry: &'r Registry,
    version: Version,
    pub out: StreamOutput,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r Registry, version: Version) -> Self {
        Self {
            registry,
            version,
            out: StreamOutput::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Write every field of `record` active at the target version.
    pub fn write_record<U: VersionedRecord>(&mut self, record: &U) -> Result<(), CodecError> {
        let registry = self.registry;
        let schema = registry.schema::<U>()?;
        for field in schema.resolve(self.version) {
            (field.encode)(record, self).map_err(|e| e.within(U::RECORD_TYPE, field.name))?;
        }
        Ok(())
    }

    pub fn write_optional<V>(
        &mut self,
        value: Option<&V>,
        write: impl FnOnce(&mut Self, &V) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        match value {
            Some(v) => {
                self.out.write_bool(true);
                write(self, v)
            }
            None => {
                self.out.write_bool(false);
                Ok(())
            }
        }
    }

    pub fn write_optional_record<U: VersionedRecord>(
        &mut self,
        record: Option<&U>,
    ) -> Result<(), CodecError> {
        self.write_optional(record, |enc, r| enc.write_record(r))
    }

    /// Varint count followed by each element.
    pub fn write_records<U: VersionedRecord>(&mut self, records: &[U]) -> Result<(), CodecError> {
        self.out.write_len(records.len())?;
        for r in records {
            self.write_record(r)?;
        }
        Ok(())
    }
}

/// Unwrap a required value or report it missing.
pub fn required<V>(value: Option<&V>) -> Result<&V, CodecError> {
    value.ok_or_else(CodecError::missing)
}

// ════════════════════════════════════════════════════════════════
//  Decoder
// ════════════════════════════════════════════════════════════════

/// Decoding context: declared version, registry for nested records, and
/// the input cursor.
pub struct Decoder<'r, 'a> {
    registry: &'r Registry,
    version: Version,
    pub input: StreamInput<'a>,
}

impl<'r, 'a> Decoder<'r, 'a> {
    pub fn new(registry: &'r Registry, version: Version, bytes: &'a [u8]) -> Self {
        Self {
            registry,
            version,
            input: StreamInput::new(bytes),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Start from `U::default()` and apply every decoder active at the
    /// declared version. Inactive fields keep their default.
    pub fn read_record<U: VersionedRecord>(&mut self) -> Result<U, CodecError> {
        let registry = self.registry;
        let schema = registry.schema::<U>()?;
        let mut record = U::default();
        for field in schema.resolve(self.version) {
            (field.decode)(&mut record, self).map_err(|e| e.within(U::RECORD_TYPE, field.name))?;
        }
        Ok(record)
    }

    pub fn read_optional<V>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<V, CodecError>,
    ) -> Result<Option<V>, CodecError> {
        if self.input.read_bool()? {
            Ok(Some(read(self)?))
        } else {
            Ok(None)
        }
    }

    pub fn read_optional_record<U: VersionedRecord>(&mut self) -> Result<Option<U>, CodecError> {
        self.read_optional(|dec| dec.read_record())
    }

    pub fn read_records<U: VersionedRecord>(&mut self) -> Result<Vec<U>, CodecError> {
        let len = self.input.read_len()?;
        let mut out = Vec::with_capacity(self.input.capacity_hint(len));
        for _ in 0..len {
            out.push(self.read_record()?);
        }
        Ok(out)
    }
}

// ════════════════════════════════════════════════════════════════
//  Envelope
// ════════════════════════════════════════════════════════════════

/// Entry point for turning whole records into bytes and back.
///
/// The version is never embedded in the bytes; sender and receiver pass the
/// negotiated version explicitly.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'r> {
    registry: &'r Registry,
}

impl<'r> Envelope<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn encode<T: VersionedRecord>(&self, record: &T, version: Version) -> Result<Vec<u8>, CodecError> {
        let mut enc = Encoder::new(self.registry, version);
        enc.write_record(record)?;
        let bytes = enc.out.into_bytes();
        tracing::trace!(
            record = T::RECORD_TYPE,
            version = %version,
            bytes = bytes.len(),
            "encoded envelope"
        );
        Ok(bytes)
    }

    /// Decode a complete envelope. Leftover bytes mean the stream was written
    /// for a different version and are rejected.
    pub fn decode<T: VersionedRecord>(&self, bytes: &[u8], version: Version) -> Result<T, CodecError> {
        let mut dec = Decoder::new(self.registry, version, bytes);
        let record = dec.read_record::<T>()?;
        let remaining = dec.input.remaining();
        if remaining != 0 {
            return Err(CodecError::TrailingBytes {
                record: T::RECORD_TYPE,
                remaining,
            });
        }
        tracing::trace!(
            record = T::RECORD_TYPE,
            version = %version,
            bytes = bytes.len(),
            "decoded envelope"
        );
        Ok(record)
    }
}

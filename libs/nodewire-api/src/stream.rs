//! Primitive byte layout shared by every field codec.
//!
//! All multi-byte integers are big-endian. Variable-length values (strings,
//! collections) are prefixed with a 7-bit varint length, which keeps the
//! stream self-delimiting.

use std::collections::BTreeMap;

use crate::error::StreamError;
use crate::version::Version;

/// Longest legal varint encoding of a `u32`.
const MAX_VINT_BYTES: usize = 5;

// ════════════════════════════════════════════════════════════════
//  WireValue
// ════════════════════════════════════════════════════════════════

/// A value whose layout never changes between protocol versions.
///
/// Anything whose shape depends on the version is a
/// [`VersionedRecord`](crate::registry::VersionedRecord) instead.
pub trait WireValue: Sized {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError>;

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError>;
}

// ════════════════════════════════════════════════════════════════
//  StreamOutput
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct StreamOutput {
    buf: Vec<u8>,
}

impl StreamOutput {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_vint(&mut self, mut value: u32) {
        while value & !0x7F != 0 {
            self.buf.push((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    /// Collection size or byte length as a varint.
    pub fn write_len(&mut self, len: usize) -> Result<(), StreamError> {
        let len = u32::try_from(len)
            .map_err(|_| StreamError::Malformed(format!("length {len} exceeds u32")))?;
        self.write_vint(len);
        Ok(())
    }

    /// Collection size as a fixed 4-byte count.
    pub fn write_count_i32(&mut self, count: usize) -> Result<(), StreamError> {
        let count = i32::try_from(count)
            .map_err(|_| StreamError::Malformed(format!("count {count} exceeds i32")))?;
        self.write_i32(count);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), StreamError> {
        self.write_len(value.len())?;
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn write_optional_string(&mut self, value: Option<&str>) -> Result<(), StreamError> {
        match value {
            Some(s) => {
                self.write_bool(true);
                self.write_string(s)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    pub fn write_optional_i64(&mut self, value: Option<i64>) {
        match value {
            Some(v) => {
                self.write_bool(true);
                self.write_i64(v);
            }
            None => self.write_bool(false),
        }
    }

    pub fn write_string_array(&mut self, values: &[String]) -> Result<(), StreamError> {
        self.write_len(values.len())?;
        for v in values {
            self.write_string(v)?;
        }
        Ok(())
    }

    /// Release id as a varint.
    pub fn write_version(&mut self, version: Version) -> Result<(), StreamError> {
        let id = version.id()?;
        self.write_vint(id as u32);
        Ok(())
    }

    pub fn write_value<V: WireValue>(&mut self, value: &V) -> Result<(), StreamError> {
        value.write_to(self)
    }

    pub fn write_optional_value<V: WireValue>(&mut self, value: Option<&V>) -> Result<(), StreamError> {
        match value {
            Some(v) => {
                self.write_bool(true);
                v.write_to(self)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    /// Varint count followed by each value.
    pub fn write_values<V: WireValue>(&mut self, values: &[V]) -> Result<(), StreamError> {
        self.write_len(values.len())?;
        for v in values {
            v.write_to(self)?;
        }
        Ok(())
    }

    /// Entries are written in key order, so equal maps give equal bytes.
    pub fn write_string_map(&mut self, map: &BTreeMap<String, String>) -> Result<(), StreamError> {
        self.write_len(map.len())?;
        for (key, value) in map {
            self.write_string(key)?;
            self.write_string(value)?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════
//  StreamInput
// ════════════════════════════════════════════════════════════════

/// Cursor over an already-received byte buffer.
#[derive(Debug, Clone)]
pub struct StreamInput<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StreamInput<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], StreamError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(StreamError::Eof {
                needed: n,
                remaining,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, StreamError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StreamError::Malformed(format!("boolean byte {other:#04x}"))),
        }
    }

    pub fn read_i16(&mut self) -> Result<i16, StreamError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, StreamError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, StreamError> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    pub fn read_vint(&mut self) -> Result<u32, StreamError> {
        let mut value = 0u32;
        for i in 0..MAX_VINT_BYTES {
            let b = self.read_u8()?;
            if i == MAX_VINT_BYTES - 1 && b & 0xF0 != 0 {
                return Err(StreamError::Malformed("varint overflows u32".into()));
            }
            value |= ((b & 0x7F) as u32) << (7 * i);
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(StreamError::Malformed("varint overflows u32".into()))
    }

    pub fn read_len(&mut self) -> Result<usize, StreamError> {
        Ok(self.read_vint()? as usize)
    }

    /// Fixed 4-byte count; negative values are malformed.
    pub fn read_count_i32(&mut self) -> Result<usize, StreamError> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| StreamError::Malformed(format!("negative count {count}")))
    }

    pub fn read_string(&mut self) -> Result<String, StreamError> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| StreamError::Malformed(format!("string: {e}")))
    }

    pub fn read_optional_string(&mut self) -> Result<Option<String>, StreamError> {
        if self.read_bool()? {
            Ok(Some(self.read_string()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_optional_i64(&mut self) -> Result<Option<i64>, StreamError> {
        if self.read_bool()? {
            Ok(Some(self.read_i64()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_string_array(&mut self) -> Result<Vec<String>, StreamError> {
        let len = self.read_len()?;
        let mut out = Vec::with_capacity(self.capacity_hint(len));
        for _ in 0..len {
            out.push(self.read_string()?);
        }
        Ok(out)
    }

    pub fn read_string_map(&mut self) -> Result<BTreeMap<String, String>, StreamError> {
        let len = self.read_len()?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let key = self.read_map_key(&map)?;
            let value = self.read_string()?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// Next key of a map written in key order. Each key must sort strictly
    /// after the last one already in `map`.
    pub fn read_map_key<V>(&mut self, map: &BTreeMap<String, V>) -> Result<String, StreamError> {
        let key = self.read_string()?;
        if let Some((last, _)) = map.last_key_value() {
            if *last == key {
                return Err(StreamError::Malformed(format!("map: duplicate key '{key}'")));
            }
            if *last > key {
                return Err(StreamError::Malformed(format!(
                    "map: key '{key}' after '{last}'"
                )));
            }
        }
        Ok(key)
    }

    pub fn read_version(&mut self) -> Result<Version, StreamError> {
        let id = self.read_vint()?;
        let id = i32::try_from(id).map_err(|_| StreamError::Malformed(format!("version id {id}")))?;
        Ok(Version::from_id(id)?)
    }

    pub fn read_value<V: WireValue>(&mut self) -> Result<V, StreamError> {
        V::read_from(self)
    }

    pub fn read_optional_value<V: WireValue>(&mut self) -> Result<Option<V>, StreamError> {
        if self.read_bool()? {
            Ok(Some(V::read_from(self)?))
        } else {
            Ok(None)
        }
    }

    pub fn read_values<V: WireValue>(&mut self) -> Result<Vec<V>, StreamError> {
        let len = self.read_len()?;
        let mut out = Vec::with_capacity(self.capacity_hint(len));
        for _ in 0..len {
            out.push(V::read_from(self)?);
        }
        Ok(out)
    }

    /// Pre-allocation bound for a collection of `count` elements: every
    /// element takes at least one byte, so a hostile count cannot make us
    /// allocate more than the buffer holds.
    pub fn capacity_hint(&self, count: usize) -> usize {
        count.min(self.remaining())
    }
}

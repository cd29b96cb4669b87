//! Transport framing for envelopes.
//!
//! Envelope bytes never carry their own version, so a frame puts the
//! negotiated version id next to the payload:
//!
//! ```text
//! [len: 1|2|4 bytes][version id: i32 BE][payload]
//! ```
//!
//! `len` covers the version id and the payload.

pub mod error;

use nodewire_api::Version;
use serde::{Deserialize, Serialize};

pub use error::FramingError;

/// Width of the version id inside a frame.
const VERSION_BYTES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub version: Version,
    pub payload: Vec<u8>,
}

/// Splits a byte stream into frames and back. Stateless: the caller owns
/// the buffer.
pub trait Framing: Send + Sync {
    /// Extract one frame from the front of `buf`.
    /// Returns the frame and the bytes consumed, or `None` if incomplete.
    fn decode(&self, buf: &[u8]) -> Result<Option<(Frame, usize)>, FramingError>;

    /// Append the framed form of `frame` to `buf`.
    fn encode(&self, frame: &Frame, buf: &mut Vec<u8>) -> Result<(), FramingError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

// ════════════════════════════════════════════════════════════════
//  Config
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Length header width in bytes: 1, 2 or 4.
    pub length_bytes: usize,

    /// "big" or "little".
    pub byte_order: String,

    /// Largest accepted payload in bytes (0 = unlimited).
    pub max_payload: usize,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            length_bytes: 4,
            byte_order: "big".to_string(),
            max_payload: 0,
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  LengthPrefixedFraming
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct LengthPrefixedFraming {
    length_bytes: usize,
    byte_order: ByteOrder,
    max_payload: usize,
}

impl Default for LengthPrefixedFraming {
    fn default() -> Self {
        Self {
            length_bytes: 4,
            byte_order: ByteOrder::Big,
            max_payload: 0,
        }
    }
}

impl LengthPrefixedFraming {
    pub fn from_config(cfg: &FramingConfig) -> Result<Self, FramingError> {
        if !matches!(cfg.length_bytes, 1 | 2 | 4) {
            return Err(FramingError::Config(format!(
                "length_bytes must be 1, 2, or 4, got {}",
                cfg.length_bytes
            )));
        }

        let byte_order = match cfg.byte_order.as_str() {
            "big" | "be" => ByteOrder::Big,
            "little" | "le" => ByteOrder::Little,
            other => {
                return Err(FramingError::Config(format!(
                    "byte_order must be \"big\" or \"little\", got {other:?}"
                )));
            }
        };

        Ok(Self {
            length_bytes: cfg.length_bytes,
            byte_order,
            max_payload: cfg.max_payload,
        })
    }

    fn read_len(&self, buf: &[u8]) -> usize {
        match (self.length_bytes, self.byte_order) {
            (1, _) => buf[0] as usize,
            (2, ByteOrder::Big) => u16::from_be_bytes([buf[0], buf[1]]) as usize,
            (2, ByteOrder::Little) => u16::from_le_bytes([buf[0], buf[1]]) as usize,
            (_, ByteOrder::Big) => u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize,
            (_, ByteOrder::Little) => u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize,
        }
    }

    fn write_len(&self, len: usize, buf: &mut Vec<u8>) -> Result<(), FramingError> {
        let overflow = || FramingError::HeaderOverflow {
            len,
            width: self.length_bytes,
        };
        match (self.length_bytes, self.byte_order) {
            (1, _) => buf.push(u8::try_from(len).map_err(|_| overflow())?),
            (2, ByteOrder::Big) => {
                buf.extend_from_slice(&u16::try_from(len).map_err(|_| overflow())?.to_be_bytes())
            }
            (2, ByteOrder::Little) => {
                buf.extend_from_slice(&u16::try_from(len).map_err(|_| overflow())?.to_le_bytes())
            }
            (_, ByteOrder::Big) => {
                buf.extend_from_slice(&u32::try_from(len).map_err(|_| overflow())?.to_be_bytes())
            }
            (_, ByteOrder::Little) => {
                buf.extend_from_slice(&u32::try_from(len).map_err(|_| overflow())?.to_le_bytes())
            }
        }
        Ok(())
    }

    fn check_payload(&self, payload_len: usize) -> Result<(), FramingError> {
        if self.max_payload > 0 && payload_len > self.max_payload {
            return Err(FramingError::TooLarge {
                len: payload_len,
                max: self.max_payload,
            });
        }
        Ok(())
    }
}

impl Framing for LengthPrefixedFraming {
    fn decode(&self, buf: &[u8]) -> Result<Option<(Frame, usize)>, FramingError> {
        if buf.len() < self.length_bytes {
            return Ok(None);
        }

        let len = self.read_len(buf);
        if len < VERSION_BYTES {
            return Err(FramingError::MissingVersion(len));
        }
        self.check_payload(len - VERSION_BYTES)?;

        let total = self.length_bytes + len;
        if buf.len() < total {
            return Ok(None);
        }

        let body = &buf[self.length_bytes..total];
        let id = i32::from_be_bytes([body[0], body[1], body[2], body[3]]);
        let version = Version::from_id(id)?;
        tracing::trace!(%version, payload = len - VERSION_BYTES, "frame decoded");
        Ok(Some((
            Frame {
                version,
                payload: body[VERSION_BYTES..].to_vec(),
            },
            total,
        )))
    }

    fn encode(&self, frame: &Frame, buf: &mut Vec<u8>) -> Result<(), FramingError> {
        let id = frame.version.id()?;
        self.check_payload(frame.payload.len())?;
        self.write_len(VERSION_BYTES + frame.payload.len(), buf)?;
        buf.extend_from_slice(&id.to_be_bytes());
        buf.extend_from_slice(&frame.payload);
        Ok(())
    }
}

//! Version-gated binary record codec.
//!
//! - [`version`]: ordered protocol version tag and version ranges
//! - [`stream`]: primitive byte layout
//! - [`registry`]: per-record descriptor tables, resolved per version
//! - [`envelope`]: record encoder/decoder driven by the registry
//! - [`bridge`]: legacy split collections ↔ current tagged collection

pub mod bridge;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod stream;
pub mod version;

pub use bridge::{merge_for_current, split_for_legacy, Origin, Tagged};
pub use envelope::{required, Decoder, Encoder, Envelope};
pub use error::{CodecError, RegistryError, StreamError, VersionError};
pub use registry::{
    FieldDescriptor, FieldInfo, RecordSchema, Registry, RegistryBuilder, VersionedRecord,
};
pub use stream::{StreamInput, StreamOutput, WireValue};
pub use version::{Version, VersionRange};

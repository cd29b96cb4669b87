use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

use crate::envelope::{Decoder, Encoder};
use crate::error::{CodecError, RegistryError};
use crate::version::{Version, VersionRange};

pub type EncodeFn<T> = fn(&T, &mut Encoder<'_>) -> Result<(), CodecError>;
pub type DecodeFn<T> = fn(&mut T, &mut Decoder<'_, '_>) -> Result<(), CodecError>;

// ════════════════════════════════════════════════════════════════
//  Descriptors
// ════════════════════════════════════════════════════════════════

/// Version-scoped encode/decode rule for one named field of `T`.
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub range: VersionRange,
    pub encode: EncodeFn<T>,
    pub decode: DecodeFn<T>,
}

/// Name and version range of a descriptor, without its codec functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub range: VersionRange,
}

/// Ordered descriptor table of one record type.
///
/// Declaration order is wire order. A field whose shape changed is declared
/// once per shape, at the same position, with disjoint ranges.
pub struct RecordSchema<T> {
    record_type: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> RecordSchema<T> {
    pub fn new(record_type: &'static str) -> Self {
        Self {
            record_type,
            fields: Vec::new(),
        }
    }

    pub fn field(
        mut self,
        name: &'static str,
        range: VersionRange,
        encode: EncodeFn<T>,
        decode: DecodeFn<T>,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            range,
            encode,
            decode,
        });
        self
    }

    pub fn record_type(&self) -> &'static str {
        self.record_type
    }

    /// Active set for `version`, in wire order.
    pub fn resolve(&self, version: Version) -> impl Iterator<Item = &FieldDescriptor<T>> {
        self.fields.iter().filter(move |f| f.range.contains(version))
    }

    pub fn fields(&self) -> Vec<FieldInfo> {
        self.fields
            .iter()
            .map(|f| FieldInfo {
                name: f.name,
                range: f.range,
            })
            .collect()
    }

    fn validate(&self, known: &[Version]) -> Result<(), RegistryError> {
        let err = |field: &'static str, reason: String| RegistryError::UnknownFieldVersion {
            record: self.record_type,
            field,
            reason,
        };

        for (i, f) in self.fields.iter().enumerate() {
            if f.name.is_empty() {
                return Err(err(f.name, "descriptor has no name".into()));
            }
            if f.range.is_empty() {
                return Err(err(f.name, format!("empty version range {}", f.range)));
            }
            for bound in [f.range.min, f.range.max].into_iter().flatten() {
                if !known.contains(&bound) {
                    return Err(err(
                        f.name,
                        format!("range bound {bound} is not a known protocol version"),
                    ));
                }
            }
            if let Some(other) = self.fields[..i]
                .iter()
                .find(|o| o.name == f.name && o.range.overlaps(&f.range))
            {
                return Err(err(
                    f.name,
                    format!("ranges {} and {} overlap", other.range, f.range),
                ));
            }
        }
        Ok(())
    }
}

/// A record type that travels through the envelope.
///
/// `Default` supplies the documented value of every field that is absent at
/// the decoding version.
pub trait VersionedRecord: Default + Send + Sync + 'static {
    const RECORD_TYPE: &'static str;

    fn schema() -> RecordSchema<Self>;
}

// ════════════════════════════════════════════════════════════════
//  Registry
// ════════════════════════════════════════════════════════════════

/// Immutable table of every record schema known to the process.
///
/// Built once at startup; afterwards it is only read, so one instance can be
/// shared by reference (or `Arc`) across threads.
pub struct Registry {
    known: Vec<Version>,
    schemas: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    fields: BTreeMap<&'static str, Vec<FieldInfo>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("known", &self.known)
            .field("record_types", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn builder(known: impl IntoIterator<Item = Version>) -> RegistryBuilder {
        RegistryBuilder::new(known)
    }

    /// Protocol versions the registry was built against, ascending.
    pub fn known_versions(&self) -> &[Version] {
        &self.known
    }

    pub fn record_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// Active descriptors of `record_type` at `version`, in wire order.
    pub fn resolve(&self, record_type: &str, version: Version) -> Result<Vec<FieldInfo>, CodecError> {
        let fields = self
            .fields
            .get(record_type)
            .ok_or_else(|| CodecError::UnregisteredRecord(record_type.to_string()))?;
        Ok(fields
            .iter()
            .filter(|f| f.range.contains(version))
            .copied()
            .collect())
    }

    pub fn schema<T: VersionedRecord>(&self) -> Result<&RecordSchema<T>, CodecError> {
        self.schemas
            .get(&TypeId::of::<T>())
            .and_then(|s| s.downcast_ref::<RecordSchema<T>>())
            .ok_or_else(|| CodecError::UnregisteredRecord(T::RECORD_TYPE.to_string()))
    }
}

#[derive(Debug)]
pub struct RegistryBuilder {
    known: Vec<Version>,
    schemas: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    fields: BTreeMap<&'static str, Vec<FieldInfo>>,
}

impl RegistryBuilder {
    pub fn new(known: impl IntoIterator<Item = Version>) -> Self {
        let mut known: Vec<Version> = known.into_iter().collect();
        known.sort();
        known.dedup();
        Self {
            known,
            schemas: HashMap::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Validate and add the schema of `T`.
    pub fn register<T: VersionedRecord>(mut self) -> Result<Self, RegistryError> {
        if self.fields.contains_key(T::RECORD_TYPE) || self.schemas.contains_key(&TypeId::of::<T>()) {
            return Err(RegistryError::DuplicateRecordType(T::RECORD_TYPE));
        }
        let schema = T::schema();
        schema.validate(&self.known)?;

        tracing::debug!(
            record = T::RECORD_TYPE,
            fields = schema.fields.len(),
            "registered record schema"
        );
        self.fields.insert(T::RECORD_TYPE, schema.fields());
        self.schemas.insert(TypeId::of::<T>(), Box::new(schema));
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            known: self.known,
            schemas: self.schemas,
            fields: self.fields,
        }
    }
}

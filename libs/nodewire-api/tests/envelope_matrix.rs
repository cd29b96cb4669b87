use nodewire_api::{
    required, CodecError, Envelope, RecordSchema, Registry, RegistryError, Version, VersionRange,
    VersionedRecord,
};

const V1: Version = Version::new(1, 0, 0);
const V2: Version = Version::new(2, 0, 0);
const V3: Version = Version::new(3, 0, 0);
const V4: Version = Version::new(4, 0, 0);
const KNOWN: [Version; 4] = [V1, V2, V3, V4];

/// Fields change shape at three different versions:
/// `weight` appears at 2.0.0, `label` becomes optional at 3.0.0 (and
/// `Child::note` appears there), `tags` appears at 4.0.0.
#[derive(Debug, Clone, Default, PartialEq)]
struct Probe {
    id: i64,
    label: Option<String>,
    weight: Option<i64>,
    tags: Vec<String>,
    child: Option<Child>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Child {
    level: i32,
    note: Option<String>,
}

impl VersionedRecord for Probe {
    const RECORD_TYPE: &'static str = "probe";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "id",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i64(r.id);
                    Ok(())
                },
                |r, dec| {
                    r.id = dec.input.read_i64()?;
                    Ok(())
                },
            )
            .field(
                "label",
                VersionRange::until(V3),
                |r, enc| Ok(enc.out.write_string(required(r.label.as_ref())?)?),
                |r, dec| {
                    r.label = Some(dec.input.read_string()?);
                    Ok(())
                },
            )
            .field(
                "label",
                VersionRange::since(V3),
                |r, enc| Ok(enc.out.write_optional_string(r.label.as_deref())?),
                |r, dec| {
                    r.label = dec.input.read_optional_string()?;
                    Ok(())
                },
            )
            .field(
                "weight",
                VersionRange::since(V2),
                |r, enc| {
                    enc.out.write_optional_i64(r.weight);
                    Ok(())
                },
                |r, dec| {
                    r.weight = dec.input.read_optional_i64()?;
                    Ok(())
                },
            )
            .field(
                "tags",
                VersionRange::since(V4),
                |r, enc| Ok(enc.out.write_string_array(&r.tags)?),
                |r, dec| {
                    r.tags = dec.input.read_string_array()?;
                    Ok(())
                },
            )
            .field(
                "child",
                VersionRange::always(),
                |r, enc| enc.write_optional_record(r.child.as_ref()),
                |r, dec| {
                    r.child = dec.read_optional_record()?;
                    Ok(())
                },
            )
    }
}

impl VersionedRecord for Child {
    const RECORD_TYPE: &'static str = "child";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "level",
                VersionRange::always(),
                |r, enc| {
                    enc.out.write_i32(r.level);
                    Ok(())
                },
                |r, dec| {
                    r.level = dec.input.read_i32()?;
                    Ok(())
                },
            )
            .field(
                "note",
                VersionRange::since(V3),
                |r, enc| Ok(enc.out.write_optional_string(r.note.as_deref())?),
                |r, dec| {
                    r.note = dec.input.read_optional_string()?;
                    Ok(())
                },
            )
    }
}

fn registry() -> Registry {
    Registry::builder(KNOWN)
        .register::<Probe>()
        .and_then(|b| b.register::<Child>())
        .expect("probe schema is valid")
        .build()
}

fn sample() -> Probe {
    Probe {
        id: 42,
        label: Some("probe-a".into()),
        weight: Some(-7),
        tags: vec!["hot".into(), "ssd".into()],
        child: Some(Child {
            level: 3,
            note: Some("leaf".into()),
        }),
    }
}

/// `sample()` as a reader at `version` sees it.
fn restricted(version: Version) -> Probe {
    let mut p = sample();
    if version.before(V2) {
        p.weight = None;
    }
    if version.before(V4) {
        p.tags.clear();
    }
    if let Some(child) = p.child.as_mut() {
        if version.before(V3) {
            child.note = None;
        }
    }
    p
}

#[test]
fn active_sets_follow_independent_boundaries() {
    let registry = registry();
    let names = |v: Version| -> Vec<&'static str> {
        registry
            .resolve("probe", v)
            .unwrap()
            .iter()
            .map(|f| f.name)
            .collect()
    };
    assert_eq!(names(V1), ["id", "label", "child"]);
    assert_eq!(names(V2), ["id", "label", "weight", "child"]);
    assert_eq!(names(V3), ["id", "label", "weight", "child"]);
    assert_eq!(names(V4), ["id", "label", "weight", "tags", "child"]);

    // exactly one "label" shape is active at every version
    for v in KNOWN {
        let labels: Vec<_> = registry
            .resolve("probe", v)
            .unwrap()
            .into_iter()
            .filter(|f| f.name == "label")
            .collect();
        assert_eq!(labels.len(), 1, "at {v}");
    }

    // a version between known ones resolves by range
    assert_eq!(names(Version::new(3, 5, 1)), names(V3));
}

#[test]
fn round_trip_at_every_version() {
    let registry = registry();
    let envelope = Envelope::new(&registry);
    for v in KNOWN {
        let bytes = envelope.encode(&sample(), v).unwrap();
        let decoded: Probe = envelope.decode(&bytes, v).unwrap();
        assert_eq!(decoded, restricted(v), "at {v}");
    }
}

#[test]
fn older_version_never_emits_newer_fields() {
    let registry = registry();
    let envelope = Envelope::new(&registry);
    let bare = Probe {
        id: 1,
        label: Some(String::new()),
        ..Probe::default()
    };
    // id + label + child flag
    assert_eq!(envelope.encode(&bare, V1).unwrap().len(), 8 + 1 + 1);
    // + weight flag
    assert_eq!(envelope.encode(&bare, V2).unwrap().len(), 8 + 1 + 1 + 1);
    // label is now an optional string
    assert_eq!(envelope.encode(&bare, V3).unwrap().len(), 8 + 2 + 1 + 1);
    // + empty tags array
    assert_eq!(envelope.encode(&bare, V4).unwrap().len(), 8 + 2 + 1 + 1 + 1);
}

#[test]
fn every_truncation_point_is_reported() {
    let registry = registry();
    let envelope = Envelope::new(&registry);
    for v in KNOWN {
        let bytes = envelope.encode(&sample(), v).unwrap();
        for cut in 0..bytes.len() {
            let err = envelope.decode::<Probe>(&bytes[..cut], v).unwrap_err();
            assert!(
                matches!(err, CodecError::Truncated { record: "probe", .. }),
                "{v} cut at {cut}: {err}"
            );
        }
    }
}

#[test]
fn truncation_names_the_nested_field() {
    let registry = registry();
    let envelope = Envelope::new(&registry);
    let bytes = envelope.encode(&sample(), V4).unwrap();
    // the child's note is the very last value
    let err = envelope
        .decode::<Probe>(&bytes[..bytes.len() - 1], V4)
        .unwrap_err();
    match err {
        CodecError::Truncated { field, .. } => assert_eq!(field, "child.note"),
        other => panic!("unexpected {other}"),
    }
}

#[test]
fn legacy_label_is_required() {
    let registry = registry();
    let envelope = Envelope::new(&registry);
    let unlabeled = Probe {
        label: None,
        ..sample()
    };
    let err = envelope.encode(&unlabeled, V2).unwrap_err();
    assert!(matches!(
        err,
        CodecError::MissingField { record: "probe", ref field } if field == "label"
    ));

    // the current shape accepts an absent label
    let bytes = envelope.encode(&unlabeled, V3).unwrap();
    let decoded: Probe = envelope.decode(&bytes, V3).unwrap();
    assert_eq!(decoded.label, None);
}

#[test]
fn trailing_bytes_are_rejected() {
    let registry = registry();
    let envelope = Envelope::new(&registry);
    let mut bytes = envelope.encode(&sample(), V1).unwrap();
    bytes.push(0);
    let err = envelope.decode::<Probe>(&bytes, V1).unwrap_err();
    assert!(matches!(
        err,
        CodecError::TrailingBytes {
            record: "probe",
            remaining: 1
        }
    ));
}

#[test]
fn unregistered_record_is_an_error() {
    let registry = Registry::builder(KNOWN)
        .register::<Probe>()
        .unwrap()
        .build();
    let envelope = Envelope::new(&registry);
    // Probe is registered but its nested Child is not
    let err = envelope.encode(&sample(), V1).unwrap_err();
    assert!(matches!(err, CodecError::UnregisteredRecord(ref t) if t == "child"));
    assert!(registry.resolve("missing", V1).is_err());
}

#[test]
fn registry_is_shared_across_threads() {
    let registry = registry();
    std::thread::scope(|scope| {
        for v in KNOWN {
            let registry = &registry;
            scope.spawn(move || {
                let envelope = Envelope::new(registry);
                for _ in 0..64 {
                    let bytes = envelope.encode(&sample(), v).unwrap();
                    assert_eq!(envelope.decode::<Probe>(&bytes, v).unwrap(), restricted(v));
                }
            });
        }
    });
}

// ---- registry build-time validation ----

macro_rules! bad_schema {
    ($name:ident, $range_a:expr, $range_b:expr) => {
        #[derive(Default)]
        struct $name;

        impl VersionedRecord for $name {
            const RECORD_TYPE: &'static str = stringify!($name);

            fn schema() -> RecordSchema<Self> {
                RecordSchema::<Self>::new(Self::RECORD_TYPE)
                    .field("x", $range_a, |_, _| Ok(()), |_, _| Ok(()))
                    .field("x", $range_b, |_, _| Ok(()), |_, _| Ok(()))
            }
        }
    };
}

bad_schema!(Overlapping, VersionRange::until(V3), VersionRange::since(V2));
bad_schema!(UnknownBound, VersionRange::until(Version::new(2, 5, 0)), VersionRange::since(Version::new(2, 5, 0)));
bad_schema!(EmptyRange, VersionRange::between(V3, V3), VersionRange::since(V4));
bad_schema!(Disjoint, VersionRange::until(V2), VersionRange::since(V2));

#[test]
fn protocol_definition_bugs_fail_at_build_time() {
    let overlapping = Registry::builder(KNOWN).register::<Overlapping>().unwrap_err();
    assert!(matches!(
        overlapping,
        RegistryError::UnknownFieldVersion { record: "Overlapping", field: "x", .. }
    ));

    let unknown = Registry::builder(KNOWN).register::<UnknownBound>().unwrap_err();
    assert!(unknown.to_string().contains("2.5.0 is not a known protocol version"));

    let empty = Registry::builder(KNOWN).register::<EmptyRange>().unwrap_err();
    assert!(empty.to_string().contains("empty version range"));

    assert!(Registry::builder(KNOWN).register::<Disjoint>().is_ok());
}

#[test]
fn duplicate_registration_is_rejected() {
    let err = Registry::builder(KNOWN)
        .register::<Child>()
        .unwrap()
        .register::<Child>()
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateRecordType("child"));
}

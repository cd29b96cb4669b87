use nodewire_api::Version;
use nodewire_framing::{Frame, Framing, FramingConfig, LengthPrefixedFraming};
use proptest::prelude::*;

#[test]
fn config_from_toml_section() {
    let cfg: FramingConfig = toml::from_str(
        r#"
        length_bytes = 2
        byte_order = "le"
        "#,
    )
    .unwrap();
    assert_eq!(cfg.length_bytes, 2);
    assert_eq!(cfg.max_payload, 0);
    assert!(LengthPrefixedFraming::from_config(&cfg).is_ok());

    let empty: FramingConfig = toml::from_str("").unwrap();
    assert_eq!(empty, FramingConfig::default());
}

#[test]
fn back_to_back_frames_split_cleanly() {
    let framing = LengthPrefixedFraming::default();
    let frames = [
        Frame {
            version: Version::new(2, 1, 1),
            payload: b"legacy".to_vec(),
        },
        Frame {
            version: Version::new(5, 5, 0),
            payload: Vec::new(),
        },
        Frame {
            version: Version::new(2, 2, 0),
            payload: vec![7; 300],
        },
    ];

    let mut buf = Vec::new();
    for f in &frames {
        framing.encode(f, &mut buf).unwrap();
    }

    let mut decoded = Vec::new();
    let mut offset = 0;
    while let Some((frame, used)) = framing.decode(&buf[offset..]).unwrap() {
        decoded.push(frame);
        offset += used;
    }
    assert_eq!(offset, buf.len());
    assert_eq!(decoded, frames);
}

fn version() -> impl Strategy<Value = Version> {
    (0u8..=99, 0u8..=99, 0u8..=99).prop_map(|(a, b, c)| Version::new(a, b, c))
}

proptest! {
    #[test]
    fn frames_survive_every_header_shape(
        width in prop::sample::select(vec![1usize, 2, 4]),
        order in prop::sample::select(vec!["big", "little"]),
        version in version(),
        payload in prop::collection::vec(any::<u8>(), 0..200),
    ) {
        let framing = LengthPrefixedFraming::from_config(&FramingConfig {
            length_bytes: width,
            byte_order: order.to_string(),
            max_payload: 0,
        }).unwrap();
        let frame = Frame { version, payload };

        let mut buf = Vec::new();
        framing.encode(&frame, &mut buf).unwrap();
        let (back, used) = framing.decode(&buf).unwrap().unwrap();
        prop_assert_eq!(used, buf.len());
        prop_assert_eq!(back, frame);
    }
}

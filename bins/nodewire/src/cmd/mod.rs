pub mod compat;
pub mod decode;
pub mod encode;
pub mod inspect;

use nodewire_api::{Envelope, Registry, Version};
use nodewire_framing::{Frame, Framing, LengthPrefixedFraming};
use nodewire_node::NodeInfo;

use crate::config::NodewireConfig;
use crate::error::CliError;

pub(crate) fn read_node_info(path: &str) -> Result<NodeInfo, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Framing from the config, or `None` when envelopes go out bare.
pub(crate) fn framing(cfg: &NodewireConfig) -> Result<Option<LengthPrefixedFraming>, CliError> {
    if !cfg.framed {
        return Ok(None);
    }
    Ok(Some(LengthPrefixedFraming::from_config(&cfg.framing)?))
}

pub(crate) fn encode_bytes(
    registry: &Registry,
    info: &NodeInfo,
    version: Version,
    framing: Option<&LengthPrefixedFraming>,
) -> Result<Vec<u8>, CliError> {
    let payload = Envelope::new(registry).encode(info, version)?;
    let Some(framing) = framing else {
        return Ok(payload);
    };
    let mut buf = Vec::with_capacity(payload.len() + 8);
    framing.encode(&Frame { version, payload }, &mut buf)?;
    Ok(buf)
}

/// Decode one NodeInfo. A frame's version wins over `version`.
pub(crate) fn decode_bytes(
    registry: &Registry,
    bytes: &[u8],
    version: Version,
    framing: Option<&LengthPrefixedFraming>,
) -> Result<(NodeInfo, Version), CliError> {
    let envelope = Envelope::new(registry);
    let Some(framing) = framing else {
        return Ok((envelope.decode(bytes, version)?, version));
    };
    let (frame, used) = framing
        .decode(bytes)?
        .ok_or(CliError::IncompleteFrame(bytes.len()))?;
    if used != bytes.len() {
        tracing::warn!(used, total = bytes.len(), "ignoring bytes after the first frame");
    }
    if frame.version != version {
        tracing::debug!(declared = %version, framed = %frame.version, "using frame version");
    }
    Ok((envelope.decode(&frame.payload, frame.version)?, frame.version))
}

#[cfg(test)]
mod tests {
    use nodewire_node::versions::V_2_1_1;
    use nodewire_node::{Build, DiscoveryNode, TransportAddress, CURRENT};

    use super::*;

    fn sample() -> NodeInfo {
        NodeInfo::new(
            DiscoveryNode::new("cli", "cli-1", TransportAddress::Dummy, CURRENT),
            CURRENT,
            Build::new("abc1234", "2017-07-01", false),
        )
    }

    #[test]
    fn framed_round_trip_uses_frame_version() {
        let registry = nodewire_node::registry().unwrap();
        let framing = LengthPrefixedFraming::default();
        let bytes = encode_bytes(&registry, &sample(), V_2_1_1, Some(&framing)).unwrap();

        // the declared version is ignored in favour of the frame's
        let (info, version) = decode_bytes(&registry, &bytes, CURRENT, Some(&framing)).unwrap();
        assert_eq!(version, V_2_1_1);
        assert_eq!(info, sample());
    }

    #[test]
    fn short_frame_is_incomplete() {
        let registry = nodewire_node::registry().unwrap();
        let framing = LengthPrefixedFraming::default();
        let bytes = encode_bytes(&registry, &sample(), CURRENT, Some(&framing)).unwrap();
        let err = decode_bytes(&registry, &bytes[..bytes.len() - 1], CURRENT, Some(&framing)).unwrap_err();
        assert!(matches!(err, CliError::IncompleteFrame(_)));
    }

    #[test]
    fn example_document_encodes_everywhere() {
        let info: NodeInfo = serde_json::from_str(include_str!("../../node_info.example.json")).unwrap();
        assert_eq!(info.plugins.as_ref().map(|p| p.len()), Some(2));

        let registry = nodewire_node::registry().unwrap();
        for version in nodewire_node::KNOWN_VERSIONS {
            let bytes = encode_bytes(&registry, &info, version, None).unwrap();
            assert!(decode_bytes(&registry, &bytes, version, None).is_ok());
        }
    }

    #[test]
    fn bare_round_trip() {
        let registry = nodewire_node::registry().unwrap();
        let bytes = encode_bytes(&registry, &sample(), CURRENT, None).unwrap();
        let (info, _) = decode_bytes(&registry, &bytes, CURRENT, None).unwrap();
        assert_eq!(info, sample());
    }
}

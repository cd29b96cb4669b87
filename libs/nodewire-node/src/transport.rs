//! Network addresses and the transport / HTTP endpoint descriptions.

use std::collections::BTreeMap;

use nodewire_api::{StreamError, StreamInput, StreamOutput, WireValue};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════
//  TransportAddress
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportAddress {
    /// Placeholder used before a node is bound.
    #[default]
    Dummy,
    Inet { host: String, port: i32 },
    Local { id: String },
}

impl TransportAddress {
    fn type_id(&self) -> i16 {
        match self {
            TransportAddress::Dummy => 0,
            TransportAddress::Inet { .. } => 1,
            TransportAddress::Local { .. } => 2,
        }
    }
}

impl WireValue for TransportAddress {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_i16(self.type_id());
        match self {
            TransportAddress::Dummy => Ok(()),
            TransportAddress::Inet { host, port } => {
                out.write_string(host)?;
                out.write_i32(*port);
                Ok(())
            }
            TransportAddress::Local { id } => out.write_string(id),
        }
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        match input.read_i16()? {
            0 => Ok(TransportAddress::Dummy),
            1 => Ok(TransportAddress::Inet {
                host: input.read_string()?,
                port: input.read_i32()?,
            }),
            2 => Ok(TransportAddress::Local {
                id: input.read_string()?,
            }),
            other => Err(StreamError::Malformed(format!(
                "transport address type {other}"
            ))),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  BoundTransportAddress
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundTransportAddress {
    pub bound_addresses: Vec<TransportAddress>,
    pub publish_address: TransportAddress,
}

impl BoundTransportAddress {
    /// Bound to and publishing a single address.
    pub fn single(address: TransportAddress) -> Self {
        Self {
            bound_addresses: vec![address.clone()],
            publish_address: address,
        }
    }
}

impl WireValue for BoundTransportAddress {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_values(&self.bound_addresses)?;
        self.publish_address.write_to(out)
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            bound_addresses: input.read_values()?,
            publish_address: input.read_value()?,
        })
    }
}

// ════════════════════════════════════════════════════════════════
//  TransportInfo / HttpInfo
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportInfo {
    pub address: BoundTransportAddress,
    #[serde(default)]
    pub profile_addresses: BTreeMap<String, BoundTransportAddress>,
}

impl WireValue for TransportInfo {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        self.address.write_to(out)?;
        out.write_len(self.profile_addresses.len())?;
        for (profile, address) in &self.profile_addresses {
            out.write_string(profile)?;
            address.write_to(out)?;
        }
        Ok(())
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        let address = input.read_value()?;
        let len = input.read_len()?;
        let mut profile_addresses = BTreeMap::new();
        for _ in 0..len {
            let profile = input.read_map_key(&profile_addresses)?;
            profile_addresses.insert(profile, input.read_value()?);
        }
        Ok(Self {
            address,
            profile_addresses,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpInfo {
    pub address: BoundTransportAddress,
    pub max_content_length: i64,
}

impl WireValue for HttpInfo {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        self.address.write_to(out)?;
        out.write_i64(self.max_content_length);
        Ok(())
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            address: input.read_value()?,
            max_content_length: input.read_i64()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<V: WireValue>(value: &V) -> V {
        let mut out = StreamOutput::new();
        value.write_to(&mut out).unwrap();
        let bytes = out.into_bytes();
        let mut input = StreamInput::new(&bytes);
        let back = V::read_from(&mut input).unwrap();
        assert!(input.is_empty());
        back
    }

    #[test]
    fn every_address_kind_survives() {
        for address in [
            TransportAddress::Dummy,
            TransportAddress::Inet {
                host: "10.0.0.7".into(),
                port: 9300,
            },
            TransportAddress::Local { id: "local[1]".into() },
        ] {
            assert_eq!(round_trip(&address), address);
        }
    }

    #[test]
    fn unknown_address_type_is_malformed() {
        let bytes = 7i16.to_be_bytes();
        let err = TransportAddress::read_from(&mut StreamInput::new(&bytes)).unwrap_err();
        assert_eq!(err, StreamError::Malformed("transport address type 7".into()));
    }

    #[test]
    fn profiles_keep_their_addresses() {
        let info = TransportInfo {
            address: BoundTransportAddress::single(TransportAddress::Dummy),
            profile_addresses: BTreeMap::from([
                (
                    "client".to_string(),
                    BoundTransportAddress::single(TransportAddress::Inet {
                        host: "127.0.0.1".into(),
                        port: 9301,
                    }),
                ),
                (
                    "default".to_string(),
                    BoundTransportAddress::single(TransportAddress::Dummy),
                ),
            ]),
        };
        assert_eq!(round_trip(&info), info);
    }

    #[test]
    fn repeated_profile_is_malformed() {
        let mut out = StreamOutput::new();
        BoundTransportAddress::single(TransportAddress::Dummy).write_to(&mut out).unwrap();
        out.write_len(2).unwrap();
        for _ in 0..2 {
            out.write_string("client").unwrap();
            BoundTransportAddress::single(TransportAddress::Dummy).write_to(&mut out).unwrap();
        }
        let bytes = out.into_bytes();
        let err = TransportInfo::read_from(&mut StreamInput::new(&bytes)).unwrap_err();
        assert_eq!(err, StreamError::Malformed("map: duplicate key 'client'".into()));
    }

    #[test]
    fn address_json_is_tagged() {
        let json = serde_json::to_value(TransportAddress::Inet {
            host: "h".into(),
            port: 1,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "inet", "host": "h", "port": 1}));
    }
}

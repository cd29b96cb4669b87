use std::collections::BTreeMap;

use nodewire_api::{StreamError, StreamInput, StreamOutput, Version, WireValue};
use serde::{Deserialize, Serialize};

use crate::transport::TransportAddress;
use crate::versions::CURRENT;

/// Identity of a cluster member as the rest of the cluster sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryNode {
    pub name: String,
    pub id: String,
    pub host_name: String,
    pub host_address: String,
    pub address: TransportAddress,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub version: Version,
}

impl DiscoveryNode {
    /// Node whose host name and address are taken from `address`.
    pub fn new(name: impl Into<String>, id: impl Into<String>, address: TransportAddress, version: Version) -> Self {
        let (host_name, host_address) = match &address {
            TransportAddress::Inet { host, .. } => (host.clone(), host.clone()),
            TransportAddress::Local { id } => (id.clone(), id.clone()),
            TransportAddress::Dummy => ("0.0.0.0".to_string(), "0.0.0.0".to_string()),
        };
        Self {
            name: name.into(),
            id: id.into(),
            host_name,
            host_address,
            address,
            attributes: BTreeMap::new(),
            version,
        }
    }
}

impl Default for DiscoveryNode {
    fn default() -> Self {
        Self::new("", "", TransportAddress::Dummy, CURRENT)
    }
}

impl WireValue for DiscoveryNode {
    fn write_to(&self, out: &mut StreamOutput) -> Result<(), StreamError> {
        out.write_string(&self.name)?;
        out.write_string(&self.id)?;
        out.write_string(&self.host_name)?;
        out.write_string(&self.host_address)?;
        self.address.write_to(out)?;
        out.write_string_map(&self.attributes)?;
        out.write_version(self.version)
    }

    fn read_from(input: &mut StreamInput<'_>) -> Result<Self, StreamError> {
        Ok(Self {
            name: input.read_string()?,
            id: input.read_string()?,
            host_name: input.read_string()?,
            host_address: input.read_string()?,
            address: input.read_value()?,
            attributes: input.read_string_map()?,
            version: input.read_version()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::V_2_1_0;

    #[test]
    fn host_fields_follow_the_address() {
        let node = DiscoveryNode::new(
            "test_node",
            "n1",
            TransportAddress::Inet {
                host: "10.1.2.3".into(),
                port: 9300,
            },
            V_2_1_0,
        );
        assert_eq!(node.host_name, "10.1.2.3");
        assert_eq!(node.host_address, "10.1.2.3");
    }

    #[test]
    fn node_survives_the_stream() {
        let mut node = DiscoveryNode::new("test_node", "n1", TransportAddress::Dummy, V_2_1_0);
        node.attributes.insert("rack".into(), "r1".into());

        let mut out = StreamOutput::new();
        node.write_to(&mut out).unwrap();
        let bytes = out.into_bytes();
        let back = DiscoveryNode::read_from(&mut StreamInput::new(&bytes)).unwrap();
        assert_eq!(back, node);
    }
}

use std::collections::BTreeMap;

use nodewire_api::{required, RecordSchema, Version, VersionRange, VersionedRecord};
use serde::{Deserialize, Serialize};

use crate::build::Build;
use crate::discovery::DiscoveryNode;
use crate::monitor::{JvmInfo, ProcessInfo};
use crate::os::OsInfo;
use crate::plugins::PluginsAndModules;
use crate::settings::Settings;
use crate::thread_pool::ThreadPoolInfo;
use crate::transport::{HttpInfo, TransportInfo};
use crate::versions::V_5_0_0;

/// Everything one node reports about itself.
///
/// `node`, `version` and `build` are required on the wire; the remaining
/// sections are optional and `Default` leaves them absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<DiscoveryNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub service_attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<OsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<ProcessInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jvm: Option<JvmInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_pool: Option<ThreadPoolInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginsAndModules>,
    /// Not streamed before 5.0.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_indexing_buffer: Option<i64>,
}

impl NodeInfo {
    /// Required sections only.
    pub fn new(node: DiscoveryNode, version: Version, build: Build) -> Self {
        Self {
            node: Some(node),
            version: Some(version),
            build: Some(build),
            ..Self::default()
        }
    }

    pub fn host_name(&self) -> Option<&str> {
        self.node.as_ref().map(|n| n.host_name.as_str())
    }
}

impl VersionedRecord for NodeInfo {
    const RECORD_TYPE: &'static str = "node_info";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "node",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_value(required(r.node.as_ref())?)?),
                |r, dec| {
                    r.node = Some(dec.input.read_value()?);
                    Ok(())
                },
            )
            .field(
                "version",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_version(*required(r.version.as_ref())?)?),
                |r, dec| {
                    r.version = Some(dec.input.read_version()?);
                    Ok(())
                },
            )
            .field(
                "build",
                VersionRange::always(),
                |r, enc| enc.write_record(required(r.build.as_ref())?),
                |r, dec| {
                    r.build = Some(dec.read_record()?);
                    Ok(())
                },
            )
            .field(
                "service_attributes",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_string_map(&r.service_attributes)?),
                |r, dec| {
                    r.service_attributes = dec.input.read_string_map()?;
                    Ok(())
                },
            )
            .field(
                "settings",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_optional_value(r.settings.as_ref())?),
                |r, dec| {
                    r.settings = dec.input.read_optional_value()?;
                    Ok(())
                },
            )
            .field(
                "os",
                VersionRange::always(),
                |r, enc| enc.write_optional_record(r.os.as_ref()),
                |r, dec| {
                    r.os = dec.read_optional_record()?;
                    Ok(())
                },
            )
            .field(
                "process",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_optional_value(r.process.as_ref())?),
                |r, dec| {
                    r.process = dec.input.read_optional_value()?;
                    Ok(())
                },
            )
            .field(
                "jvm",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_optional_value(r.jvm.as_ref())?),
                |r, dec| {
                    r.jvm = dec.input.read_optional_value()?;
                    Ok(())
                },
            )
            .field(
                "thread_pool",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_optional_value(r.thread_pool.as_ref())?),
                |r, dec| {
                    r.thread_pool = dec.input.read_optional_value()?;
                    Ok(())
                },
            )
            .field(
                "transport",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_optional_value(r.transport.as_ref())?),
                |r, dec| {
                    r.transport = dec.input.read_optional_value()?;
                    Ok(())
                },
            )
            .field(
                "http",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_optional_value(r.http.as_ref())?),
                |r, dec| {
                    r.http = dec.input.read_optional_value()?;
                    Ok(())
                },
            )
            .field(
                "plugins",
                VersionRange::always(),
                |r, enc| enc.write_optional_record(r.plugins.as_ref()),
                |r, dec| {
                    r.plugins = dec.read_optional_record()?;
                    Ok(())
                },
            )
            .field(
                "total_indexing_buffer",
                VersionRange::since(V_5_0_0),
                |r, enc| {
                    enc.out.write_optional_i64(r.total_indexing_buffer);
                    Ok(())
                },
                |r, dec| {
                    r.total_indexing_buffer = dec.input.read_optional_i64()?;
                    Ok(())
                },
            )
    }
}

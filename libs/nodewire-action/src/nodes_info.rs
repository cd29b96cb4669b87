//! `cluster:monitor/nodes/info`: ask nodes to describe themselves.

use nodewire_api::{RecordSchema, VersionRange, VersionedRecord};
use nodewire_node::NodeInfo;
use serde::{Deserialize, Serialize};

use crate::action::ClusterAction;

pub struct NodesInfoAction;

impl ClusterAction for NodesInfoAction {
    const NAME: &'static str = "cluster:monitor/nodes/info";
    type Request = NodesInfoRequest;
    type Response = NodesInfoResponse;
}

// ════════════════════════════════════════════════════════════════
//  Request
// ════════════════════════════════════════════════════════════════

/// Which nodes to ask and which optional sections they should report.
/// Every section is requested by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesInfoRequest {
    /// Empty means all nodes.
    pub node_ids: Vec<String>,
    pub settings: bool,
    pub os: bool,
    pub process: bool,
    pub jvm: bool,
    pub thread_pool: bool,
    pub transport: bool,
    pub http: bool,
    pub plugins: bool,
}

impl Default for NodesInfoRequest {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl NodesInfoRequest {
    pub fn new(node_ids: Vec<String>) -> Self {
        Self {
            node_ids,
            settings: true,
            os: true,
            process: true,
            jvm: true,
            thread_pool: true,
            transport: true,
            http: true,
            plugins: true,
        }
    }

    /// Request no optional section.
    pub fn clear(mut self) -> Self {
        self.set_metrics([false; 8]);
        self
    }

    fn metrics(&self) -> [bool; 8] {
        [
            self.settings,
            self.os,
            self.process,
            self.jvm,
            self.thread_pool,
            self.transport,
            self.http,
            self.plugins,
        ]
    }

    fn set_metrics(&mut self, m: [bool; 8]) {
        [
            self.settings,
            self.os,
            self.process,
            self.jvm,
            self.thread_pool,
            self.transport,
            self.http,
            self.plugins,
        ] = m;
    }

    /// `info` with the sections this request did not ask for removed.
    pub fn filter(&self, info: &NodeInfo) -> NodeInfo {
        let mut out = info.clone();
        if !self.settings {
            out.settings = None;
        }
        if !self.os {
            out.os = None;
        }
        if !self.process {
            out.process = None;
        }
        if !self.jvm {
            out.jvm = None;
        }
        if !self.thread_pool {
            out.thread_pool = None;
        }
        if !self.transport {
            out.transport = None;
        }
        if !self.http {
            out.http = None;
        }
        if !self.plugins {
            out.plugins = None;
        }
        out
    }
}

impl VersionedRecord for NodesInfoRequest {
    const RECORD_TYPE: &'static str = "nodes_info_request";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "node_ids",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_string_array(&r.node_ids)?),
                |r, dec| {
                    r.node_ids = dec.input.read_string_array()?;
                    Ok(())
                },
            )
            .field(
                "metrics",
                VersionRange::always(),
                |r, enc| {
                    for flag in r.metrics() {
                        enc.out.write_bool(flag);
                    }
                    Ok(())
                },
                |r, dec| {
                    let mut m = [false; 8];
                    for flag in &mut m {
                        *flag = dec.input.read_bool()?;
                    }
                    r.set_metrics(m);
                    Ok(())
                },
            )
    }
}

// ════════════════════════════════════════════════════════════════
//  Response
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesInfoResponse {
    pub cluster_name: String,
    pub nodes: Vec<NodeInfo>,
}

impl VersionedRecord for NodesInfoResponse {
    const RECORD_TYPE: &'static str = "nodes_info_response";

    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new(Self::RECORD_TYPE)
            .field(
                "cluster_name",
                VersionRange::always(),
                |r, enc| Ok(enc.out.write_string(&r.cluster_name)?),
                |r, dec| {
                    r.cluster_name = dec.input.read_string()?;
                    Ok(())
                },
            )
            .field(
                "nodes",
                VersionRange::always(),
                |r, enc| enc.write_records(&r.nodes),
                |r, dec| {
                    r.nodes = dec.read_records()?;
                    Ok(())
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use nodewire_node::{Build, DiscoveryNode, OsInfo, Settings, TransportAddress, CURRENT};

    use super::*;

    #[test]
    fn cleared_request_strips_optional_sections() {
        let mut info = NodeInfo::new(
            DiscoveryNode::new("n", "n1", TransportAddress::Dummy, CURRENT),
            CURRENT,
            Build::new("abc", "today", false),
        );
        info.os = Some(OsInfo::default());
        info.settings = Some(Settings::builder().put("a", "b").build());

        let mut request = NodesInfoRequest::default().clear();
        request.os = true;
        let filtered = request.filter(&info);
        assert!(filtered.os.is_some());
        assert!(filtered.settings.is_none());
        assert_eq!(filtered.build, info.build);
    }

    #[test]
    fn default_request_asks_for_everything() {
        assert!(NodesInfoRequest::default().metrics().iter().all(|m| *m));
        assert!(NodesInfoRequest::default().clear().metrics().iter().all(|m| !*m));
    }
}

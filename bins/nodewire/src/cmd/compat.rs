use nodewire_api::{Envelope, Registry, Version};
use nodewire_node::render::{changed_keys, dropped_keys, render_json};
use nodewire_node::{NodeInfo, KNOWN_VERSIONS};

use crate::config::{CompatArgs, NodewireConfig};
use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompatRow {
    pub version: Version,
    pub bytes: usize,
    pub dropped: Vec<String>,
    pub changed: Vec<String>,
}

pub fn run(args: CompatArgs, _cfg: &NodewireConfig) -> Result<(), CliError> {
    let (registry, _) = nodewire_action::catalog()?;
    let info = super::read_node_info(&args.input)?;
    let rows = report(&registry, &info)?;

    println!("{:<8}  {:>6}  {:<32}  changed", "version", "bytes", "dropped");
    for row in &rows {
        println!(
            "{:<8}  {:>6}  {:<32}  {}",
            row.version.to_string(),
            row.bytes,
            list(&row.dropped),
            list(&row.changed)
        );
    }
    tracing::info!(
        versions = rows.len(),
        lossless = rows.iter().filter(|r| r.dropped.is_empty() && r.changed.is_empty()).count(),
        "compat report"
    );
    Ok(())
}

/// Encode and decode `info` at every known version and diff the JSON
/// renderings against the original.
pub(crate) fn report(registry: &Registry, info: &NodeInfo) -> Result<Vec<CompatRow>, CliError> {
    let envelope = Envelope::new(registry);
    let original = render_json(info)?;
    KNOWN_VERSIONS
        .into_iter()
        .map(|version| -> Result<CompatRow, CliError> {
            let bytes = envelope.encode(info, version)?;
            let decoded: NodeInfo = envelope.decode(&bytes, version)?;
            let rendered = render_json(&decoded)?;
            Ok(CompatRow {
                version,
                bytes: bytes.len(),
                dropped: dropped_keys(&original, &rendered),
                changed: changed_keys(&original, &rendered),
            })
        })
        .collect()
}

fn list(keys: &[String]) -> String {
    if keys.is_empty() {
        "-".to_string()
    } else {
        keys.join(",")
    }
}

#[cfg(test)]
mod tests {
    use nodewire_node::versions::{V_2_1_1, V_5_0_0};
    use nodewire_node::{Build, DiscoveryNode, OsInfo, TransportAddress, CURRENT};

    use super::*;

    #[test]
    fn report_shows_where_sections_thin_out() {
        let registry = nodewire_node::registry().unwrap();
        let mut info = NodeInfo::new(
            DiscoveryNode::new("n", "n1", TransportAddress::Dummy, CURRENT),
            CURRENT,
            Build::new("abc", "today", false),
        );
        info.os = Some(OsInfo {
            name: Some("Linux".into()),
            ..OsInfo::default()
        });
        info.total_indexing_buffer = Some(1024);

        let rows = report(&registry, &info).unwrap();
        assert_eq!(rows.len(), KNOWN_VERSIONS.len());

        let legacy = rows.iter().find(|r| r.version == V_2_1_1).unwrap();
        assert_eq!(legacy.dropped, ["total_indexing_buffer"]);
        assert_eq!(legacy.changed, ["os"]);

        let modern = rows.iter().find(|r| r.version == V_5_0_0).unwrap();
        assert!(modern.dropped.is_empty() && modern.changed.is_empty());
        assert!(modern.bytes > legacy.bytes);
    }
}

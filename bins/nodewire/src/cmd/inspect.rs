use nodewire_api::Registry;

use crate::config::{InspectArgs, NodewireConfig};
use crate::error::CliError;

pub fn run(args: InspectArgs, cfg: &NodewireConfig) -> Result<(), CliError> {
    let (registry, actions) = nodewire_action::catalog()?;
    let version = args.version.unwrap_or(cfg.default_version);

    match &args.record {
        Some(record) => print!("{}", describe(&registry, record, version)?),
        None => {
            for record in registry.record_types() {
                print!("{}", describe(&registry, record, version)?);
            }
            for name in actions.names() {
                let info = actions.get(name)?;
                println!("action {name}: {} -> {}", info.request_type, info.response_type);
            }
        }
    }
    Ok(())
}

/// Active fields of `record` at `version`, one per line, in wire order.
pub(crate) fn describe(registry: &Registry, record: &str, version: nodewire_api::Version) -> Result<String, CliError> {
    let fields = registry.resolve(record, version)?;
    let width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut out = format!("{record} @ {version}\n");
    for field in fields {
        out.push_str(&format!("  {:<width$}  {}\n", field.name, field.range));
    }
    Ok(out)
}

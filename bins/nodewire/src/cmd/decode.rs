use base64::Engine;

use crate::config::{DecodeArgs, NodewireConfig, OutputFormat};
use crate::error::CliError;

pub fn run(args: DecodeArgs, cfg: &NodewireConfig) -> Result<(), CliError> {
    let (registry, _) = nodewire_action::catalog()?;
    let content = std::fs::read(&args.input).map_err(|e| CliError::io(&args.input, e))?;
    let bytes = match args.format.unwrap_or(cfg.output) {
        OutputFormat::Raw => content,
        OutputFormat::Base64 => base64::engine::general_purpose::STANDARD.decode(content.trim_ascii())?,
    };

    let declared = args.version.unwrap_or(cfg.default_version);
    let framing = super::framing(cfg)?;
    let (info, version) = super::decode_bytes(&registry, &bytes, declared, framing.as_ref())?;
    tracing::info!(input = %args.input, %version, bytes = bytes.len(), "decoded node info");

    println!("{}", nodewire_node::render::render_pretty(&info)?);
    Ok(())
}

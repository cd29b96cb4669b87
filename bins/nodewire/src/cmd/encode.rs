use std::io::Write;

use base64::Engine;

use crate::config::{EncodeArgs, NodewireConfig, OutputFormat};
use crate::error::CliError;

pub fn run(args: EncodeArgs, cfg: &NodewireConfig) -> Result<(), CliError> {
    let (registry, _) = nodewire_action::catalog()?;
    let info = super::read_node_info(&args.input)?;
    let version = args.version.unwrap_or(cfg.default_version);
    let framing = super::framing(cfg)?;

    let bytes = super::encode_bytes(&registry, &info, version, framing.as_ref())?;
    tracing::info!(
        input = %args.input,
        %version,
        framed = framing.is_some(),
        bytes = bytes.len(),
        "encoded node info"
    );

    let rendered = match args.format.unwrap_or(cfg.output) {
        OutputFormat::Raw => bytes,
        OutputFormat::Base64 => {
            let mut text = base64::engine::general_purpose::STANDARD.encode(&bytes);
            text.push('\n');
            text.into_bytes()
        }
    };

    match args.output {
        Some(path) => std::fs::write(&path, &rendered).map_err(|e| CliError::io(&path, e)),
        None => std::io::stdout()
            .write_all(&rendered)
            .map_err(|e| CliError::io("<stdout>", e)),
    }
}

use std::path::Path;

use clap::{Args, Parser, Subcommand, ValueEnum};
use nodewire_api::Version;
use nodewire_framing::FramingConfig;
use serde::Deserialize;

use crate::error::CliError;

/// Used when neither `--config` nor `NODEWIRE_CONFIG` is given.
const DEFAULT_CONFIG: &str = "nodewire.toml";

#[derive(Parser)]
#[command(name = "nodewire", about = "Version-gated node information codec")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, env = "NODEWIRE_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a NodeInfo JSON document
    Encode(EncodeArgs),
    /// Decode an envelope and print it as JSON
    Decode(DecodeArgs),
    /// Show the fields active at a version
    Inspect(InspectArgs),
    /// Encode a NodeInfo at every known version and report what survives
    Compat(CompatArgs),
}

#[derive(Args, Clone, Debug)]
pub struct EncodeArgs {
    /// NodeInfo JSON file
    #[arg(long)]
    pub input: String,

    /// Target protocol version (default: config `default_version`)
    #[arg(long)]
    pub version: Option<Version>,

    /// Write here instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Envelope file, raw or base64
    #[arg(long)]
    pub input: String,

    /// Declared protocol version; a frame overrides it
    #[arg(long)]
    pub version: Option<Version>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Record type, e.g. `node_info`; all records when omitted
    #[arg(long)]
    pub record: Option<String>,

    #[arg(long)]
    pub version: Option<Version>,
}

#[derive(Args, Clone, Debug)]
pub struct CompatArgs {
    /// NodeInfo JSON file
    #[arg(long)]
    pub input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Base64,
    Raw,
}

// ---- TOML Config ----

#[derive(Debug, Deserialize)]
pub struct NodewireConfig {
    #[serde(default = "default_version")]
    pub default_version: Version,
    #[serde(default = "default_output")]
    pub output: OutputFormat,
    /// Wrap envelopes in a length-prefixed frame carrying the version.
    #[serde(default)]
    pub framed: bool,
    #[serde(default)]
    pub framing: FramingConfig,
}

fn default_version() -> Version {
    nodewire_node::CURRENT
}
fn default_output() -> OutputFormat {
    OutputFormat::Base64
}

impl Default for NodewireConfig {
    fn default() -> Self {
        Self {
            default_version: default_version(),
            output: default_output(),
            framed: false,
            framing: FramingConfig::default(),
        }
    }
}

impl NodewireConfig {
    pub fn parse(content: &str) -> Result<Self, CliError> {
        toml::from_str(content).map_err(|e| CliError::Config {
            context: "parse",
            detail: e.to_string(),
        })
    }

    pub fn load(path: &str) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Config {
            context: "read",
            detail: format!("'{path}': {e}"),
        })?;
        Self::parse(&content).map_err(|e| match e {
            CliError::Config { context, detail } => CliError::Config {
                context,
                detail: format!("'{path}': {detail}"),
            },
            other => other,
        })
    }

    /// An explicitly named file must load; the default file may be absent.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG).exists() => Self::load(DEFAULT_CONFIG),
            None => Ok(Self::default()),
        }
    }
}

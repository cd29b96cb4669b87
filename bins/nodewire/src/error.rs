#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("io '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}")]
    Codec(#[from] nodewire_api::CodecError),

    #[error("framing: {0}")]
    Framing(#[from] nodewire_framing::FramingError),

    #[error("incomplete frame: {0} bytes")]
    IncompleteFrame(usize),

    #[error("{0}")]
    Action(#[from] nodewire_action::ActionError),
}

impl CliError {
    pub fn io(path: &str, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.to_string(),
            source,
        }
    }
}

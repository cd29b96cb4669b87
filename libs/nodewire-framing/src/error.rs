use nodewire_api::VersionError;

#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    #[error("framing config: {0}")]
    Config(String),

    #[error("payload too large: {len} bytes (max {max})")]
    TooLarge { len: usize, max: usize },

    #[error("payload too large for {width}-byte header: {len}")]
    HeaderOverflow { len: usize, width: usize },

    #[error("frame of {0} bytes cannot hold a version id")]
    MissingVersion(usize),

    #[error("frame version: {0}")]
    Version(#[from] VersionError),
}

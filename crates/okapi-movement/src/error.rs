use crate::diagnostics::Diagnostic;

/// Errors that can occur while loading or validating a movement config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse movement config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize movement config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("movement config has {count} error(s), first: {first}")]
    Invalid {
        count: usize,
        first: String,
        diagnostics: Vec<Diagnostic>,
    },
}

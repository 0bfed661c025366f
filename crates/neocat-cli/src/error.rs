use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] neocat_core::PipelineError),

    #[error("sink error: {0}")]
    Sink(#[from] neocat_core::SinkError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Pipeline(_) => 3,
            Self::Serialization(_) => 4,
            Self::Sink(_) | Self::Io(_) => 10,
        }
    }
}

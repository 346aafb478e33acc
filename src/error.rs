use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaleTargetError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("No data directory available. Pass --data-dir or set data_dir in saletarget.toml.")]
    NoDataDir,

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Generation error: {0}")]
    Generation(#[from] crate::generation::GenerationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

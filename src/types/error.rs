use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
    #[error("ray traversal exceeded {limit} steps (took {steps})")]
    TraversalLimit { steps: usize, limit: usize },
}

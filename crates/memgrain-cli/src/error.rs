use memgrain::core::io::point_dir::PointDirError;
use memgrain::core::models::lipid::LipidSpecError;
use memgrain::engine::error::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Point folder error: {0}")]
    PointDir(#[from] PointDirError),

    #[error("Lipid specification error: {0}")]
    Lipids(#[from] LipidSpecError),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

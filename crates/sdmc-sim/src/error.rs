use sdmc_core::{CoreError, Epoch};
use sdmc_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("no epoch after {epoch}: the episode holds {available} epochs")]
    EpochsExhausted {
        epoch:     Epoch,
        available: usize,
    },

    #[error("episode parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;

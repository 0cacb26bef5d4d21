use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("account {0} not found on the target network")]
    AccountNotFound(String),
    #[error("failed to build transaction: {0}")]
    Build(String),
    #[error("simulation failed: {0}")]
    Simulation(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("wallet error: {0}")]
    Wallet(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

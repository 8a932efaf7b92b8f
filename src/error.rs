use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChirpError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ChirpError {
    fn from(err: reqwest::Error) -> Self {
        ChirpError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChirpError>;

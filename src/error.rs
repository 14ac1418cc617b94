use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot read config file: {0}")]
    ConfigFile(#[from] config_file::ConfigFileError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Audio device error: {0}")]
    Audio(String),

    #[error("Audio output has been closed")]
    AudioClosed,

    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot spawn sequencer thread: {0}")]
    Spawn(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

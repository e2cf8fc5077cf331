use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Unknown model format: {0}")]
    UnknownModelFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("tokenizer not ready: {0}")]
    NotReady(&'static str),

    #[error("artifact error: {0}")]
    Artifact(String),
}

pub(crate) fn invalid<S: Into<String>>(msg: S) -> Error {
    Error::InvalidArgument(msg.into())
}

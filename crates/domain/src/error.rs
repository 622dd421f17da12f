use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown subset {0:?}, expected \"train\" or \"validation\"")]
    UnknownSubset(String),
    #[error("sample file name must be a bare file name, got {0:?}")]
    InvalidFileName(String),
    #[error("sample file {0:?} is not a png/jpg/jpeg image")]
    NotAnImage(String),
}

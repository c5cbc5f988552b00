use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("Unknown target health state: {0}")]
    UnknownHealthState(String),

    #[error("Unsupported listener protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

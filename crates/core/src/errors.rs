use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    EmptyIdentifier { field: &'static str },
    #[error("unsupported tone `{0}` (expected professional|casual|friendly|concise)")]
    UnsupportedTone(String),
}

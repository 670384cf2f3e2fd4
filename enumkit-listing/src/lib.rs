use thiserror::Error;

pub mod structure;
pub mod writer;

#[derive(Debug, Error)]
pub enum Error {
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
    #[error("cannot write a data type without a name")]
    Unnamed,
}

use thiserror::Error;

/// Errors produced while constructing or parsing core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid address length: {0} (expected 20)")]
    InvalidAddressLength(usize),

    #[error("Invalid address format: {0}")]
    InvalidAddressFormat(String),

    #[error("Bech32 error: {0}")]
    Bech32Error(String),

    #[error("Hex decoding error: {0}")]
    HexError(String),

    #[error("Amount overflow")]
    AmountOverflow,
}

impl From<hex::FromHexError> for TypesError {
    fn from(err: hex::FromHexError) -> Self {
        TypesError::HexError(err.to_string())
    }
}

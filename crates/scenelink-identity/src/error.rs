//! Error types for identity creation and signing

/// Errors produced while creating or using a signing identity
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Secret has a length that matches neither accepted encoding
    #[error("private keys should be 64 characters long (or 66 with a 0x prefix), got {length}")]
    InvalidSecretLength {
        /// Length of the rejected secret
        length: usize,
    },

    /// Secret has an accepted length but is not valid hex
    #[error("private key is not valid hex: {0}")]
    InvalidSecretEncoding(#[from] hex::FromHexError),

    /// No identity available for a signing operation
    #[error("no signing identity: please supply a signing secret via SCENELINK_PRIVATE_KEY")]
    NoIdentity,
}

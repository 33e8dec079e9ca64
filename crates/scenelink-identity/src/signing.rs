//! Signing output types

use serde::{Deserialize, Serialize};

/// Result of signing a message: signature plus the signer's public address
///
/// Both fields are derived from the same identity in one logical operation;
/// the pair is never partially populated. This is also the payload carried by
/// a successful link handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningResult {
    /// `0x`-prefixed hex signature over the message
    pub signature: String,
    /// `0x`-prefixed public address of the signer
    pub address: String,
}

impl SigningResult {
    /// Create a new signing result
    #[inline]
    #[must_use]
    pub fn new(signature: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            address: address.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_result_roundtrip() {
        let result = SigningResult::new("0xsig", "0xaddr");
        let json = serde_json::to_string(&result).unwrap();
        let back: SigningResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}

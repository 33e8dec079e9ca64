//! Signing identity derived from a private key secret
//!
//! A secret is accepted in exactly two encodings: 64 hex characters (raw),
//! or 66 characters with a `0x` prefix. Key material is immutable after
//! creation, so any number of concurrent signing operations may share one
//! identity.

use crate::error::IdentityError;
use crate::signing::SigningResult;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

/// Raw secret length in hex characters
const SECRET_LEN: usize = 64;
/// `0x`-prefixed secret length in hex characters
const PREFIXED_SECRET_LEN: usize = 66;
/// Bytes of the digest kept as the public address
const ADDRESS_LEN: usize = 20;

/// A signing identity: private key material plus its derived public address
#[derive(Clone)]
pub struct Identity {
    signing_key: SigningKey,
}

impl std::fmt::Debug for Identity {
    // Key material stays out of logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.derive_address())
            .finish_non_exhaustive()
    }
}

impl Identity {
    /// Create an identity from a private key secret
    ///
    /// # Errors
    /// - `IdentityError::InvalidSecretLength` if the secret is neither 64
    ///   plain hex characters nor 66 characters with a `0x` prefix
    /// - `IdentityError::InvalidSecretEncoding` if the secret is not hex
    pub fn from_secret(secret: &str) -> Result<Self, IdentityError> {
        let expected = if secret.starts_with("0x") {
            PREFIXED_SECRET_LEN
        } else {
            SECRET_LEN
        };

        if secret.len() != expected {
            return Err(IdentityError::InvalidSecretLength {
                length: secret.len(),
            });
        }

        let raw = secret.strip_prefix("0x").unwrap_or(secret);
        let bytes: [u8; 32] = hex::decode(raw)?
            .try_into()
            .map_err(|_| IdentityError::InvalidSecretLength {
                length: secret.len(),
            })?;

        let signing_key = SigningKey::from_bytes(&bytes);
        tracing::debug!("signing identity created");

        Ok(Self { signing_key })
    }

    /// Public verifying key of this identity
    #[inline]
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Public address of this identity
    ///
    /// `0x`-prefixed hex of the trailing 20 bytes of the SHA-256 digest of
    /// the verifying key.
    #[must_use]
    pub fn derive_address(&self) -> String {
        let digest = Sha256::digest(self.verifying_key().as_bytes());
        let tail = &digest[digest.len() - ADDRESS_LEN..];
        format!("0x{}", hex::encode(tail))
    }

    /// Signature over `message`, as `0x`-prefixed hex
    #[must_use]
    pub fn derive_signature(&self, message: &str) -> String {
        let signature = self.signing_key.sign(message.as_bytes());
        format!("0x{}", hex::encode(signature.to_bytes()))
    }

    /// Sign a message, producing the signature and address as one pair
    ///
    /// Address and signature derivation are independent pure reads of the
    /// immutable key material; they run concurrently and are joined before
    /// the pair is returned.
    pub async fn sign(&self, message: &str) -> SigningResult {
        let (signature, address) = tokio::join!(
            async { self.derive_signature(message) },
            async { self.derive_address() },
        );
        SigningResult::new(signature, address)
    }
}

//! SceneLink Identity - signing identity for scene publication
//!
//! Holds the private key material a session signs with:
//! - Secret parsing (plain or `0x`-prefixed hex)
//! - Public address derivation
//! - Message signing, producing an atomic `{signature, address}` pair
//!
//! # Example
//!
//! ```rust,ignore
//! use scenelink_identity::Identity;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::from_secret(&"a".repeat(64))?;
//! let result = identity.sign("root-cid").await;
//! println!("signed by {}", result.address);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod identity;
pub mod signing;

pub use error::IdentityError;
pub use identity::Identity;
pub use signing::SigningResult;

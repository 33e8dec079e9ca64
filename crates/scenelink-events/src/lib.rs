//! SceneLink Events - session event vocabulary and relay
//!
//! Sub-components (preview server, linker endpoint) report progress as
//! `SessionEvent`s. The relay bridges a component's event stream onto the
//! session's own stream so the top-level caller observes everything without
//! coupling to any component's vocabulary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod event;
pub mod relay;

pub use event::{channel, EventReceiver, EventSender, SessionEvent};
pub use relay::relay;

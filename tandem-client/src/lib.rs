//! Per-participant negotiation logic for a two-party call.
//!
//! The heart of the crate is [`Negotiator`], a finite state machine that
//! consumes typed [`PeerEvent`]s and returns [`Effect`]s (messages for the
//! relay, media actions) without touching any transport or media API itself.
//! [`Driver`] wires a negotiator to a real message channel and a
//! [`MediaSession`] implementation, feeding events in strict arrival order.

mod driver;
mod error;
mod media;
mod negotiator;
mod session;

pub use driver::{Driver, DriverInput};
pub use error::{MediaError, NegotiationError};
pub use media::MediaSession;
pub use negotiator::{DescriptionKind, Effect, Negotiator, NegotiatorState, PeerEvent};
pub use session::NegotiationSession;

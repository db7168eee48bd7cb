//! Messaging/presence provider seam.
//!
//! The engine talks to the WhatsApp business provider through the
//! [`MessagingProvider`] trait: send a text, toggle the online/typing
//! indicator, push baseline profile attributes, mark a chat as read.
//! [`EvolutionProvider`] is the production HTTP adapter;
//! [`MockProvider`] is the recording test double used across crate tests.

pub mod evolution;
pub mod mock;
pub mod traits;

pub use evolution::EvolutionProvider;
pub use mock::{MockProvider, ProviderCall};
pub use traits::{MessagingProvider, PresenceState, ProfileAttributes};

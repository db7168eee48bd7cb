//! Shared domain types for the Zapflow orchestration engine.
//!
//! Pure data: chat identities, humanization profiles, handoff triggers, the
//! configuration model, the shared error type, and structured trace events.
//! No I/O lives here.

pub mod chat_key;
pub mod config;
pub mod error;
pub mod profile;
pub mod trace;
pub mod trigger;

pub use chat_key::{ChatKey, Holder, ProfileKey};
pub use error::{Error, Result};
pub use profile::{HumanizationProfile, ProfileCatalog};
pub use trigger::HandoffTrigger;

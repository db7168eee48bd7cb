//! Active-session tracking for the orchestration engine.
//!
//! One [`registry::SessionRegistry`] tracks every chat currently being
//! served.  Each session owns a heartbeat task that re-asserts profile
//! presence while the chat stays active and tears the session down once the
//! inactivity window passes — activity marks are the only thing keeping a
//! session alive.

pub mod registry;

pub use registry::{ChatSession, SessionRegistry};

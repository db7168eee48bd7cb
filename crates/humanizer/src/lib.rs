//! Humanized reply delivery.
//!
//! Turns one logical reply into a sequence of timed, presence-wrapped send
//! operations: a randomized pre-send delay, a typing indicator held under
//! the chat's presence lock, and word-boundary chunking with inter-chunk
//! pacing.  Aggregate counters live in [`stats::HumanizationStats`].

pub mod chunk;
pub mod pipeline;
pub mod stats;
pub mod timing;

pub use pipeline::{DeliveryOutcome, HumanizedDelivery};
pub use stats::{HumanizationStats, StatsSnapshot};

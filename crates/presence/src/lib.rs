//! Presence ownership for concurrent chat processing.
//!
//! Every write to a chat's online/typing indicator goes through the
//! [`PresenceLockMap`]: an advisory, self-expiring, per-chat lock keyed by
//! (instance, chat).  The [`ProfileConfigurator`] layers on top of it to
//! guarantee the expensive baseline profile call runs at most once per
//! instance even under concurrent first use.

pub mod configurator;
pub mod lock;

pub use configurator::{ProfileConfigurator, PROFILE_RESOURCE};
pub use lock::{LockInfo, PresenceLockMap, PresenceStatus};

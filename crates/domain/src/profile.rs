//! Humanization profiles ("personalities").
//!
//! A profile describes how the engine paces an outgoing reply: the random
//! pre-send delay, the typing-indicator window, and how long replies are
//! fragmented into chunks.  Profiles are read-only catalog entries selected
//! per assistant/session; they are authored in the dashboard and arrive here
//! through configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Profile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Casual,
    #[default]
    Friendly,
    Professional,
}

/// Randomized pre-send delay bounds, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResponseDelay {
    #[serde(default = "d_delay_min")]
    pub min_ms: u64,
    #[serde(default = "d_delay_max")]
    pub max_ms: u64,
}

impl Default for ResponseDelay {
    fn default() -> Self {
        Self {
            min_ms: d_delay_min(),
            max_ms: d_delay_max(),
        }
    }
}

/// Typing-indicator behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TypingBehavior {
    #[serde(default = "d_true")]
    pub enabled: bool,
    #[serde(default = "d_typing_min")]
    pub min_duration_ms: u64,
    #[serde(default = "d_typing_max")]
    pub max_duration_ms: u64,
}

impl Default for TypingBehavior {
    fn default() -> Self {
        Self {
            enabled: true,
            min_duration_ms: d_typing_min(),
            max_duration_ms: d_typing_max(),
        }
    }
}

/// How long replies are fragmented and paced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MessageHandling {
    #[serde(default = "d_true")]
    pub split_long_messages: bool,
    #[serde(default = "d_max_chars")]
    pub max_chars_per_chunk: usize,
    #[serde(default = "d_chunk_delay")]
    pub delay_between_chunks_ms: u64,
    #[serde(default)]
    pub mark_as_read: bool,
}

impl Default for MessageHandling {
    fn default() -> Self {
        Self {
            split_long_messages: true,
            max_chars_per_chunk: d_max_chars(),
            delay_between_chunks_ms: d_chunk_delay(),
            mark_as_read: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Behavior {
    #[serde(default)]
    pub typing: TypingBehavior,
    #[serde(default)]
    pub message_handling: MessageHandling,
}

/// One humanization profile ("personality") from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizationProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tone: Tone,
    /// Simulated typing speed, words per minute.  Must be > 0.
    #[serde(default = "d_wpm")]
    pub typing_speed_wpm: u32,
    #[serde(default)]
    pub response_delay: ResponseDelay,
    /// Expressiveness knob in `[0, 1]` — reserved for reaction selection.
    #[serde(default = "d_half")]
    pub emotional_level: f64,
    /// Probability in `[0, 1]` that the assistant reacts to a message.
    #[serde(default = "d_half")]
    pub reaction_probability: f64,
    #[serde(default)]
    pub behavior: Behavior,
}

impl Default for HumanizationProfile {
    fn default() -> Self {
        Self {
            id: "default".into(),
            name: "Default".into(),
            tone: Tone::default(),
            typing_speed_wpm: d_wpm(),
            response_delay: ResponseDelay::default(),
            emotional_level: d_half(),
            reaction_probability: d_half(),
            behavior: Behavior::default(),
        }
    }
}

impl HumanizationProfile {
    /// Check the profile's internal invariants.  Returns a human-readable
    /// description of the first violation found.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.typing_speed_wpm == 0 {
            return Err("typing_speed_wpm must be > 0".into());
        }
        if self.response_delay.min_ms > self.response_delay.max_ms {
            return Err("response_delay: min_ms > max_ms".into());
        }
        let typing = &self.behavior.typing;
        if typing.min_duration_ms > typing.max_duration_ms {
            return Err("behavior.typing: min_duration_ms > max_duration_ms".into());
        }
        let handling = &self.behavior.message_handling;
        if handling.split_long_messages && handling.max_chars_per_chunk == 0 {
            return Err("behavior.message_handling: max_chars_per_chunk must be > 0 when splitting is enabled".into());
        }
        if !(0.0..=1.0).contains(&self.emotional_level) {
            return Err("emotional_level must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.reaction_probability) {
            return Err("reaction_probability must be within [0, 1]".into());
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Catalog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Read-only catalog of configured profiles with a built-in fallback.
pub struct ProfileCatalog {
    profiles: HashMap<String, HumanizationProfile>,
    default: HumanizationProfile,
}

impl ProfileCatalog {
    /// Build a catalog from the configured `[profiles.<id>]` sections.
    /// Each entry's `id` field is backfilled from its map key.
    pub fn new(mut profiles: HashMap<String, HumanizationProfile>) -> Self {
        for (id, profile) in profiles.iter_mut() {
            if profile.id.is_empty() {
                profile.id = id.clone();
            }
        }
        Self {
            profiles,
            default: HumanizationProfile::default(),
        }
    }

    /// Resolve a profile by ID.  `None` resolves to the built-in default.
    pub fn resolve(&self, profile_id: Option<&str>) -> Result<HumanizationProfile> {
        match profile_id {
            None => Ok(self.default.clone()),
            Some(id) => self
                .profiles
                .get(id)
                .cloned()
                .ok_or_else(|| Error::UnknownProfile(id.to_owned())),
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_true() -> bool {
    true
}
fn d_wpm() -> u32 {
    45
}
fn d_half() -> f64 {
    0.5
}
fn d_delay_min() -> u64 {
    800
}
fn d_delay_max() -> u64 {
    2_500
}
fn d_typing_min() -> u64 {
    1_200
}
fn d_typing_max() -> u64 {
    5_000
}
fn d_max_chars() -> usize {
    280
}
fn d_chunk_delay() -> u64 {
    900
}

//! Delay and typing-duration computation.

use std::time::Duration;

use rand::Rng;

use zf_domain::profile::{ResponseDelay, TypingBehavior};

/// Sample the randomized pre-send delay uniformly from the profile bounds.
pub fn sample_delay(delay: &ResponseDelay) -> Duration {
    let ms = if delay.min_ms >= delay.max_ms {
        delay.min_ms
    } else {
        rand::thread_rng().gen_range(delay.min_ms..=delay.max_ms)
    };
    Duration::from_millis(ms)
}

/// Estimate how long a human would type `char_count` characters at
/// `typing_speed_wpm`, clamped into the profile's `[min, max]` window.
///
/// The estimate uses the usual 5-characters-per-word convention.  Inverted
/// bounds (min > max, slipped past validation) degrade to the minimum
/// rather than panicking.
pub fn typing_duration(char_count: usize, typing_speed_wpm: u32, typing: &TypingBehavior) -> Duration {
    let words = (char_count as u64 / 5).max(1);
    let wpm = u64::from(typing_speed_wpm.max(1));
    let estimate_ms = words * 60_000 / wpm;

    let ms = estimate_ms
        .min(typing.max_duration_ms)
        .max(typing.min_duration_ms);
    Duration::from_millis(ms)
}

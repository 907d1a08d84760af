use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DeckSeed;

/// Settings for a [`GameSession`](crate::GameSession).
///
/// Loadable from JSON; missing fields take their defaults.
///
/// ```json
/// { "colors": 8, "revert_delay_ms": 1500, "seed": "000102030405060708090a0b0c0d0e0f" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of distinct colors, i.e. pairs, in a round.
    pub colors: usize,
    /// How long a mismatched pair stays face up.
    #[serde(rename = "revert_delay_ms", with = "millis")]
    pub revert_delay: Duration,
    /// Seed for deterministic decks. A random seed is used when absent.
    pub seed: Option<DeckSeed>,
}

impl SessionConfig {
    pub const DEFAULT_COLORS: usize = 10;
    pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(1000);
    pub const MIN_REVERT_DELAY: Duration = Duration::from_millis(1);

    #[must_use]
    pub fn with_colors(self, colors: usize) -> Self {
        Self { colors, ..self }
    }

    /// Sets the revert delay, raised to [`Self::MIN_REVERT_DELAY`] if shorter.
    #[must_use]
    pub fn with_revert_delay(self, revert_delay: Duration) -> Self {
        Self {
            revert_delay: revert_delay.max(Self::MIN_REVERT_DELAY),
            ..self
        }
    }

    #[must_use]
    pub fn with_seed(self, seed: DeckSeed) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            colors: Self::DEFAULT_COLORS,
            revert_delay: Self::DEFAULT_REVERT_DELAY,
            seed: None,
        }
    }
}

/// Interprets text typed by the player as a round size.
///
/// Anything that is not a positive integer falls back to
/// [`SessionConfig::DEFAULT_COLORS`].
#[must_use]
pub fn round_size_from_input(input: &str) -> usize {
    match input.trim().parse::<usize>() {
        Ok(size) if size >= 1 => size,
        _ => {
            log::warn!(
                "unusable round size {input:?}, using {}",
                SessionConfig::DEFAULT_COLORS
            );
            SessionConfig::DEFAULT_COLORS
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

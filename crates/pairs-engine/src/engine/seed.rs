use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic deck generation.
///
/// A 128-bit seed for the random number generator that picks colors and
/// shuffles decks. A session created with the same seed and round sizes
/// deals the same decks, which makes rounds reproducible for tests and
/// simulations.
///
/// Serialized as a 32-character lowercase hex string.
///
/// # Example
///
/// ```
/// use pairs_engine::{DeckSeed, GameSession, SessionConfig};
/// use rand::Rng as _;
///
/// let seed: DeckSeed = rand::rng().random();
/// let config = SessionConfig::default().with_seed(seed);
///
/// let first = GameSession::start(&config).unwrap();
/// let second = GameSession::start(&config).unwrap();
/// assert_eq!(first.deck(), second.deck());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckSeed([u8; 16]);

impl DeckSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub(crate) fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for DeckSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid deck seed {input:?}: expected 32 hex characters")]
pub struct ParseDeckSeedError {
    #[error(not(source))]
    input: String,
}

impl FromStr for DeckSeed {
    type Err = ParseDeckSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDeckSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for DeckSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeckSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `DeckSeed` values with `rng.random()`.
impl Distribution<DeckSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DeckSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        DeckSeed(seed)
    }
}

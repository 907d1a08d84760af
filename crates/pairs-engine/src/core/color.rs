use std::{collections::HashSet, fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::GameError;

/// Card face color.
///
/// A 24-bit RGB value, formatted as `#RRGGBB`. The engine only ever compares
/// colors for equality; the channels are exposed for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color([u8; 3]);

impl Color {
    /// Number of distinct colors that can be represented.
    pub const SPACE: usize = 1 << 24;

    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        let [r, g, b] = self.0;
        (r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid color {input:?}: expected `#RRGGBB`")]
pub struct ParseColorError {
    #[error(not(source))]
    input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_owned(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u32::from_str_radix(hex, 16).map_err(|_| err())?;
        let [_, r, g, b] = num.to_be_bytes();
        Ok(Self([r, g, b]))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<Color> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        let mut rgb = [0; 3];
        rng.fill(&mut rgb);
        Color(rgb)
    }
}

/// Produces the colors of a deck: `n` distinct colors, each twice.
///
/// The returned sequence is the `n` base colors followed by the same colors
/// in the same order. It is not shuffled.
///
/// # Example
///
/// ```
/// use pairs_engine::ColorPairGenerator;
///
/// let colors = ColorPairGenerator::generate(&mut rand::rng(), 3).unwrap();
/// assert_eq!(colors.len(), 6);
/// assert_eq!(colors[..3], colors[3..]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColorPairGenerator;

impl ColorPairGenerator {
    pub fn generate<R>(rng: &mut R, n: usize) -> Result<Vec<Color>, GameError>
    where
        R: Rng + ?Sized,
    {
        if !(1..=Color::SPACE).contains(&n) {
            return Err(GameError::InvalidArgument {
                size: n,
                max: Color::SPACE,
            });
        }

        let mut seen = HashSet::with_capacity(n);
        let mut colors = Vec::with_capacity(n * 2);
        while colors.len() < n {
            let color: Color = rng.random();
            if seen.insert(color) {
                colors.push(color);
            }
        }
        colors.extend_from_within(..);
        Ok(colors)
    }
}

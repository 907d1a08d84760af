pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Errors reported by the game engine.
///
/// Every variant is recoverable: the offending call is rejected and the
/// session state is left exactly as it was.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum GameError {
    #[display("invalid round size {size}: expected 1..={max}")]
    InvalidArgument { size: usize, max: usize },
    #[display("card index {index} out of range for a deck of {len} cards")]
    OutOfRange { index: usize, len: usize },
    #[display("stale event from generation {event}, current generation is {current}")]
    StaleEvent {
        event: Generation,
        current: Generation,
    },
    #[display("no won round is waiting to be recorded")]
    RoundNotWon,
}

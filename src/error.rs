//! Error types for tape generation, layout and execution.

use thiserror::Error;

/// Everything that can go wrong while building or running a game.
///
/// None of these are retried: every operation in the crate is deterministic
/// in its inputs, so an error is a rejected precondition.
#[derive(Debug, Error)]
pub enum Error {
    /// A tape needs room for the leading `nop` and the trailing `hlt`.
    #[error("tape length must be at least 2, got {length}")]
    InvalidLength { length: usize },

    /// An explicitly supplied tape breaks the `nop` first / `hlt` last shape.
    #[error("malformed tape: {reason}")]
    MalformedTape { reason: String },

    /// A resumed engine state whose position is not on the tape.
    #[error("position {position} is off a tape of length {len}")]
    PositionOutOfRange { position: usize, len: usize },

    /// `step` was called after the engine reached `hlt`.
    #[error("engine already halted")]
    AlreadyHalted,

    /// A `jmp` points past the end of the tape.
    #[error("jmp at index {at} targets {target}, tape length is {len}")]
    OutOfRangeJump { at: usize, target: usize, len: usize },

    /// A die value outside `[1, sides]`.
    #[error("die value {die} is outside 1..={sides}")]
    DieOutOfRange { die: u32, sides: u32 },

    /// A die needs at least one side.
    #[error("a die must have at least one side")]
    InvalidSides,

    #[error("invalid generator config: {reason}")]
    InvalidConfig { reason: String },

    /// A scripted die ran out of values before the game halted.
    #[error("scripted dice exhausted")]
    DiceExhausted,

    /// A session hit its configured step limit before halting.
    #[error("no hlt reached within {limit} steps")]
    StepLimit { limit: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

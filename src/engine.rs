use std::fmt;

use crate::dice::DEFAULT_SIDES;
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::tape::Tape;

/// Whether the engine can still take steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

/// Mutable game state: where the token is and what it has scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineState {
    pub position: usize,
    pub score: i64,
    pub halted: bool,
}

impl EngineState {
    /// Token on square 0 with the given score.
    pub fn with_score(score: i64) -> Self {
        Self {
            position: 0,
            score,
            halted: false,
        }
    }

    pub fn status(&self) -> Status {
        if self.halted {
            Status::Halted
        } else {
            Status::Running
        }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::with_score(0)
    }
}

/// Outcome of one step.
///
/// `instruction` is the instruction the token ended on: for a step that
/// landed on a `jmp`, that is the instruction at the jump target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub position: usize,
    pub score: i64,
    pub instruction: Instruction,
    pub roll: u32,
    pub status: Status,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pos: {} Score: {}, instruction {} Rolled: {}",
            self.position, self.score, self.instruction, self.roll
        )
    }
}

/// Dice-driven interpreter over a borrowed tape.
///
/// Each step moves the token forward by the die value (wrapping at the end
/// of the tape), then resolves the square it lands on:
/// - `add`/`sub`/`mul` update the score
/// - `jmp t` moves the token to `t` and resolves square `t` instead. This
///   happens once per step; a `jmp` found at the target is not followed.
/// - `hlt` halts the engine for good
/// - `nop` does nothing
pub struct Engine<'t> {
    tape: &'t Tape,
    sides: u32,
    state: EngineState,
}

impl<'t> Engine<'t> {
    /// A fresh engine with the default six-sided die.
    pub fn new(tape: &'t Tape) -> Self {
        Self {
            tape,
            sides: DEFAULT_SIDES,
            state: EngineState::default(),
        }
    }

    /// A fresh engine accepting rolls in `1..=sides`.
    pub fn with_sides(tape: &'t Tape, sides: u32) -> Result<Self> {
        if sides == 0 {
            return Err(Error::InvalidSides);
        }
        Ok(Self {
            tape,
            sides,
            state: EngineState::default(),
        })
    }

    /// Resume from an existing state.
    ///
    /// The position must be on the tape.
    pub fn from_state(tape: &'t Tape, sides: u32, state: EngineState) -> Result<Self> {
        if state.position >= tape.len() {
            return Err(Error::PositionOutOfRange {
                position: state.position,
                len: tape.len(),
            });
        }
        let mut engine = Self::with_sides(tape, sides)?;
        engine.state = state;
        Ok(engine)
    }

    pub fn tape(&self) -> &'t Tape {
        self.tape
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// Instruction under the token.
    pub fn current(&self) -> Instruction {
        self.instruction_at(self.state.position)
    }

    fn instruction_at(&self, index: usize) -> Instruction {
        self.tape.instructions()[index]
    }

    /// Advance by `die` and resolve the landing square.
    ///
    /// On error the state is left untouched.
    pub fn step(&mut self, die: u32) -> Result<StepReport> {
        if self.state.halted {
            return Err(Error::AlreadyHalted);
        }
        if die == 0 || die > self.sides {
            return Err(Error::DieOutOfRange {
                die,
                sides: self.sides,
            });
        }

        let len = self.tape.len();
        let landed = (self.state.position + die as usize) % len;
        let (position, instruction) = match self.instruction_at(landed) {
            Instruction::Jump(target) => {
                if target >= len {
                    return Err(Error::OutOfRangeJump {
                        at: landed,
                        target,
                        len,
                    });
                }
                log::trace!("jmp at {landed} redirects to {target}");
                (target, self.instruction_at(target))
            }
            other => (landed, other),
        };

        self.state.position = position;
        self.state.score = instruction.apply(self.state.score);
        if instruction == Instruction::Halt {
            self.state.halted = true;
            log::info!("halted at {position} with score {}", self.state.score);
        }

        let report = StepReport {
            position,
            score: self.state.score,
            instruction,
            roll: die,
            status: self.state.status(),
        };
        log::trace!("{report}");
        Ok(report)
    }

    /// The closing line printed once the game is over.
    pub fn summary(&self) -> String {
        format!(
            "Final Pos: {} Final Score: {}, Instruction {}",
            self.state.position,
            self.state.score,
            self.current()
        )
    }
}

/// Step entry point over a caller-held state.
///
/// Rolls must be in `1..=sides`. Returns the updated state and the status
/// line. The input state is not modified; on error nothing changes.
pub fn step(
    tape: &Tape,
    sides: u32,
    state: EngineState,
    die: u32,
) -> Result<(EngineState, String)> {
    let mut engine = Engine::from_state(tape, sides, state)?;
    let report = engine.step(die)?;
    Ok((engine.state(), report.to_string()))
}

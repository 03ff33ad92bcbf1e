use std::io::Write;

use crate::dice::DieSource;
use crate::engine::{Engine, EngineState, StepReport};
use crate::error::{Error, Result};
use crate::render;
use crate::tape::{Tape, TapeGenerator};

/// Configuration for one playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Faces on the die; rolls must be in `1..=sides`.
    pub sides: u32,
    /// Abort the game after this many steps (`None` to play until `hlt`).
    pub step_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sides: crate::dice::DEFAULT_SIDES,
            step_limit: None,
        }
    }
}

/// One playthrough: a tape and the token's state on it.
#[derive(Debug, Clone)]
pub struct Session {
    tape: Tape,
    config: SessionConfig,
    state: EngineState,
    steps: usize,
}

impl Session {
    pub fn new(tape: Tape, config: SessionConfig) -> Result<Self> {
        if config.sides == 0 {
            return Err(Error::InvalidSides);
        }
        Ok(Self {
            tape,
            config,
            state: EngineState::default(),
            steps: 0,
        })
    }

    /// Generate a fresh tape and start a session on it.
    pub fn generate(
        generator: &TapeGenerator,
        length: usize,
        seed: Option<u64>,
        config: SessionConfig,
    ) -> Result<Self> {
        Self::new(generator.generate(length, seed)?, config)
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Draw the board.
    pub fn render_board<W: Write>(&self, out: &mut W) -> Result<()> {
        render::render_to(&self.tape, out)?;
        Ok(())
    }

    /// Roll and step until the engine halts, writing one status line per
    /// step and the final summary line.
    ///
    /// The session state tracks every successful step, so after an error it
    /// reflects the last good position.
    pub fn play<D, W>(&mut self, dice: &mut D, out: &mut W) -> Result<StepReport>
    where
        D: DieSource + ?Sized,
        W: Write,
    {
        if dice.sides() != self.config.sides {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "session expects a {}-sided die, got {}",
                    self.config.sides,
                    dice.sides()
                ),
            });
        }

        let mut engine = Engine::from_state(&self.tape, self.config.sides, self.state)?;
        loop {
            if let Some(limit) = self.config.step_limit {
                if self.steps >= limit {
                    return Err(Error::StepLimit { limit });
                }
            }
            let roll = dice.roll()?;
            let report = engine.step(roll)?;
            self.state = engine.state();
            self.steps += 1;
            writeln!(out, "{report}")?;
            if self.state.halted {
                writeln!(out, "{}", engine.summary())?;
                log::debug!("session finished after {} steps", self.steps);
                return Ok(report);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{FairDie, ScriptedDie};
    use crate::engine::Status;
    use crate::instruction::Instruction::*;

    fn jump_tape() -> Tape {
        Tape::from_instructions(vec![
            Nop,
            Nop,
            Nop,
            Jump(7),
            Nop,
            Nop,
            Nop,
            Add(20),
            Nop,
            Halt,
        ])
        .unwrap()
    }

    #[test]
    fn test_scripted_game_transcript() {
        let mut session = Session::new(jump_tape(), SessionConfig::default()).unwrap();
        let mut dice = ScriptedDie::new(6, [3, 1, 1]);
        let mut out = Vec::new();
        let last = session.play(&mut dice, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Pos: 7 Score: 20, instruction add 20 Rolled: 3",
                "Pos: 8 Score: 20, instruction nop Rolled: 1",
                "Pos: 9 Score: 20, instruction hlt Rolled: 1",
                "Final Pos: 9 Final Score: 20, Instruction hlt",
            ]
        );
        assert_eq!(last.status, Status::Halted);
        assert_eq!(session.steps(), 3);
        assert!(dice.remaining().is_empty());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let run = || {
            let generator = TapeGenerator::default();
            let mut session =
                Session::generate(&generator, 40, Some(17), SessionConfig::default()).unwrap();
            let mut dice = FairDie::seeded(6, 99).unwrap();
            let mut out = Vec::new();
            session.play(&mut dice, &mut out).unwrap();
            (session.state(), out)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_exhausted_dice_keep_progress() {
        let mut session = Session::new(jump_tape(), SessionConfig::default()).unwrap();
        let mut dice = ScriptedDie::new(6, [3]);
        let err = session.play(&mut dice, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::DiceExhausted));
        assert_eq!(session.state().position, 7);
        assert_eq!(session.state().score, 20);

        // Picking up again with more dice continues from square 7.
        let mut dice = ScriptedDie::new(6, [2]);
        let last = session.play(&mut dice, &mut Vec::new()).unwrap();
        assert_eq!(last.position, 9);
        assert_eq!(last.status, Status::Halted);
    }

    #[test]
    fn test_finished_session_rejects_play() {
        let tape = Tape::from_instructions(vec![Nop, Halt]).unwrap();
        let mut session = Session::new(tape, SessionConfig::default()).unwrap();
        session
            .play(&mut ScriptedDie::new(6, [1]), &mut Vec::new())
            .unwrap();
        let err = session
            .play(&mut ScriptedDie::new(6, [1]), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyHalted));
    }

    #[test]
    fn test_side_mismatch_rejected() {
        let mut session = Session::new(jump_tape(), SessionConfig::default()).unwrap();
        let err = session
            .play(&mut ScriptedDie::new(20, [3]), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert_eq!(session.steps(), 0);
    }

    #[test]
    fn test_step_limit() {
        // Rolling 2 forever on four squares bounces between 0 and 2.
        let tape = Tape::from_instructions(vec![Nop, Nop, Nop, Halt]).unwrap();
        let config = SessionConfig {
            step_limit: Some(10),
            ..Default::default()
        };
        let mut session = Session::new(tape, config).unwrap();
        let err = session.play(&mut (6u32, || 2u32), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::StepLimit { limit: 10 }));
        assert_eq!(session.steps(), 10);
    }

    #[test]
    fn test_render_board() {
        let session = Session::new(jump_tape(), SessionConfig::default()).unwrap();
        let mut out = Vec::new();
        session.render_board(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("jmp 7"));
        assert!(text.contains("add 20"));
    }

    #[test]
    fn test_invalid_sides() {
        let config = SessionConfig {
            sides: 0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(jump_tape(), config),
            Err(Error::InvalidSides)
        ));
    }
}

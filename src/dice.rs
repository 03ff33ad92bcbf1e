use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::{Error, Result};

/// Default number of die faces.
pub const DEFAULT_SIDES: u32 = 6;

/// A source of die values driving the engine one step at a time.
///
/// The engine never rolls on its own; a session pulls a value from a
/// `DieSource` and hands it to `Engine::step`. Tests swap in a scripted
/// source so a game replays exactly.
pub trait DieSource {
    /// Number of faces; every roll is in `1..=sides()`.
    fn sides(&self) -> u32;

    /// Produce the next value.
    fn roll(&mut self) -> Result<u32>;
}

/// A fair die backed by an owned `SmallRng`.
pub struct FairDie {
    sides: u32,
    rng: SmallRng,
}

impl FairDie {
    /// A die seeded from OS entropy.
    pub fn new(sides: u32) -> Result<Self> {
        Self::with_rng(sides, SmallRng::from_entropy())
    }

    /// A die whose rolls replay identically for the same seed.
    pub fn seeded(sides: u32, seed: u64) -> Result<Self> {
        Self::with_rng(sides, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(sides: u32, rng: SmallRng) -> Result<Self> {
        if sides == 0 {
            return Err(Error::InvalidSides);
        }
        Ok(Self { sides, rng })
    }
}

impl DieSource for FairDie {
    fn sides(&self) -> u32 {
        self.sides
    }

    fn roll(&mut self) -> Result<u32> {
        Ok(self.rng.gen_range(1..=self.sides))
    }
}

/// Replays a fixed sequence of values, then reports `DiceExhausted`.
///
/// Values are not range-checked here; the engine rejects anything outside
/// `1..=sides`.
#[derive(Debug, Clone)]
pub struct ScriptedDie {
    sides: u32,
    values: Vec<u32>,
    next: usize,
}

impl ScriptedDie {
    pub fn new(sides: u32, values: impl Into<Vec<u32>>) -> Self {
        Self {
            sides,
            values: values.into(),
            next: 0,
        }
    }

    /// Values not yet rolled.
    pub fn remaining(&self) -> &[u32] {
        &self.values[self.next..]
    }
}

impl DieSource for ScriptedDie {
    fn sides(&self) -> u32 {
        self.sides
    }

    fn roll(&mut self) -> Result<u32> {
        let value = *self.values.get(self.next).ok_or(Error::DiceExhausted)?;
        self.next += 1;
        Ok(value)
    }
}

/// Any closure works as a die: `(sides, || ...)`.
impl<F> DieSource for (u32, F)
where
    F: FnMut() -> u32,
{
    fn sides(&self) -> u32 {
        self.0
    }

    fn roll(&mut self) -> Result<u32> {
        Ok((self.1)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fair_die_in_range() {
        let mut die = FairDie::seeded(6, 1).unwrap();
        for _ in 0..1000 {
            let v = die.roll().unwrap();
            assert!((1..=6).contains(&v));
        }
    }

    #[test]
    fn test_fair_die_hits_every_face() {
        let mut die = FairDie::seeded(6, 9).unwrap();
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[die.roll().unwrap() as usize - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_seeded_die_replays() {
        let rolls = |seed| {
            let mut die = FairDie::seeded(20, seed).unwrap();
            (0..50).map(|_| die.roll().unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(rolls(3), rolls(3));
        assert_ne!(rolls(3), rolls(4));
    }

    #[test]
    fn test_zero_sides_rejected() {
        assert!(matches!(FairDie::seeded(0, 1), Err(Error::InvalidSides)));
        assert!(matches!(FairDie::new(0), Err(Error::InvalidSides)));
    }

    #[test]
    fn test_scripted_die() {
        let mut die = ScriptedDie::new(6, [3, 1]);
        assert_eq!(die.roll().unwrap(), 3);
        assert_eq!(die.remaining(), &[1]);
        assert_eq!(die.roll().unwrap(), 1);
        assert!(matches!(die.roll(), Err(Error::DiceExhausted)));
    }

    #[test]
    fn test_closure_die() {
        let mut n = 0;
        let mut die = (6u32, || {
            n += 1;
            n
        });
        assert_eq!(die.sides(), 6);
        assert_eq!(die.roll().unwrap(), 1);
        assert_eq!(die.roll().unwrap(), 2);
    }
}

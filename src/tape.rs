use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::{Error, Result};
use crate::instruction::Instruction;

/// The board: a fixed sequence of instructions, `nop` first and `hlt` last.
///
/// A tape is never mutated once built. Jump targets are not checked here,
/// so a hand-built tape may carry a `jmp` past the end; the engine rejects
/// those when it lands on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    instructions: Vec<Instruction>,
}

impl Tape {
    /// Build a tape from an explicit instruction sequence.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Result<Self> {
        if instructions.len() < 2 {
            return Err(Error::InvalidLength {
                length: instructions.len(),
            });
        }
        if instructions[0] != Instruction::Nop {
            return Err(Error::MalformedTape {
                reason: format!("index 0 must be nop, found {}", instructions[0]),
            });
        }
        let last = instructions.len() - 1;
        if instructions[last] != Instruction::Halt {
            return Err(Error::MalformedTape {
                reason: format!("index {last} must be hlt, found {}", instructions[last]),
            });
        }
        Ok(Self { instructions })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Always false; kept alongside `len` for the usual collection shape.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.instructions.get(index).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// One `<index>: <instruction>` line per square.
    pub fn disassemble(&self) -> String {
        use std::fmt::Write;
        let width = (self.len() - 1).to_string().len();
        let mut out = String::new();
        for (i, instr) in self.instructions.iter().enumerate() {
            let _ = writeln!(out, "{i:>width$}: {instr}");
        }
        out
    }
}

/// Relative weights of each instruction kind for interior squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub nop: u32,
    pub add: u32,
    pub sub: u32,
    pub mul: u32,
    pub jump: u32,
    pub halt: u32,
}

impl Weights {
    /// Weights used when none are configured.
    pub const DEFAULT: Weights = Weights {
        nop: 5,
        add: 2,
        sub: 2,
        mul: 2,
        jump: 3,
        halt: 1,
    };

    const fn as_array(&self) -> [u32; 6] {
        [self.nop, self.add, self.sub, self.mul, self.jump, self.halt]
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for tape generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Largest `add`/`sub`/`mul` operand; operands are drawn from `1..=magnitude_max`.
    pub magnitude_max: i64,
    pub weights: Weights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            magnitude_max: 100,
            weights: Weights::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Nop,
    Add,
    Sub,
    Mul,
    Jump,
    Halt,
}

const KINDS: [Kind; 6] = [
    Kind::Nop,
    Kind::Add,
    Kind::Sub,
    Kind::Mul,
    Kind::Jump,
    Kind::Halt,
];

/// Cumulative weight table: `bounds[i]` is the sum of the weights of
/// `KINDS[..=i]`. A single draw in `0..total` selects the first kind whose
/// bound exceeds it, so zero-weight kinds are never picked.
#[derive(Debug, Clone)]
struct WeightTable {
    bounds: [u32; 6],
}

impl WeightTable {
    /// Running sums of `weights`, or `None` if they overflow `u32`.
    const fn cumulative(weights: &Weights) -> Option<[u32; 6]> {
        let raw = weights.as_array();
        let mut bounds = [0u32; 6];
        let mut acc: u32 = 0;
        let mut i = 0;
        while i < raw.len() {
            acc = match acc.checked_add(raw[i]) {
                Some(sum) => sum,
                None => return None,
            };
            bounds[i] = acc;
            i += 1;
        }
        Some(bounds)
    }

    fn new(weights: &Weights) -> Result<Self> {
        let bounds = Self::cumulative(weights).ok_or_else(|| Error::InvalidConfig {
            reason: "weights overflow u32".to_string(),
        })?;
        if bounds[5] == 0 {
            return Err(Error::InvalidConfig {
                reason: "weights must not all be zero".to_string(),
            });
        }
        Ok(Self { bounds })
    }

    fn total(&self) -> u32 {
        self.bounds[5]
    }

    fn pick(&self, draw: u32) -> Kind {
        KINDS[self.bounds.partition_point(|&b| b <= draw)]
    }
}

const DEFAULT_TABLE: WeightTable = match WeightTable::cumulative(&Weights::DEFAULT) {
    Some(bounds) => WeightTable { bounds },
    None => panic!("default weights overflow"),
};

/// Weighted procedural generator for tapes.
#[derive(Debug, Clone)]
pub struct TapeGenerator {
    config: GeneratorConfig,
    table: WeightTable,
}

impl Default for TapeGenerator {
    fn default() -> Self {
        Self {
            config: GeneratorConfig::default(),
            table: DEFAULT_TABLE,
        }
    }
}

impl TapeGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if config.magnitude_max < 1 {
            return Err(Error::InvalidConfig {
                reason: format!("magnitude_max must be at least 1, got {}", config.magnitude_max),
            });
        }
        let table = WeightTable::new(&config.weights)?;
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a tape of `length` squares.
    ///
    /// With a seed the result is fully reproducible; without one the
    /// generator seeds itself from OS entropy.
    pub fn generate(&self, length: usize, seed: Option<u64>) -> Result<Tape> {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.generate_with(length, &mut rng)
    }

    /// Generate a tape drawing from a caller-owned random source.
    ///
    /// Each interior square draws, in order: an operand, a jump target and
    /// the instruction kind. The operand and target are drawn even when the
    /// chosen kind ignores them, which keeps the random stream aligned
    /// between tapes of different composition.
    pub fn generate_with<R: Rng>(&self, length: usize, rng: &mut R) -> Result<Tape> {
        if length < 2 {
            return Err(Error::InvalidLength { length });
        }

        let mut instructions = Vec::with_capacity(length);
        instructions.push(Instruction::Nop);
        for _ in 0..length - 2 {
            let magnitude = rng.gen_range(1..=self.config.magnitude_max);
            let target = rng.gen_range(0..length);
            let instr = match self.table.pick(rng.gen_range(0..self.table.total())) {
                Kind::Nop => Instruction::Nop,
                Kind::Add => Instruction::Add(magnitude),
                Kind::Sub => Instruction::Sub(magnitude),
                Kind::Mul => Instruction::Mul(magnitude),
                Kind::Jump => Instruction::Jump(target),
                Kind::Halt => Instruction::Halt,
            };
            instructions.push(instr);
        }
        instructions.push(Instruction::Halt);

        log::debug!("generated tape of length {length}");
        Ok(Tape { instructions })
    }
}

/// Generate a tape with the default weights.
pub fn generate(length: usize, seed: Option<u64>) -> Result<Tape> {
    TapeGenerator::default().generate(length, seed)
}

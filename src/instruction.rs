use std::fmt;

/// One square of the board.
///
/// The instruction set is fixed: arithmetic on the score, an unconditional
/// jump, a halt and a no-op. Operands are stored decoded; the canonical text
/// form (`add 37`, `jmp 4`, `nop`, `hlt`) is what gets printed on the board
/// and in status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Nop,
    Add(i64),
    Sub(i64),
    Mul(i64),
    Jump(usize),
    Halt,
}

impl Instruction {
    /// Three-letter mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Nop => "nop",
            Instruction::Add(_) => "add",
            Instruction::Sub(_) => "sub",
            Instruction::Mul(_) => "mul",
            Instruction::Jump(_) => "jmp",
            Instruction::Halt => "hlt",
        }
    }

    /// Apply this instruction to a score.
    ///
    /// Only `add`, `sub` and `mul` touch the score. Arithmetic saturates at
    /// the `i64` bounds since repeated `mul 100` overflows quickly.
    pub fn apply(&self, score: i64) -> i64 {
        match *self {
            Instruction::Add(v) => score.saturating_add(v),
            Instruction::Sub(v) => score.saturating_sub(v),
            Instruction::Mul(v) => score.saturating_mul(v),
            Instruction::Nop | Instruction::Jump(_) | Instruction::Halt => score,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Add(v) | Instruction::Sub(v) | Instruction::Mul(v) => {
                write!(f, "{} {v}", self.mnemonic())
            }
            Instruction::Jump(target) => write!(f, "{} {target}", self.mnemonic()),
            Instruction::Nop | Instruction::Halt => f.write_str(self.mnemonic()),
        }
    }
}

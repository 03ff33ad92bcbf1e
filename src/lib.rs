pub mod error;
pub mod instruction;
pub mod tape;
pub mod grid;
pub mod render;
pub mod dice;
pub mod engine;
pub mod session;

pub use error::{Error, Result};
pub use instruction::Instruction;
pub use tape::{GeneratorConfig, Tape, TapeGenerator, Weights, generate};
pub use engine::{Engine, EngineState, Status, StepReport};
pub use session::{Session, SessionConfig};

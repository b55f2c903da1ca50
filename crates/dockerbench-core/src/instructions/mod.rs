pub mod index;
pub mod model;

pub use model::{Instruction, InstructionSet};

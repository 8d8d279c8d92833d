//! Bytecode data structures.
//!
//! - [`OpCode`] - the instruction set and its static properties
//! - [`Instruction`] / [`Element`] - finalized instructions and label markers
//! - [`FinalizedSequence`] - a resolved instruction sequence
//! - [`ConstantPool`] / [`NamePool`] - per-unit operand pools

mod constant;
mod instruction;
mod names;
mod opcode;
mod sequence;
mod stack;

pub use constant::{Constant, ConstantPool};
pub use instruction::{Element, Instruction, Label, Oparg, Operand};
pub use names::NamePool;
pub use opcode::{OpCode, OpFlags};
pub use sequence::FinalizedSequence;

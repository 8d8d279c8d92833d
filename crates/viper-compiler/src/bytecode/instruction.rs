//! Instructions, labels and sequence elements.

use std::fmt;

use super::OpCode;

/// A symbolic jump target.
///
/// Created by the emitter before its position is known, referenced by jump
/// instructions, and placed exactly once. Ids are allocated in creation
/// order and never reused within one emitter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub(crate) u32);

impl Label {
    /// The label's id.
    #[inline]
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Operand handed to the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// No operand.
    None,
    /// Integer operand (pool index, count or operator code).
    Arg(u32),
    /// Jump target, resolved when the sequence is finalized.
    Label(Label),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => write!(f, "none"),
            Operand::Arg(arg) => write!(f, "{}", arg),
            Operand::Label(label) => write!(f, "{}", label),
        }
    }
}

/// Operand of a finalized instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Oparg {
    /// No operand.
    None,
    /// Integer operand.
    Arg(u32),
    /// Index of the target label's marker in the finalized sequence.
    Target(usize),
}

impl Oparg {
    /// Integer value for stack accounting (jump targets count as zero).
    #[inline]
    pub fn value(self) -> u32 {
        match self {
            Oparg::Arg(arg) => arg,
            Oparg::None | Oparg::Target(_) => 0,
        }
    }

    /// The integer operand, if any.
    #[inline]
    pub fn arg(self) -> Option<u32> {
        match self {
            Oparg::Arg(arg) => Some(arg),
            _ => None,
        }
    }

    /// The jump target, if any.
    #[inline]
    pub fn target(self) -> Option<usize> {
        match self {
            Oparg::Target(index) => Some(index),
            _ => None,
        }
    }
}

/// A finalized instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// The opcode.
    pub opcode: OpCode,
    /// The resolved operand.
    pub oparg: Oparg,
    /// Source line, or `None` for compiler-synthesized bookkeeping.
    pub line: Option<u32>,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(opcode: OpCode, oparg: Oparg, line: Option<u32>) -> Self {
        Self {
            opcode,
            oparg,
            line,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<20}", self.opcode.name())?;
        match self.oparg {
            Oparg::None => write!(f, "{:>6}", "")?,
            Oparg::Arg(arg) => write!(f, "{:>6}", arg)?,
            Oparg::Target(index) => write!(f, "{:>6}", format!("-> {}", index))?,
        }
        if let Some(line) = self.line {
            write!(f, "  line {}", line)?;
        }
        Ok(())
    }
}

/// One element of a finalized sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// An instruction.
    Instr(Instruction),
    /// Marker for the position a label was placed at.
    Label(Label),
}

impl Element {
    /// The instruction, if this element is one.
    #[inline]
    pub fn as_instruction(&self) -> Option<&Instruction> {
        match self {
            Element::Instr(instr) => Some(instr),
            Element::Label(_) => None,
        }
    }

    /// The label, if this element is a marker.
    #[inline]
    pub fn as_label(&self) -> Option<Label> {
        match self {
            Element::Label(label) => Some(*label),
            Element::Instr(_) => None,
        }
    }
}

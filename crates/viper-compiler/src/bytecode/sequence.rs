//! Finalized instruction sequences.
//!
//! A [`FinalizedSequence`] is what the emitter hands back once every label
//! reference has been resolved. Label markers stay in the sequence so jump
//! operands can name them by element index; a target is therefore always a
//! valid index even when the label sits after the last instruction.

use std::fmt;

use xxhash_rust::xxh64::Xxh64;

use super::{Element, Instruction, OpCode, Oparg};
use viper_core::Result;

/// An ordered, fully resolved instruction sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FinalizedSequence {
    elements: Vec<Element>,
}

impl FinalizedSequence {
    pub(crate) fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// All elements, labels included.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements, labels included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// Iterate the instructions, skipping label markers.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.elements.iter().filter_map(Element::as_instruction)
    }

    /// Number of instructions.
    pub fn instruction_count(&self) -> usize {
        self.instructions().count()
    }

    /// The opcodes in order, skipping label markers.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.instructions().map(|instr| instr.opcode).collect()
    }

    /// Jump target of the instruction at element `index`, if it is a jump.
    pub fn jump_target(&self, index: usize) -> Option<usize> {
        self.elements
            .get(index)
            .and_then(Element::as_instruction)
            .and_then(|instr| instr.oparg.target())
    }

    /// Assert the instruction opcodes match exactly.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual, expected,
            "opcode mismatch\nexpected: {:?}\nactual:   {:?}\n\n{}",
            expected, actual, self
        );
    }

    /// Assert `expected` appears as a contiguous run of opcodes.
    #[track_caller]
    pub fn assert_contains_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        let found = expected.is_empty() || actual.windows(expected.len()).any(|w| w == expected);
        assert!(found, "opcode run {:?} not found in\n{}", expected, self);
    }

    /// Deterministic 64-bit hash of the sequence.
    ///
    /// Two sequences with equal elements always hash equal, across runs and
    /// across threads.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        for element in &self.elements {
            match element {
                Element::Label(label) => {
                    hasher.update(&[0xff]);
                    hasher.update(&label.id().to_le_bytes());
                }
                Element::Instr(instr) => {
                    hasher.update(&[u8::from(instr.opcode)]);
                    match instr.oparg {
                        Oparg::None => hasher.update(&[0]),
                        Oparg::Arg(arg) => {
                            hasher.update(&[1]);
                            hasher.update(&arg.to_le_bytes());
                        }
                        Oparg::Target(index) => {
                            hasher.update(&[2]);
                            hasher.update(&(index as u64).to_le_bytes());
                        }
                    }
                    match instr.line {
                        Some(line) => {
                            hasher.update(&[1]);
                            hasher.update(&line.to_le_bytes());
                        }
                        None => hasher.update(&[0]),
                    }
                }
            }
        }
        hasher.digest()
    }

    /// Maximum operand-stack depth reached on any path.
    ///
    /// Fails when some path pops an empty stack or when two paths reach the
    /// same element with different depths.
    pub fn max_stack_depth(&self) -> Result<u32> {
        super::stack::max_stack_depth(&self.elements)
    }
}

impl fmt::Display for FinalizedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, element) in self.elements.iter().enumerate() {
            match element {
                Element::Label(label) => writeln!(f, "{:>4}  {}:", index, label)?,
                Element::Instr(instr) => writeln!(f, "{:>4}    {}", index, instr)?,
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FinalizedSequence {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

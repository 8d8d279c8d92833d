//! Instruction emitter with symbolic labels.
//!
//! The [`Emitter`] accumulates instructions and label markers for one unit.
//! Jumps name a [`Label`] that may not be placed yet; [`Emitter::resolve`]
//! turns every label reference into the element index of the label's marker.
//!
//! # Example
//!
//! ```
//! use viper_compiler::bytecode::{OpCode, Oparg};
//! use viper_compiler::{CodegenConfig, Emitter};
//!
//! let mut emitter = Emitter::new();
//! let skip = emitter.new_label();
//!
//! emitter.emit_arg(OpCode::LoadConst, 0, Some(1))?;
//! emitter.emit_jump(OpCode::PopJumpIfFalse, skip, Some(1))?;
//! emitter.emit_op(OpCode::Nop, Some(2))?;
//! emitter.place(skip)?;
//!
//! let seq = emitter.resolve(&CodegenConfig::default())?;
//! assert_eq!(seq.jump_target(1), Some(3));
//! # Ok::<(), viper_core::CodegenError>(())
//! ```

mod labels;
mod loops;

pub use labels::Origin;
pub(crate) use loops::{LoopKind, LoopStack};

use tracing::{debug, trace};
use viper_core::{CodegenError, Result, Span};

use crate::bytecode::{Element, FinalizedSequence, Instruction, Label, OpCode, Oparg, Operand};
use crate::config::CodegenConfig;
use labels::LabelTable;

/// An element before label resolution.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Instr {
        opcode: OpCode,
        operand: Operand,
        line: Option<u32>,
    },
    Label(Label),
}

/// A point in emission that can be returned to with [`Emitter::rollback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    elements: usize,
    labels: usize,
    instructions: usize,
    origin: Option<Origin>,
}

impl Checkpoint {
    /// Number of labels that existed when the checkpoint was taken.
    pub(crate) fn label_count(&self) -> u32 {
        self.labels as u32
    }
}

/// Emits instructions for a single unit.
#[derive(Debug, Default)]
pub struct Emitter {
    elements: Vec<Pending>,
    labels: LabelTable,
    /// Construct currently being compiled, for diagnostics.
    origin: Option<Origin>,
    instruction_count: usize,
}

impl Emitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the construct now being compiled.
    ///
    /// Labels created afterwards and errors raised afterwards point at it.
    pub fn set_origin(&mut self, construct: &'static str, span: Span) {
        self.origin = Some(Origin { construct, span });
    }

    /// The construct currently being compiled.
    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    /// Reinstate an origin saved with [`Emitter::origin`].
    pub fn restore_origin(&mut self, origin: Option<Origin>) {
        self.origin = origin;
    }

    // ==========================================================================
    // Labels
    // ==========================================================================

    /// Create a fresh, unplaced label attributed to the current origin.
    pub fn new_label(&mut self) -> Label {
        self.labels.create(self.origin)
    }

    /// Create a fresh, unplaced label attributed to `construct`.
    pub fn new_label_for(&mut self, construct: &'static str, span: Span) -> Label {
        self.labels.create(Some(Origin { construct, span }))
    }

    /// Bind `label` to the position of the next emitted instruction.
    ///
    /// Placing the same label twice fails with
    /// [`CodegenError::DuplicatePlacement`].
    pub fn place(&mut self, label: Label) -> Result<()> {
        if !self.labels.contains(label) {
            return Err(CodegenError::UnresolvedLabel {
                label: label.id(),
                construct: None,
                span: self.origin_span(),
            });
        }
        let at = self.elements.len();
        if !self.labels.place(label, at) {
            return Err(CodegenError::DuplicatePlacement {
                label: label.id(),
                span: self.origin_span(),
            });
        }
        self.elements.push(Pending::Label(label));
        Ok(())
    }

    /// Whether `label` has been placed.
    pub fn is_placed(&self, label: Label) -> bool {
        self.labels.placement(label).is_some()
    }

    /// Number of labels created and not discarded by a rollback.
    pub fn label_count(&self) -> usize {
        self.labels.live_count()
    }

    // ==========================================================================
    // Emission
    // ==========================================================================

    /// Append an instruction.
    ///
    /// The operand must fit the opcode: none for argument-less opcodes, a
    /// label for jumps, an integer for everything else. A mismatch fails
    /// with [`CodegenError::InvalidOperand`].
    pub fn emit(&mut self, opcode: OpCode, operand: Operand, line: Option<u32>) -> Result<()> {
        let valid = match operand {
            Operand::None => !opcode.has_arg(),
            Operand::Arg(_) => opcode.has_arg() && !opcode.is_jump(),
            Operand::Label(label) => opcode.is_jump() && self.labels.contains(label),
        };
        if !valid {
            return Err(CodegenError::InvalidOperand {
                opcode: opcode.name(),
                operand: operand.to_string(),
                span: self.origin_span(),
            });
        }

        if let Operand::Label(label) = operand {
            self.labels.mark_referenced(label);
        }
        self.elements.push(Pending::Instr {
            opcode,
            operand,
            line,
        });
        self.instruction_count += 1;
        Ok(())
    }

    /// Emit an opcode with no operand.
    pub fn emit_op(&mut self, opcode: OpCode, line: Option<u32>) -> Result<()> {
        self.emit(opcode, Operand::None, line)
    }

    /// Emit an opcode with an integer operand.
    pub fn emit_arg(&mut self, opcode: OpCode, arg: u32, line: Option<u32>) -> Result<()> {
        self.emit(opcode, Operand::Arg(arg), line)
    }

    /// Emit a jump to `label`.
    pub fn emit_jump(&mut self, opcode: OpCode, label: Label, line: Option<u32>) -> Result<()> {
        self.emit(opcode, Operand::Label(label), line)
    }

    /// Number of instructions emitted (labels excluded).
    pub fn len(&self) -> usize {
        self.instruction_count
    }

    /// Whether no instruction has been emitted.
    pub fn is_empty(&self) -> bool {
        self.instruction_count == 0
    }

    /// Opcodes emitted so far, in order.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Pending::Instr { opcode, .. } => Some(*opcode),
                Pending::Label(_) => None,
            })
            .collect()
    }

    // ==========================================================================
    // Rollback
    // ==========================================================================

    /// Capture the current position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            elements: self.elements.len(),
            labels: self.labels.len(),
            instructions: self.instruction_count,
            origin: self.origin,
        }
    }

    /// Discard everything emitted, placed, or created since `checkpoint`.
    ///
    /// Labels created since then are invalidated, never handed out again.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.elements.truncate(checkpoint.elements);
        self.instruction_count = checkpoint.instructions;
        self.origin = checkpoint.origin;
        self.labels.rollback(checkpoint.labels, checkpoint.elements);
        for element in &self.elements {
            if let Pending::Instr {
                operand: Operand::Label(label),
                ..
            } = element
            {
                self.labels.mark_referenced(*label);
            }
        }
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Resolve every label reference and produce the finalized sequence.
    ///
    /// Each jump operand becomes the element index of its label's marker.
    /// Markers of labels no jump names are dropped unless
    /// [`CodegenConfig::retain_unused_labels`] is set. A referenced label that
    /// was never placed fails with [`CodegenError::UnresolvedLabel`].
    ///
    /// Resolution does not consume the emitter; resolving twice yields equal
    /// sequences.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, config: &CodegenConfig) -> Result<FinalizedSequence> {
        let mut out = Vec::with_capacity(self.elements.len());
        let mut positions: Vec<Option<usize>> = vec![None; self.labels.len()];
        let mut fixups: Vec<(usize, Label)> = Vec::new();

        for element in &self.elements {
            match *element {
                Pending::Label(label) => {
                    if config.retain_unused_labels || self.labels.is_referenced(label) {
                        positions[label.0 as usize] = Some(out.len());
                        out.push(Element::Label(label));
                    }
                }
                Pending::Instr {
                    opcode,
                    operand,
                    line,
                } => {
                    let oparg = match operand {
                        Operand::None => Oparg::None,
                        Operand::Arg(arg) => Oparg::Arg(arg),
                        Operand::Label(label) => {
                            fixups.push((out.len(), label));
                            Oparg::Target(usize::MAX)
                        }
                    };
                    out.push(Element::Instr(Instruction::new(opcode, oparg, line)));
                }
            }
        }

        for (index, label) in fixups {
            let Some(target) = positions[label.0 as usize] else {
                let origin = self.labels.origin(label);
                return Err(CodegenError::UnresolvedLabel {
                    label: label.id(),
                    construct: origin.map(|o| o.construct),
                    span: origin.map(|o| o.span),
                });
            };
            trace!(%label, index, target, "resolved jump");
            if let Element::Instr(instr) = &mut out[index] {
                instr.oparg = Oparg::Target(target);
            }
        }

        debug!(
            elements = out.len(),
            instructions = self.instruction_count,
            labels = self.labels.len(),
            "finalized sequence"
        );
        Ok(FinalizedSequence::from_elements(out))
    }

    /// Resolve and discard the emitter.
    pub fn finish(self, config: &CodegenConfig) -> Result<FinalizedSequence> {
        self.resolve(config)
    }

    fn origin_span(&self) -> Option<Span> {
        self.origin.map(|origin| origin.span)
    }
}

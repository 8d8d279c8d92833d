//! Instruction opcodes.
//!
//! The machine is stack based. Every opcode carries a fixed [`OpFlags`] set
//! describing its operand shape and its effect on control flow, plus a
//! canonical upper-case mnemonic used in listings and test expectations.

use std::fmt;

use bitflags::bitflags;
use lazy_static::lazy_static;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use rustc_hash::FxHashMap;

bitflags! {
    /// Static properties of an opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpFlags: u8 {
        /// Takes an operand.
        const HAS_ARG = 1 << 0;
        /// May transfer control to a label; the operand is a label.
        const JUMP = 1 << 1;
        /// Control never falls through to the next instruction.
        const TERMINATOR = 1 << 2;
        /// Operand indexes the constant pool.
        const CONST_ARG = 1 << 3;
        /// Operand indexes the name pool.
        const NAME_ARG = 1 << 4;
    }
}

/// Bytecode operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Entry and stack manipulation
    // =========================================================================
    /// Does nothing.
    Nop = 0,
    /// Entry marker at the start of every unit.
    Resume,
    /// Discard the top of stack.
    PopTop,
    /// Push the null sentinel that precedes a plain callable.
    PushNull,
    /// Push a copy of the n-th item (1 = top).
    /// Operand: depth
    Copy,
    /// Swap the top of stack with the n-th item.
    /// Operand: depth
    Swap,

    // =========================================================================
    // Loads and stores
    // =========================================================================
    /// Push a constant.
    /// Operand: constant pool index
    LoadConst,
    /// Push the value bound to a name.
    /// Operand: name pool index
    LoadName,
    /// Pop and bind to a name.
    /// Operand: name pool index
    StoreName,
    /// Replace an object with one of its attributes.
    /// Operand: name pool index
    LoadAttr,
    /// Pop an object and a value, storing the value as an attribute.
    /// Operand: name pool index
    StoreAttr,
    /// Replace an object with a bound method and the object itself.
    /// Operand: name pool index
    LoadMethod,
    /// Pop container and key, push the item.
    BinarySubscr,
    /// Pop value, container and key, storing the item.
    StoreSubscr,

    // =========================================================================
    // Operators
    // =========================================================================
    /// Binary arithmetic or bitwise operation.
    /// Operand: operator code (in-place variants add 13)
    BinaryOp,
    /// Arithmetic negation.
    UnaryNegative,
    /// Logical negation.
    UnaryNot,
    /// Bitwise inversion.
    UnaryInvert,
    /// Unary plus.
    UnaryPositive,
    /// Rich comparison.
    /// Operand: comparison code
    CompareOp,
    /// Identity test.
    /// Operand: 1 when inverted (`is not`)
    IsOp,
    /// Membership test.
    /// Operand: 1 when inverted (`not in`)
    ContainsOp,

    // =========================================================================
    // Sequences
    // =========================================================================
    /// Pop n items, push a list.
    /// Operand: item count
    BuildList,
    /// Pop n items, push a tuple.
    /// Operand: item count
    BuildTuple,
    /// Pop a sequence, push its n items with the first on top.
    /// Operand: item count
    UnpackSequence,

    // =========================================================================
    // Calls
    // =========================================================================
    /// Call with positional arguments.
    /// Operand: argument count
    Call,
    /// Call with a trailing tuple of keyword names.
    /// Operand: total argument count
    CallKw,
    /// Pop a function's code object, push the function.
    MakeFunction,
    /// Return the top of stack.
    ReturnValue,
    /// Return a constant.
    /// Operand: constant pool index
    ReturnConst,

    // =========================================================================
    // Iteration and control flow
    // =========================================================================
    /// Replace an iterable with its iterator.
    GetIter,
    /// Push the next item, or jump to the label when exhausted.
    /// Operand: label
    ForIter,
    /// Pop the exhausted iterator and its sentinel.
    EndFor,
    /// Unconditional jump.
    /// Operand: label
    Jump,
    /// Pop and jump when false.
    /// Operand: label
    PopJumpIfFalse,
    /// Pop and jump when true.
    /// Operand: label
    PopJumpIfTrue,
}

lazy_static! {
    static ref OPCODES_BY_NAME: FxHashMap<&'static str, OpCode> =
        OpCode::ALL.iter().map(|&op| (op.name(), op)).collect();
}

impl OpCode {
    /// Every opcode, in encoding order.
    pub const ALL: [OpCode; 36] = [
        OpCode::Nop,
        OpCode::Resume,
        OpCode::PopTop,
        OpCode::PushNull,
        OpCode::Copy,
        OpCode::Swap,
        OpCode::LoadConst,
        OpCode::LoadName,
        OpCode::StoreName,
        OpCode::LoadAttr,
        OpCode::StoreAttr,
        OpCode::LoadMethod,
        OpCode::BinarySubscr,
        OpCode::StoreSubscr,
        OpCode::BinaryOp,
        OpCode::UnaryNegative,
        OpCode::UnaryNot,
        OpCode::UnaryInvert,
        OpCode::UnaryPositive,
        OpCode::CompareOp,
        OpCode::IsOp,
        OpCode::ContainsOp,
        OpCode::BuildList,
        OpCode::BuildTuple,
        OpCode::UnpackSequence,
        OpCode::Call,
        OpCode::CallKw,
        OpCode::MakeFunction,
        OpCode::ReturnValue,
        OpCode::ReturnConst,
        OpCode::GetIter,
        OpCode::ForIter,
        OpCode::EndFor,
        OpCode::Jump,
        OpCode::PopJumpIfFalse,
        OpCode::PopJumpIfTrue,
    ];

    /// Convert from u8, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Look up an opcode by its mnemonic (`"LOAD_CONST"`).
    pub fn from_name(name: &str) -> Option<Self> {
        OPCODES_BY_NAME.get(name).copied()
    }

    /// The canonical mnemonic.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Nop => "NOP",
            OpCode::Resume => "RESUME",
            OpCode::PopTop => "POP_TOP",
            OpCode::PushNull => "PUSH_NULL",
            OpCode::Copy => "COPY",
            OpCode::Swap => "SWAP",
            OpCode::LoadConst => "LOAD_CONST",
            OpCode::LoadName => "LOAD_NAME",
            OpCode::StoreName => "STORE_NAME",
            OpCode::LoadAttr => "LOAD_ATTR",
            OpCode::StoreAttr => "STORE_ATTR",
            OpCode::LoadMethod => "LOAD_METHOD",
            OpCode::BinarySubscr => "BINARY_SUBSCR",
            OpCode::StoreSubscr => "STORE_SUBSCR",
            OpCode::BinaryOp => "BINARY_OP",
            OpCode::UnaryNegative => "UNARY_NEGATIVE",
            OpCode::UnaryNot => "UNARY_NOT",
            OpCode::UnaryInvert => "UNARY_INVERT",
            OpCode::UnaryPositive => "UNARY_POSITIVE",
            OpCode::CompareOp => "COMPARE_OP",
            OpCode::IsOp => "IS_OP",
            OpCode::ContainsOp => "CONTAINS_OP",
            OpCode::BuildList => "BUILD_LIST",
            OpCode::BuildTuple => "BUILD_TUPLE",
            OpCode::UnpackSequence => "UNPACK_SEQUENCE",
            OpCode::Call => "CALL",
            OpCode::CallKw => "CALL_KW",
            OpCode::MakeFunction => "MAKE_FUNCTION",
            OpCode::ReturnValue => "RETURN_VALUE",
            OpCode::ReturnConst => "RETURN_CONST",
            OpCode::GetIter => "GET_ITER",
            OpCode::ForIter => "FOR_ITER",
            OpCode::EndFor => "END_FOR",
            OpCode::Jump => "JUMP",
            OpCode::PopJumpIfFalse => "POP_JUMP_IF_FALSE",
            OpCode::PopJumpIfTrue => "POP_JUMP_IF_TRUE",
        }
    }

    /// Static properties of this opcode.
    pub fn flags(self) -> OpFlags {
        match self {
            OpCode::Nop
            | OpCode::Resume
            | OpCode::PopTop
            | OpCode::PushNull
            | OpCode::BinarySubscr
            | OpCode::StoreSubscr
            | OpCode::UnaryNegative
            | OpCode::UnaryNot
            | OpCode::UnaryInvert
            | OpCode::UnaryPositive
            | OpCode::MakeFunction
            | OpCode::GetIter
            | OpCode::EndFor => OpFlags::empty(),

            OpCode::Copy
            | OpCode::Swap
            | OpCode::BinaryOp
            | OpCode::CompareOp
            | OpCode::IsOp
            | OpCode::ContainsOp
            | OpCode::BuildList
            | OpCode::BuildTuple
            | OpCode::UnpackSequence
            | OpCode::Call
            | OpCode::CallKw => OpFlags::HAS_ARG,

            OpCode::LoadConst => OpFlags::HAS_ARG | OpFlags::CONST_ARG,
            OpCode::ReturnConst => OpFlags::HAS_ARG | OpFlags::CONST_ARG | OpFlags::TERMINATOR,

            OpCode::LoadName
            | OpCode::StoreName
            | OpCode::LoadAttr
            | OpCode::StoreAttr
            | OpCode::LoadMethod => OpFlags::HAS_ARG | OpFlags::NAME_ARG,

            OpCode::ReturnValue => OpFlags::TERMINATOR,

            OpCode::ForIter | OpCode::PopJumpIfFalse | OpCode::PopJumpIfTrue => {
                OpFlags::HAS_ARG | OpFlags::JUMP
            }
            OpCode::Jump => OpFlags::HAS_ARG | OpFlags::JUMP | OpFlags::TERMINATOR,
        }
    }

    /// Whether this opcode takes an operand.
    #[inline]
    pub fn has_arg(self) -> bool {
        self.flags().contains(OpFlags::HAS_ARG)
    }

    /// Whether this opcode may take a label operand.
    #[inline]
    pub fn is_jump(self) -> bool {
        self.flags().contains(OpFlags::JUMP)
    }

    /// Whether control never falls through past this opcode.
    #[inline]
    pub fn is_terminator(self) -> bool {
        self.flags().contains(OpFlags::TERMINATOR)
    }

    /// Number of stack items this opcode reads and removes.
    ///
    /// `arg` is the instruction's integer operand (ignored when the opcode
    /// takes none or takes a label).
    pub fn pops(self, arg: u32) -> u32 {
        match self {
            OpCode::Nop
            | OpCode::Resume
            | OpCode::PushNull
            | OpCode::LoadConst
            | OpCode::LoadName
            | OpCode::ReturnConst
            | OpCode::Jump => 0,

            OpCode::PopTop
            | OpCode::StoreName
            | OpCode::LoadAttr
            | OpCode::LoadMethod
            | OpCode::UnaryNegative
            | OpCode::UnaryNot
            | OpCode::UnaryInvert
            | OpCode::UnaryPositive
            | OpCode::UnpackSequence
            | OpCode::MakeFunction
            | OpCode::ReturnValue
            | OpCode::GetIter
            | OpCode::ForIter
            | OpCode::PopJumpIfFalse
            | OpCode::PopJumpIfTrue => 1,

            OpCode::StoreAttr
            | OpCode::BinarySubscr
            | OpCode::BinaryOp
            | OpCode::CompareOp
            | OpCode::IsOp
            | OpCode::ContainsOp
            | OpCode::EndFor => 2,

            OpCode::StoreSubscr => 3,

            OpCode::Copy | OpCode::Swap | OpCode::BuildList | OpCode::BuildTuple => arg,
            OpCode::Call => arg + 2,
            OpCode::CallKw => arg + 3,
        }
    }

    /// Number of stack items this opcode pushes.
    ///
    /// Conditional jumps leave the same depth on both edges, so one count
    /// covers the fall-through and the branch taken.
    pub fn pushes(self, arg: u32) -> u32 {
        match self {
            OpCode::Nop
            | OpCode::Resume
            | OpCode::PopTop
            | OpCode::StoreName
            | OpCode::StoreAttr
            | OpCode::StoreSubscr
            | OpCode::ReturnValue
            | OpCode::ReturnConst
            | OpCode::EndFor
            | OpCode::Jump
            | OpCode::PopJumpIfFalse
            | OpCode::PopJumpIfTrue => 0,

            OpCode::PushNull
            | OpCode::LoadConst
            | OpCode::LoadName
            | OpCode::LoadAttr
            | OpCode::BinarySubscr
            | OpCode::BinaryOp
            | OpCode::UnaryNegative
            | OpCode::UnaryNot
            | OpCode::UnaryInvert
            | OpCode::UnaryPositive
            | OpCode::CompareOp
            | OpCode::IsOp
            | OpCode::ContainsOp
            | OpCode::BuildList
            | OpCode::BuildTuple
            | OpCode::Call
            | OpCode::CallKw
            | OpCode::MakeFunction
            | OpCode::GetIter => 1,

            // The exhausted edge leaves the iterator and a sentinel for END_FOR.
            OpCode::LoadMethod | OpCode::ForIter => 2,

            OpCode::Swap | OpCode::UnpackSequence => arg,
            OpCode::Copy => arg + 1,
        }
    }

    /// Net change in stack depth.
    pub fn stack_effect(self, arg: u32) -> i32 {
        self.pushes(arg) as i32 - self.pops(arg) as i32
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

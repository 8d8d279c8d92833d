//! Error types for code generation.
//!
//! Every failure is fatal to the compilation unit that raised it. Errors that
//! trace back to one AST node carry that node's [`Span`]; errors raised by the
//! emitter carry the location of the construct that was being compiled when
//! it is known.
//!
//! ```text
//! CodegenError
//! ├── UnsupportedConstruct  - AST node kind with no translation
//! ├── DuplicatePlacement    - label placed twice
//! ├── InvalidOperand        - operand that does not fit the opcode
//! ├── UnresolvedLabel       - label referenced but never placed
//! ├── OutsideLoop           - break/continue with no enclosing loop
//! ├── ReturnOutsideFunction - return at module level
//! ├── InvalidTarget         - expression that cannot be assigned to
//! ├── StackUnderflow        - stack analysis popped an empty stack
//! └── InconsistentStack     - two paths reach an element with different depths
//! ```

use thiserror::Error;

use crate::Span;

/// Result alias used throughout the code generator.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors raised while generating or checking an instruction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// An AST node kind has no registered translation.
    #[error("at {span}: unsupported construct '{kind}'")]
    UnsupportedConstruct {
        /// The node kind, e.g. `"lambda"`.
        kind: &'static str,
        /// Where the node starts.
        span: Span,
    },

    /// A label was placed a second time.
    #[error("label L{label} placed twice{}", span_suffix(.span))]
    DuplicatePlacement {
        /// The label id.
        label: u32,
        /// The construct being compiled during the second placement.
        span: Option<Span>,
    },

    /// An operand that does not fit the opcode's shape, such as a label on
    /// an opcode that does not transfer control.
    #[error("opcode {opcode} cannot take operand {operand}{}", span_suffix(.span))]
    InvalidOperand {
        /// The offending opcode's name.
        opcode: &'static str,
        /// The rejected operand, rendered (`L3`, `7`, `none`).
        operand: String,
        /// The construct being compiled.
        span: Option<Span>,
    },

    /// A label used as a jump operand was never placed.
    #[error("label L{label} is never placed{}{}", origin_suffix(.construct), span_suffix(.span))]
    UnresolvedLabel {
        /// The label id.
        label: u32,
        /// Kind of the construct that created the label, if known.
        construct: Option<&'static str>,
        /// Location of that construct, if known.
        span: Option<Span>,
    },

    /// `break` or `continue` used outside of a loop.
    #[error("at {span}: '{keyword}' outside loop")]
    OutsideLoop {
        /// `"break"` or `"continue"`.
        keyword: &'static str,
        /// Where the statement occurs.
        span: Span,
    },

    /// `return` used outside of a function body.
    #[error("at {span}: 'return' outside function")]
    ReturnOutsideFunction {
        /// Where the statement occurs.
        span: Span,
    },

    /// An expression that cannot be the target of an assignment.
    #[error("at {span}: cannot assign to {kind}")]
    InvalidTarget {
        /// The expression kind used as a target.
        kind: &'static str,
        /// Where the target expression starts.
        span: Span,
    },

    /// Stack analysis found an instruction popping more values than are present.
    #[error("stack underflow at element {index}")]
    StackUnderflow {
        /// Index of the offending element in the finalized sequence.
        index: usize,
    },

    /// Two control-flow paths reach the same element with different stack depths.
    #[error("inconsistent stack depth at element {index}: {expected} vs {found}")]
    InconsistentStack {
        /// Index of the element reached twice.
        index: usize,
        /// Depth recorded by the first path.
        expected: u32,
        /// Depth carried by the second path.
        found: u32,
    },
}

impl CodegenError {
    /// Get the source location this error traces back to, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            CodegenError::UnsupportedConstruct { span, .. }
            | CodegenError::OutsideLoop { span, .. }
            | CodegenError::ReturnOutsideFunction { span }
            | CodegenError::InvalidTarget { span, .. } => Some(*span),
            CodegenError::DuplicatePlacement { span, .. }
            | CodegenError::InvalidOperand { span, .. }
            | CodegenError::UnresolvedLabel { span, .. } => *span,
            CodegenError::StackUnderflow { .. } | CodegenError::InconsistentStack { .. } => None,
        }
    }

    /// Get the source line this error traces back to, if any.
    pub fn line(&self) -> Option<u32> {
        self.span().map(|span| span.line)
    }

    /// Whether this error comes from label bookkeeping rather than from the AST.
    pub fn is_label_error(&self) -> bool {
        matches!(
            self,
            CodegenError::DuplicatePlacement { .. }
                | CodegenError::InvalidOperand { .. }
                | CodegenError::UnresolvedLabel { .. }
        )
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    match span {
        Some(span) => format!(" (at {})", span),
        None => String::new(),
    }
}

fn origin_suffix(construct: &Option<&'static str>) -> String {
    match construct {
        Some(kind) => format!(" (created by {})", kind),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_construct_message() {
        let err = CodegenError::UnsupportedConstruct {
            kind: "lambda",
            span: Span::new(4, 9, 6),
        };
        assert_eq!(err.to_string(), "at 4:9: unsupported construct 'lambda'");
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn unresolved_label_names_label_and_construct() {
        let err = CodegenError::UnresolvedLabel {
            label: 3,
            construct: Some("if expression"),
            span: Some(Span::line(2)),
        };
        assert_eq!(
            err.to_string(),
            "label L3 is never placed (created by if expression) (at 2:1)"
        );
        assert!(err.is_label_error());
    }

    #[test]
    fn unresolved_label_without_origin() {
        let err = CodegenError::UnresolvedLabel {
            label: 0,
            construct: None,
            span: None,
        };
        assert_eq!(err.to_string(), "label L0 is never placed");
        assert_eq!(err.span(), None);
    }

    #[test]
    fn duplicate_placement_message() {
        let err = CodegenError::DuplicatePlacement {
            label: 1,
            span: None,
        };
        assert_eq!(err.to_string(), "label L1 placed twice");
    }

    #[test]
    fn invalid_operand_message() {
        let err = CodegenError::InvalidOperand {
            opcode: "LOAD_CONST",
            operand: "L2".to_string(),
            span: Some(Span::line(3)),
        };
        assert_eq!(
            err.to_string(),
            "opcode LOAD_CONST cannot take operand L2 (at 3:1)"
        );
        assert!(err.is_label_error());
    }

    #[test]
    fn outside_loop_is_not_label_error() {
        let err = CodegenError::OutsideLoop {
            keyword: "break",
            span: Span::line(5),
        };
        assert_eq!(err.to_string(), "at 5:1: 'break' outside loop");
        assert!(!err.is_label_error());
    }

    #[test]
    fn stack_errors_have_no_span() {
        let err = CodegenError::InconsistentStack {
            index: 7,
            expected: 1,
            found: 2,
        };
        assert_eq!(err.span(), None);
        assert_eq!(
            err.to_string(),
            "inconsistent stack depth at element 7: 1 vs 2"
        );
    }
}

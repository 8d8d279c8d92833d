//! Abstract syntax tree consumed by the viper code generator.
//!
//! All nodes are allocated in a [`bumpalo::Bump`] arena and borrow from it for
//! the `'ast` lifetime. The parser that normally produces these trees lives
//! outside this workspace; [`AstBuilder`] constructs them directly.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use viper_ast::AstBuilder;
//!
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//!
//! // for x in l:
//! //     print(x)
//! let module = b.module(&[b.for_(
//!     b.name("x", 1),
//!     b.name("l", 1),
//!     &[b.expr_stmt(b.call(b.name("print", 2), &[b.name("x", 2)], 2))],
//!     &[],
//!     1,
//! )]);
//! assert_eq!(module.body().len(), 1);
//! ```

mod builder;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use builder::AstBuilder;
pub use expr::*;
pub use ops::*;
pub use stmt::*;

use viper_core::Span;

/// A module: the root of one source file.
///
/// Borrows its statements from the arena they were allocated in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Module<'ast> {
    body: &'ast [Stmt<'ast>],
    span: Span,
}

impl<'ast> Module<'ast> {
    /// Create a module from its top-level statements.
    pub fn new(body: &'ast [Stmt<'ast>], span: Span) -> Self {
        Self { body, span }
    }

    /// Get the top-level statements.
    pub fn body(&self) -> &'ast [Stmt<'ast>] {
        self.body
    }

    /// Get the source location span of this module.
    pub fn span(&self) -> Span {
        self.span
    }
}

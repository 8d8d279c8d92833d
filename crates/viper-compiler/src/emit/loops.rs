//! Loop context tracking for break/continue.
//!
//! Each entry remembers where `continue` jumps to and, once some `break`
//! needs it, the label that ends the loop. Break labels are created lazily so
//! loops without a `break` leave no dead label behind.

use crate::bytecode::Label;

/// The kind of an enclosing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    /// `for` loop; its iterator sits on the stack for the whole body.
    For,
    /// `while` loop.
    While,
}

/// Context for a single loop.
#[derive(Debug, Clone, Copy)]
struct LoopContext {
    kind: LoopKind,
    /// Loop head; target of `continue`.
    continue_label: Label,
    /// Loop exit; target of `break`, created on first use.
    break_label: Option<Label>,
}

/// Stack of enclosing loops (innermost last).
#[derive(Debug, Default)]
pub struct LoopStack {
    loops: Vec<LoopContext>,
}

impl LoopStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new loop context.
    pub fn enter_loop(&mut self, kind: LoopKind, continue_label: Label) {
        self.loops.push(LoopContext {
            kind,
            continue_label,
            break_label: None,
        });
    }

    /// Exit the innermost loop.
    ///
    /// Returns its break label if any `break` asked for one; the caller
    /// places it after the loop's `else` branch.
    pub fn exit_loop(&mut self) -> Option<Label> {
        self.loops.pop().and_then(|ctx| ctx.break_label)
    }

    /// Get the current loop nesting depth.
    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }

    /// Kind and continue label of the innermost loop.
    pub fn continue_target(&self) -> Option<(LoopKind, Label)> {
        self.loops.last().map(|ctx| (ctx.kind, ctx.continue_label))
    }

    /// Kind and break label of the innermost loop, creating the label with
    /// `make` on first use.
    pub fn break_target(&mut self, make: impl FnOnce() -> Label) -> Option<(LoopKind, Label)> {
        let ctx = self.loops.last_mut()?;
        let label = *ctx.break_label.get_or_insert_with(make);
        Some((ctx.kind, label))
    }

    /// Number of enclosing `for` loops, whose iterators a `return` must pop.
    pub fn for_loop_depth(&self) -> usize {
        self.loops
            .iter()
            .filter(|ctx| ctx.kind == LoopKind::For)
            .count()
    }

    /// Drop contexts deeper than `depth` and break labels whose ids are at
    /// or beyond `label_limit`.
    pub fn rollback(&mut self, depth: usize, label_limit: u32) {
        self.loops.truncate(depth);
        for ctx in &mut self.loops {
            if ctx.break_label.is_some_and(|label| label.0 >= label_limit) {
                ctx.break_label = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stack_not_in_loop() {
        let stack = LoopStack::new();
        assert_eq!(stack.loop_depth(), 0);
        assert_eq!(stack.continue_target(), None);
    }

    #[test]
    fn nested_loops() {
        let mut stack = LoopStack::new();
        stack.enter_loop(LoopKind::For, Label(0));
        stack.enter_loop(LoopKind::While, Label(2));

        assert_eq!(stack.loop_depth(), 2);
        assert_eq!(stack.continue_target(), Some((LoopKind::While, Label(2))));
        assert_eq!(stack.for_loop_depth(), 1);

        stack.exit_loop();
        assert_eq!(stack.continue_target(), Some((LoopKind::For, Label(0))));
    }

    #[test]
    fn break_label_created_once() {
        let mut stack = LoopStack::new();
        stack.enter_loop(LoopKind::While, Label(0));

        let first = stack.break_target(|| Label(5));
        let second = stack.break_target(|| Label(6));

        assert_eq!(first, Some((LoopKind::While, Label(5))));
        assert_eq!(second, Some((LoopKind::While, Label(5))));
        assert_eq!(stack.exit_loop(), Some(Label(5)));
    }

    #[test]
    fn loop_without_break_has_no_break_label() {
        let mut stack = LoopStack::new();
        stack.enter_loop(LoopKind::For, Label(0));
        assert_eq!(stack.exit_loop(), None);
    }

    #[test]
    fn break_outside_loop() {
        let mut stack = LoopStack::new();
        assert_eq!(stack.break_target(|| Label(0)), None);
    }

    #[test]
    fn rollback_forgets_late_state() {
        let mut stack = LoopStack::new();
        stack.enter_loop(LoopKind::For, Label(0));
        stack.break_target(|| Label(4));
        stack.enter_loop(LoopKind::While, Label(5));

        stack.rollback(1, 3);

        assert_eq!(stack.loop_depth(), 1);
        assert_eq!(stack.exit_loop(), None);
    }
}

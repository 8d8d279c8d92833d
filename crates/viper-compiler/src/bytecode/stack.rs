//! Operand-stack depth analysis over finalized sequences.

use viper_core::{CodegenError, Result};

use super::Element;

/// Walk every reachable path and return the deepest stack seen.
///
/// Entry starts at depth zero. Unreachable elements are ignored.
#[cfg_attr(feature = "profiling", profiling::function)]
pub(crate) fn max_stack_depth(elements: &[Element]) -> Result<u32> {
    let mut depths: Vec<Option<u32>> = vec![None; elements.len()];
    let mut worklist: Vec<(usize, u32)> = Vec::new();
    let mut max_depth = 0;

    if !elements.is_empty() {
        worklist.push((0, 0));
    }

    while let Some((index, depth)) = worklist.pop() {
        match depths[index] {
            Some(seen) if seen == depth => continue,
            Some(seen) => {
                return Err(CodegenError::InconsistentStack {
                    index,
                    expected: seen,
                    found: depth,
                });
            }
            None => depths[index] = Some(depth),
        }

        let next = index + 1;
        let instr = match &elements[index] {
            Element::Label(_) => {
                if next < elements.len() {
                    worklist.push((next, depth));
                }
                continue;
            }
            Element::Instr(instr) => instr,
        };

        let arg = instr.oparg.value();
        let pops = instr.opcode.pops(arg);
        if pops > depth {
            return Err(CodegenError::StackUnderflow { index });
        }
        let after = depth - pops + instr.opcode.pushes(arg);
        max_depth = max_depth.max(after).max(depth);

        if let Some(target) = instr.oparg.target().filter(|&t| t < elements.len()) {
            worklist.push((target, after));
        }
        if !instr.opcode.is_terminator() && next < elements.len() {
            worklist.push((next, after));
        }
    }

    Ok(max_depth)
}

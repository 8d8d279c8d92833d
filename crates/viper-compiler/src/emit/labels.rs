//! Label bookkeeping for the emitter.

use viper_core::Span;

use crate::bytecode::Label;

/// The construct a label was created for, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    /// Node kind, e.g. `"for loop"`.
    pub construct: &'static str,
    /// Where the node starts.
    pub span: Span,
}

#[derive(Debug, Clone, Copy)]
struct LabelSlot {
    /// Element index of the label's marker, once placed.
    placement: Option<usize>,
    /// Whether any emitted jump names this label.
    referenced: bool,
    origin: Option<Origin>,
    /// Cleared when a rollback discards the label.
    live: bool,
}

/// Side table indexed by label id.
///
/// Slots are never removed, so ids stay unique for the life of the unit even
/// across rollbacks.
#[derive(Debug, Default)]
pub(super) struct LabelTable {
    slots: Vec<LabelSlot>,
}

impl LabelTable {
    pub fn create(&mut self, origin: Option<Origin>) -> Label {
        let label = Label(self.slots.len() as u32);
        self.slots.push(LabelSlot {
            placement: None,
            referenced: false,
            origin,
            live: true,
        });
        label
    }

    /// Number of ids handed out, discarded labels included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of labels not discarded by a rollback.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.live).count()
    }

    pub fn contains(&self, label: Label) -> bool {
        self.slots
            .get(label.0 as usize)
            .is_some_and(|slot| slot.live)
    }

    /// Record the placement. Returns false if the label was already placed
    /// or has been discarded.
    pub fn place(&mut self, label: Label, at: usize) -> bool {
        match self.slots.get_mut(label.0 as usize) {
            Some(slot) if slot.live && slot.placement.is_none() => {
                slot.placement = Some(at);
                true
            }
            _ => false,
        }
    }

    pub fn placement(&self, label: Label) -> Option<usize> {
        self.slots
            .get(label.0 as usize)
            .and_then(|slot| slot.placement)
    }

    pub fn mark_referenced(&mut self, label: Label) {
        if let Some(slot) = self.slots.get_mut(label.0 as usize) {
            slot.referenced = true;
        }
    }

    pub fn is_referenced(&self, label: Label) -> bool {
        self.slots
            .get(label.0 as usize)
            .is_some_and(|slot| slot.referenced)
    }

    pub fn origin(&self, label: Label) -> Option<Origin> {
        self.slots
            .get(label.0 as usize)
            .and_then(|slot| slot.origin)
    }

    /// Discard labels created after `len` and placements at or after
    /// element `elements`. Reference flags are cleared for the caller to
    /// rebuild from the surviving instructions.
    pub fn rollback(&mut self, len: usize, elements: usize) {
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if id >= len {
                slot.live = false;
            }
            if slot.placement.is_some_and(|at| at >= elements) {
                slot.placement = None;
            }
            slot.referenced = false;
        }
    }
}

//! Single-element moves within the ordered collection.

use super::{CollectionStore, StoreError};

/// Move the element at `from` so that it ends up at `to`.
///
/// Equivalent to removing the element and re-inserting it at `to` in the
/// shortened sequence. Everything between the two positions shifts by one.
/// Returns `false` (and leaves `items` untouched) when either index is out of
/// range or the two are equal.
pub fn move_element<T>(items: &mut [T], from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }

    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    true
}

/// An in-progress drag of one card.
///
/// Each `over` step reorders the collection immediately without saving;
/// `finish` ends the gesture and saves once if anything moved. There is no
/// way to roll back to the pre-drag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderGesture {
    index: usize,
    moved: bool,
}

impl ReorderGesture {
    pub fn begin(index: usize) -> Self {
        Self { index, moved: false }
    }

    /// Current position of the dragged card.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// The dragged card passed over `target`: move it there.
    pub fn over(&mut self, store: &mut CollectionStore, target: usize) -> bool {
        if target == self.index {
            return false;
        }
        if store.reorder_in_place(self.index, target) {
            tracing::debug!("Drag step {} -> {}", self.index, target);
            self.index = target;
            self.moved = true;
            true
        } else {
            false
        }
    }

    /// Release: commit whatever order the last step produced.
    pub fn finish(self, store: &mut CollectionStore) -> Result<usize, StoreError> {
        if self.moved {
            store.commit()?;
        }
        Ok(self.index)
    }
}

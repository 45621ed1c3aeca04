//! Dense zero-based ordering for display lists
//!
//! Tasks (per owner) and subtasks (per task) share one ordering
//! algorithm: after any append, reorder or delete, `list[i].order()`
//! equals `i` for every position. Reorders reassign every position
//! rather than shifting incrementally, so density holds after
//! arbitrary drag gestures.

use crate::error::{Result, TaskpulseError};

/// An item that carries a stable position within its list
pub trait Orderable {
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

/// Reassign every item's order to its positional index
pub fn reindex<T: Orderable>(list: &mut [T]) {
    for (index, item) in list.iter_mut().enumerate() {
        item.set_order(index as u32);
    }
}

/// Append an item at the stable "last" position
///
/// The new item's order is the list length before the append. Stable
/// only while appends to the same parent are serialized, which the
/// store's single-document read-modify-write provides.
pub fn append_with_order<T: Orderable>(list: &mut Vec<T>, mut item: T) {
    item.set_order(list.len() as u32);
    list.push(item);
}

/// Move the item at `from` to `to`, then reassign all positions
///
/// # Errors
/// Returns a validation error if either index is out of bounds.
pub fn reorder<T: Orderable>(list: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    if from >= list.len() || to >= list.len() {
        return Err(TaskpulseError::validation(format!(
            "reorder indices out of bounds: {from} -> {to} in list of {}",
            list.len()
        )));
    }

    let item = list.remove(from);
    list.insert(to, item);
    reindex(list);
    Ok(())
}

/// Remove the item at `index`, then reassign the survivors' positions
///
/// # Errors
/// Returns a validation error if the index is out of bounds.
pub fn reindex_after_delete<T: Orderable>(list: &mut Vec<T>, index: usize) -> Result<T> {
    if index >= list.len() {
        return Err(TaskpulseError::validation(format!(
            "delete index out of bounds: {index} in list of {}",
            list.len()
        )));
    }

    let removed = list.remove(index);
    reindex(list);
    Ok(removed)
}

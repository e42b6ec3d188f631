//! Reusable cell slots for the grid
//!
//! The grid never draws photos directly: every visible position is bound
//! to a `CellSlot` that owns what the position currently shows (image,
//! spinner, selection border). Slots are recycled on a full reload, so the
//! slot bound to a position can change between an async request and its
//! completion. Always resolve the slot by position with `cell_at`.

use std::collections::HashMap;

use super::data::{ItemIndex, PhotoId, PhotoImage};

/// Display state of one grid cell
#[derive(Debug, Default, Clone)]
pub struct CellSlot {
    /// Position this slot is bound to (None while in the free pool)
    pub bound_to: Option<ItemIndex>,
    /// Photo the slot was last bound for
    pub photo_id: Option<PhotoId>,
    /// Image currently displayed
    pub image: Option<PhotoImage>,
    /// Whether the activity spinner is running
    pub spinning: bool,
    /// Selected for sharing (draws a border)
    pub selected: bool,
    /// Bound as the expanded (large) cell
    pub expanded: bool,
    /// Incremented on every bind, lets tests observe re-renders
    pub generation: u64,
}

impl CellSlot {
    pub fn start_spinner(&mut self) {
        self.spinning = true;
    }

    pub fn stop_spinner(&mut self) {
        self.spinning = false;
    }
}

/// Pool of cell slots indexed by grid position
#[derive(Debug, Default)]
pub struct CellArena {
    slots: Vec<CellSlot>,
    bound: HashMap<ItemIndex, usize>,
    free: Vec<usize>,
}

impl CellArena {
    /// Get the slot for a position, reusing a free slot if the position
    /// is not bound yet. The returned slot still holds whatever it showed
    /// before; callers must rebind every field they care about.
    pub fn dequeue(&mut self, index: ItemIndex) -> &mut CellSlot {
        let slot = match self.bound.get(&index) {
            Some(&slot) => slot,
            None => {
                let slot = self.free.pop().unwrap_or_else(|| {
                    self.slots.push(CellSlot::default());
                    self.slots.len() - 1
                });
                self.bound.insert(index, slot);
                slot
            }
        };

        let cell = &mut self.slots[slot];
        cell.bound_to = Some(index);
        cell.generation += 1;
        cell
    }

    /// Unbind every slot and return them to the free pool.
    /// Slots are reused in position order on the next binds.
    pub fn recycle_all(&mut self) {
        let mut released: Vec<(ItemIndex, usize)> = self.bound.drain().collect();
        // Pop order is reversed, so the first position bound next gets the lowest slot
        released.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, slot) in released {
            self.slots[slot].bound_to = None;
            self.free.push(slot);
        }
    }

    /// The slot bound to a position right now, if any
    pub fn cell_at(&self, index: ItemIndex) -> Option<&CellSlot> {
        self.bound.get(&index).map(|&slot| &self.slots[slot])
    }

    pub fn cell_at_mut(&mut self, index: ItemIndex) -> Option<&mut CellSlot> {
        self.bound.get(&index).map(|&slot| &mut self.slots[slot])
    }

    /// Slot number bound to a position
    #[cfg(test)]
    pub fn slot_of(&self, index: ItemIndex) -> Option<usize> {
        self.bound.get(&index).copied()
    }

    /// Clear the selection flag of every bound slot
    pub fn deselect_all(&mut self) {
        for &slot in self.bound.values() {
            self.slots[slot].selected = false;
        }
    }

    /// Set the selection flag of every bound slot showing `photo_id`.
    /// The same photo can sit at several positions when a term is searched twice.
    pub fn set_selected_for(&mut self, photo_id: &PhotoId, selected: bool) {
        for &slot in self.bound.values() {
            let cell = &mut self.slots[slot];
            if cell.photo_id.as_ref() == Some(photo_id) {
                cell.selected = selected;
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeue_returns_the_same_slot_for_a_bound_position() {
        let mut arena = CellArena::default();
        let index = ItemIndex::new(0, 0);
        arena.dequeue(index).spinning = true;
        assert!(arena.dequeue(index).spinning);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.cell_at(index).map(|c| c.generation), Some(2));
    }

    #[test]
    fn recycled_slots_are_reused_for_other_positions() {
        let mut arena = CellArena::default();
        for item in 0..3 {
            arena.dequeue(ItemIndex::new(0, item));
        }
        let old_slot = arena.slot_of(ItemIndex::new(0, 0));

        arena.recycle_all();
        assert!(arena.cell_at(ItemIndex::new(0, 0)).is_none());

        arena.dequeue(ItemIndex::new(1, 0));
        assert_eq!(arena.slot_of(ItemIndex::new(1, 0)), old_slot);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn deselect_all_clears_bound_slots() {
        let mut arena = CellArena::default();
        arena.dequeue(ItemIndex::new(0, 0)).selected = true;
        arena.dequeue(ItemIndex::new(0, 1)).selected = true;
        arena.deselect_all();
        assert!(!arena.cell_at(ItemIndex::new(0, 0)).unwrap().selected);
        assert!(!arena.cell_at(ItemIndex::new(0, 1)).unwrap().selected);
    }

    #[test]
    fn selection_follows_the_photo_across_positions() {
        let mut arena = CellArena::default();
        let shared = PhotoId("cats-1".to_string());
        arena.dequeue(ItemIndex::new(0, 1)).photo_id = Some(shared.clone());
        arena.dequeue(ItemIndex::new(1, 1)).photo_id = Some(shared.clone());
        arena.dequeue(ItemIndex::new(1, 2)).photo_id = Some(PhotoId("cats-2".to_string()));

        arena.set_selected_for(&shared, true);
        assert!(arena.cell_at(ItemIndex::new(0, 1)).unwrap().selected);
        assert!(arena.cell_at(ItemIndex::new(1, 1)).unwrap().selected);
        assert!(!arena.cell_at(ItemIndex::new(1, 2)).unwrap().selected);

        arena.set_selected_for(&shared, false);
        assert!(!arena.cell_at(ItemIndex::new(0, 1)).unwrap().selected);
        assert!(!arena.cell_at(ItemIndex::new(1, 1)).unwrap().selected);
    }
}

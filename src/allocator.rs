//! Slot allocator
//!
//! Best-fit search over tombstoned slots.

use crate::record::Record;

/// Index of the tombstoned slot best suited to hold `required_size` bytes
///
/// Picks the smallest capacity that is still large enough. Among equal
/// capacities the earliest slot in storage order wins. Returns `None` when no
/// tombstone is big enough.
pub fn find_best_free_slot(records: &[Record], required_size: u32) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;

    for (index, record) in records.iter().enumerate() {
        if record.active || record.size < required_size {
            continue;
        }

        // strict less-than keeps the earliest of equal candidates
        match best {
            Some((_, best_size)) if record.size >= best_size => {}
            _ => best = Some((index, record.size)),
        }
    }

    best.map(|(index, _)| index)
}

/// Total capacity held by tombstoned slots
pub fn free_capacity(records: &[Record]) -> u64 {
    records
        .iter()
        .filter(|r| !r.active)
        .map(|r| r.size as u64)
        .sum()
}

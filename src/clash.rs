use crate::data::{CellRef, ClassId, FacultyId, Grid};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Rebuilds the clash set from scratch.
///
/// A clash is a faculty held by more than one class at the same
/// (day, period); every implicated cell enters the set. The set is never
/// patched incrementally: callers rerun this after generation and after
/// every accepted move, so it always reflects the grids as they stand.
pub fn detect_clashes(grids: &BTreeMap<ClassId, Grid>) -> BTreeSet<CellRef> {
    let mut clashes = BTreeSet::new();
    let mut first_seen: HashMap<(FacultyId, usize, usize), CellRef> = HashMap::new();

    for (&class_id, grid) in grids {
        for day in 0..grid.days() {
            for period in 0..grid.periods() {
                let Some(cell) = grid.get(day, period) else {
                    continue;
                };
                let here = CellRef {
                    class_id,
                    day,
                    period,
                };
                match first_seen.entry((cell.faculty_id, day, period)) {
                    std::collections::hash_map::Entry::Occupied(seen) => {
                        clashes.insert(*seen.get());
                        clashes.insert(here);
                    }
                    std::collections::hash_map::Entry::Vacant(slot) => {
                        slot.insert(here);
                    }
                }
            }
        }
    }
    clashes
}

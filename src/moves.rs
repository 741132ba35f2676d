use crate::clash::detect_clashes;
use crate::data::{CellRef, ClassId, FacultyId, Grid};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("unknown class {0}")]
    UnknownClass(ClassId),
    #[error("cell {0} is outside the grid")]
    OutOfBounds(CellRef),
    #[error("faculty {faculty} is already assigned to {holder}")]
    FacultyBusy { faculty: FacultyId, holder: CellRef },
}

/// Checks whether swapping the contents of `source` and `target` would
/// double-book a faculty, without mutating anything.
///
/// Each occupant is checked against the slot it would move into, across all
/// classes except the one it is vacating (that class's cell is part of the
/// swap). Daily caps and lab contiguity are deliberately not re-checked here;
/// manual edits answer only for cross-class double-booking.
pub fn validate_move(
    grids: &BTreeMap<ClassId, Grid>,
    source: &CellRef,
    target: &CellRef,
) -> Result<(), MoveError> {
    let source_cell = cell_at(grids, source)?;
    let target_cell = cell_at(grids, target)?;
    if source == target {
        return Ok(());
    }

    if let Some(faculty) = source_cell {
        if let Some(holder) =
            holder_elsewhere(grids, faculty, target.day, target.period, source.class_id)
        {
            return Err(MoveError::FacultyBusy { faculty, holder });
        }
    }
    if let Some(faculty) = target_cell {
        if let Some(holder) =
            holder_elsewhere(grids, faculty, source.day, source.period, target.class_id)
        {
            return Err(MoveError::FacultyBusy { faculty, holder });
        }
    }
    Ok(())
}

/// Validates and performs the swap, then rebuilds the clash set.
///
/// Empty cells swap like any other content. On rejection the grids are left
/// untouched.
pub fn apply_move(
    grids: &mut BTreeMap<ClassId, Grid>,
    source: &CellRef,
    target: &CellRef,
) -> Result<BTreeSet<CellRef>, MoveError> {
    validate_move(grids, source, target)?;

    if source != target {
        let source_cell = grids
            .get_mut(&source.class_id)
            .ok_or(MoveError::UnknownClass(source.class_id))?
            .take(source.day, source.period);
        let target_cell = grids
            .get_mut(&target.class_id)
            .ok_or(MoveError::UnknownClass(target.class_id))?
            .take(target.day, target.period);

        grids
            .get_mut(&source.class_id)
            .expect("validated above")
            .set(source.day, source.period, target_cell);
        grids
            .get_mut(&target.class_id)
            .expect("validated above")
            .set(target.day, target.period, source_cell);
    }

    Ok(detect_clashes(grids))
}

/// The faculty at a cell, or `Ok(None)` when the cell is empty.
fn cell_at(
    grids: &BTreeMap<ClassId, Grid>,
    at: &CellRef,
) -> Result<Option<FacultyId>, MoveError> {
    let grid = grids
        .get(&at.class_id)
        .ok_or(MoveError::UnknownClass(at.class_id))?;
    if !grid.in_bounds(at.day, at.period) {
        return Err(MoveError::OutOfBounds(*at));
    }
    Ok(grid.get(at.day, at.period).map(|c| c.faculty_id))
}

/// Which other class (excluding `vacating`) already holds this faculty at
/// (day, period), if any.
fn holder_elsewhere(
    grids: &BTreeMap<ClassId, Grid>,
    faculty: FacultyId,
    day: usize,
    period: usize,
    vacating: ClassId,
) -> Option<CellRef> {
    grids
        .iter()
        .filter(|&(&class_id, _)| class_id != vacating)
        .find(|(_, grid)| {
            grid.get(day, period)
                .is_some_and(|cell| cell.faculty_id == faculty)
        })
        .map(|(&class_id, _)| CellRef {
            class_id,
            day,
            period,
        })
}

use crate::data::{ClassId, FacultyId, Grid};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Cross-class shared state for one generation session.
///
/// Records which faculty already hold each (day, period) slot in any class,
/// and a per-faculty running count of periods assigned per day. Constructed
/// fresh for every `generate` call and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyTracker {
    occupied: Vec<Vec<HashSet<FacultyId>>>,
    daily_load: HashMap<FacultyId, Vec<u32>>,
    days: usize,
}

impl OccupancyTracker {
    pub fn new(days: usize, periods: usize) -> Self {
        Self {
            occupied: vec![vec![HashSet::new(); periods]; days],
            daily_load: HashMap::new(),
            days,
        }
    }

    /// True when the faculty holds no class at this slot.
    pub fn is_free(&self, faculty: FacultyId, day: usize, period: usize) -> bool {
        !self.occupied[day][period].contains(&faculty)
    }

    /// Marks the faculty as holding this slot.
    pub fn occupy(&mut self, faculty: FacultyId, day: usize, period: usize) {
        self.occupied[day][period].insert(faculty);
    }

    /// Periods already assigned to this faculty on this day, across classes.
    pub fn load(&self, faculty: FacultyId, day: usize) -> u32 {
        self.daily_load.get(&faculty).map_or(0, |per_day| per_day[day])
    }

    pub fn add_load(&mut self, faculty: FacultyId, day: usize, periods: u32) {
        let per_day = self
            .daily_load
            .entry(faculty)
            .or_insert_with(|| vec![0; self.days]);
        per_day[day] += periods;
    }

    /// Rebuilds the tracker from the actual grids. The result must equal the
    /// tracker maintained incrementally during placement; tests lean on this
    /// to verify the occupancy invariant.
    pub fn from_grids(grids: &BTreeMap<ClassId, Grid>, days: usize, periods: usize) -> Self {
        let mut tracker = Self::new(days, periods);
        for grid in grids.values() {
            for day in 0..days {
                for period in 0..periods {
                    if let Some(cell) = grid.get(day, period) {
                        tracker.occupy(cell.faculty_id, day, period);
                        tracker.add_load(cell.faculty_id, day, 1);
                    }
                }
            }
        }
        tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;

    #[test]
    fn fresh_tracker_is_free_everywhere() {
        let t = OccupancyTracker::new(6, 5);
        assert!(t.is_free(1, 0, 0));
        assert!(t.is_free(1, 5, 4));
        assert_eq!(t.load(1, 3), 0);
    }

    #[test]
    fn occupy_and_load_are_per_slot_and_per_day() {
        let mut t = OccupancyTracker::new(6, 5);
        t.occupy(1, 2, 3);
        t.add_load(1, 2, 1);

        assert!(!t.is_free(1, 2, 3));
        assert!(t.is_free(1, 2, 4));
        assert!(t.is_free(2, 2, 3));
        assert_eq!(t.load(1, 2), 1);
        assert_eq!(t.load(1, 3), 0);
    }

    #[test]
    fn rebuild_matches_incremental_updates() {
        let mut grid = Grid::new(6, 5);
        grid.set(
            0,
            0,
            Some(Cell {
                subject_id: 10,
                faculty_id: 1,
                size: 1,
                part: None,
            }),
        );
        grid.set(
            0,
            1,
            Some(Cell {
                subject_id: 11,
                faculty_id: 2,
                size: 1,
                part: None,
            }),
        );
        let grids = BTreeMap::from([(1, grid)]);

        let mut incremental = OccupancyTracker::new(6, 5);
        incremental.occupy(1, 0, 0);
        incremental.add_load(1, 0, 1);
        incremental.occupy(2, 0, 1);
        incremental.add_load(2, 0, 1);

        assert_eq!(OccupancyTracker::from_grids(&grids, 6, 5), incremental);
    }
}

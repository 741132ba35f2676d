use crate::data::{Cell, Config, Faculty, FacultyId, Grid, SubjectKind};
use crate::occupancy::OccupancyTracker;
use crate::units::Unit;
use std::collections::HashMap;

/// Fills one class's grid from its shuffled unit list.
///
/// Lab blocks go first, largest first, since they are the hardest to fit;
/// theory units follow in shuffle order. Scanning is first-fit over day then
/// period, with no backtracking. On the first unit with no feasible slot the
/// unit is returned as the error and placement stops, leaving the partial
/// grid in place.
pub fn place_class(
    grid: &mut Grid,
    units: Vec<Unit>,
    occupancy: &mut OccupancyTracker,
    faculties: &HashMap<FacultyId, &Faculty>,
    config: &Config,
) -> Result<(), Unit> {
    let (mut labs, theory): (Vec<Unit>, Vec<Unit>) =
        units.into_iter().partition(|u| u.kind == SubjectKind::Lab);
    // stable sort keeps the shuffle order within equal sizes
    labs.sort_by(|a, b| b.size.cmp(&a.size));

    for unit in labs {
        if !try_place_lab(grid, &unit, occupancy, faculties, config) {
            return Err(unit);
        }
    }
    for unit in theory {
        if !try_place_theory(grid, &unit, occupancy, faculties, config) {
            return Err(unit);
        }
    }
    Ok(())
}

fn is_dept(faculties: &HashMap<FacultyId, &Faculty>, faculty_id: FacultyId) -> bool {
    faculties.get(&faculty_id).is_some_and(|f| f.is_dept)
}

fn try_place_lab(
    grid: &mut Grid,
    unit: &Unit,
    occupancy: &mut OccupancyTracker,
    faculties: &HashMap<FacultyId, &Faculty>,
    config: &Config,
) -> bool {
    let size = unit.size as usize;
    if size == 0 || size > config.periods {
        return false;
    }
    let dept = is_dept(faculties, unit.faculty_id);

    for day in 0..config.days {
        for start in 0..=config.periods - size {
            let window_free = (start..start + size).all(|p| {
                grid.is_empty_at(day, p) && occupancy.is_free(unit.faculty_id, day, p)
            });
            if !window_free {
                continue;
            }
            // the whole block counts against the day cap at once
            if dept && occupancy.load(unit.faculty_id, day) + unit.size > config.max_dept_per_day {
                continue;
            }

            for (k, period) in (start..start + size).enumerate() {
                grid.set(
                    day,
                    period,
                    Some(Cell {
                        subject_id: unit.subject_id,
                        faculty_id: unit.faculty_id,
                        size: unit.size,
                        part: Some(k as u32 + 1),
                    }),
                );
                occupancy.occupy(unit.faculty_id, day, period);
            }
            occupancy.add_load(unit.faculty_id, day, unit.size);
            return true;
        }
    }
    false
}

fn try_place_theory(
    grid: &mut Grid,
    unit: &Unit,
    occupancy: &mut OccupancyTracker,
    faculties: &HashMap<FacultyId, &Faculty>,
    config: &Config,
) -> bool {
    let dept = is_dept(faculties, unit.faculty_id);

    for day in 0..config.days {
        for period in 0..config.periods {
            if !grid.is_empty_at(day, period) {
                continue;
            }
            if !occupancy.is_free(unit.faculty_id, day, period) {
                continue;
            }
            if dept && occupancy.load(unit.faculty_id, day) >= config.max_dept_per_day {
                continue;
            }
            // avoid the same subject in back-to-back periods; only the
            // immediately preceding cell is inspected
            if period > 0
                && grid
                    .get(day, period - 1)
                    .is_some_and(|prev| prev.subject_id == unit.subject_id)
            {
                continue;
            }

            grid.set(
                day,
                period,
                Some(Cell {
                    subject_id: unit.subject_id,
                    faculty_id: unit.faculty_id,
                    size: 1,
                    part: None,
                }),
            );
            occupancy.occupy(unit.faculty_id, day, period);
            occupancy.add_load(unit.faculty_id, day, 1);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            days: 6,
            periods: 5,
            max_dept_per_day: 3,
        }
    }

    fn faculty(id: FacultyId, is_dept: bool) -> Faculty {
        Faculty {
            id,
            name: format!("Prof {id}"),
            code: format!("P{id}"),
            is_dept,
        }
    }

    fn theory_unit(subject_id: u32, faculty_id: FacultyId) -> Unit {
        Unit {
            kind: SubjectKind::Theory,
            size: 1,
            subject_id,
            faculty_id,
            leftover: false,
        }
    }

    fn lab_unit(subject_id: u32, faculty_id: FacultyId, size: u32) -> Unit {
        Unit {
            kind: SubjectKind::Lab,
            size,
            subject_id,
            faculty_id,
            leftover: false,
        }
    }

    #[test]
    fn lab_block_lands_contiguous_with_parts() {
        let cfg = config();
        let f = faculty(1, true);
        let map = HashMap::from([(1, &f)]);
        let mut grid = Grid::new(cfg.days, cfg.periods);
        let mut occ = OccupancyTracker::new(cfg.days, cfg.periods);

        place_class(&mut grid, vec![lab_unit(10, 1, 3)], &mut occ, &map, &cfg).unwrap();

        for (k, period) in (0..3).enumerate() {
            let cell = grid.get(0, period).expect("block cell filled");
            assert_eq!(cell.subject_id, 10);
            assert_eq!(cell.size, 3);
            assert_eq!(cell.part, Some(k as u32 + 1));
        }
        assert!(grid.is_empty_at(0, 3));
    }

    #[test]
    fn largest_lab_blocks_place_first() {
        let cfg = config();
        let f = faculty(1, false);
        let map = HashMap::from([(1, &f)]);
        let mut grid = Grid::new(cfg.days, cfg.periods);
        let mut occ = OccupancyTracker::new(cfg.days, cfg.periods);

        let units = vec![lab_unit(10, 1, 2), lab_unit(11, 1, 3)];
        place_class(&mut grid, units, &mut occ, &map, &cfg).unwrap();

        // the 3-block won the earlier window despite being listed second
        assert_eq!(grid.get(0, 0).unwrap().subject_id, 11);
        assert_eq!(grid.get(0, 3).unwrap().subject_id, 10);
    }

    #[test]
    fn dept_cap_pushes_block_to_next_day() {
        let cfg = config();
        let f = faculty(1, true);
        let map = HashMap::from([(1, &f)]);
        let mut grid = Grid::new(cfg.days, cfg.periods);
        let mut occ = OccupancyTracker::new(cfg.days, cfg.periods);

        // two 2-blocks would make 4 periods on day 0, over the cap of 3
        let units = vec![lab_unit(10, 1, 2), lab_unit(11, 1, 2)];
        place_class(&mut grid, units, &mut occ, &map, &cfg).unwrap();

        assert_eq!(grid.get(0, 0).unwrap().subject_id, 10);
        assert_eq!(grid.get(1, 0).unwrap().subject_id, 11);
        assert_eq!(occ.load(1, 0), 2);
        assert_eq!(occ.load(1, 1), 2);
    }

    #[test]
    fn external_faculty_ignores_day_cap() {
        let cfg = config();
        let f = faculty(1, false);
        let map = HashMap::from([(1, &f)]);
        let mut grid = Grid::new(cfg.days, cfg.periods);
        let mut occ = OccupancyTracker::new(cfg.days, cfg.periods);

        // 5 one-period sessions of distinct subjects all fit on day 0/1
        let units: Vec<Unit> = (0..5).map(|i| theory_unit(10 + i, 1)).collect();
        place_class(&mut grid, units, &mut occ, &map, &cfg).unwrap();
        assert_eq!(occ.load(1, 0), 5);
    }

    #[test]
    fn theory_avoids_back_to_back_same_subject() {
        let cfg = config();
        let f = faculty(1, false);
        let map = HashMap::from([(1, &f)]);
        let mut grid = Grid::new(cfg.days, cfg.periods);
        let mut occ = OccupancyTracker::new(cfg.days, cfg.periods);

        let units = vec![theory_unit(10, 1), theory_unit(10, 1)];
        place_class(&mut grid, units, &mut occ, &map, &cfg).unwrap();

        assert_eq!(grid.get(0, 0).unwrap().subject_id, 10);
        assert!(grid.is_empty_at(0, 1));
        assert_eq!(grid.get(0, 2).unwrap().subject_id, 10);
    }

    #[test]
    fn cross_class_occupancy_blocks_the_slot() {
        let cfg = config();
        let f = faculty(1, false);
        let map = HashMap::from([(1, &f)]);
        let mut occ = OccupancyTracker::new(cfg.days, cfg.periods);

        let mut grid_a = Grid::new(cfg.days, cfg.periods);
        place_class(&mut grid_a, vec![theory_unit(10, 1)], &mut occ, &map, &cfg).unwrap();

        let mut grid_b = Grid::new(cfg.days, cfg.periods);
        place_class(&mut grid_b, vec![theory_unit(20, 1)], &mut occ, &map, &cfg).unwrap();

        // second class's own grid was empty at (0,0) but the faculty was not free
        assert!(grid_b.is_empty_at(0, 0));
        assert_eq!(grid_b.get(0, 1).unwrap().subject_id, 20);
    }

    #[test]
    fn unplaceable_lab_reports_the_unit_and_keeps_partial_grid() {
        let cfg = Config {
            days: 1,
            periods: 3,
            max_dept_per_day: 3,
        };
        let f = faculty(1, false);
        let map = HashMap::from([(1, &f)]);
        let mut grid = Grid::new(cfg.days, cfg.periods);
        let mut occ = OccupancyTracker::new(cfg.days, cfg.periods);

        let units = vec![lab_unit(10, 1, 3), lab_unit(11, 1, 3)];
        let failed = place_class(&mut grid, units, &mut occ, &map, &cfg).unwrap_err();
        assert_eq!(failed.subject_id, 11);
        // the first block survived
        assert_eq!(grid.get(0, 0).unwrap().subject_id, 10);
    }
}

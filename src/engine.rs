use crate::clash::detect_clashes;
use crate::data::{
    CellRef, Class, ClassFailure, ClassId, Config, Faculty, FacultyId, Grid, Subject,
};
use crate::occupancy::OccupancyTracker;
use crate::placer::place_class;
use crate::units::derive_units;
use itertools::Itertools;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// Everything one generation run needs; entities come from collaborators.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    pub faculties: Vec<Faculty>,
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub config: Config,
}

/// Per-class grids plus failures and the freshly built clash set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub grids: BTreeMap<ClassId, Grid>,
    pub failures: Vec<ClassFailure>,
    pub clashes: BTreeSet<CellRef>,
}

/// A class carrying more department-taught subjects than its cap allows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapViolation {
    pub class_id: ClassId,
    pub dept_subjects: usize,
    pub cap: u32,
    pub class: String,
}

impl fmt::Display for CapViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has {} dept subjects, exceeds cap {}",
            self.class, self.dept_subjects, self.cap
        )
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("fix these before generation: {}", .0.iter().map(ToString::to_string).join("; "))]
    CapViolations(Vec<CapViolation>),
}

/// Runs generation for every class against one shared occupancy tracker.
///
/// Classes are processed in input order. Precondition violations abort the
/// whole call before any grid is touched; a placement failure is local to
/// its class, which keeps the partial grid it got. Pass a seed to make the
/// unit shuffle reproducible; `None` draws fresh entropy per run.
pub fn generate(
    input: &GenerationInput,
    seed: Option<u64>,
) -> Result<GenerationOutcome, EngineError> {
    input.config.validate().map_err(EngineError::InvalidConfig)?;
    let config = &input.config;

    // lookups
    let faculty_map: HashMap<FacultyId, &Faculty> =
        input.faculties.iter().map(|f| (f.id, f)).collect();
    let subjects_by_class: HashMap<ClassId, Vec<&Subject>> = input
        .subjects
        .iter()
        .map(|s| (s.class_id, s))
        .into_group_map();

    let violations = cap_violations(&input.classes, &subjects_by_class, &faculty_map);
    if !violations.is_empty() {
        return Err(EngineError::CapViolations(violations));
    }

    info!(
        "generating timetables for {} classes, {} subjects, {} faculties ({} days x {} periods)",
        input.classes.len(),
        input.subjects.len(),
        input.faculties.len(),
        config.days,
        config.periods
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut occupancy = OccupancyTracker::new(config.days, config.periods);
    let mut grids = BTreeMap::new();
    let mut failures = Vec::new();

    for class in &input.classes {
        let mut units: Vec<_> = subjects_by_class
            .get(&class.id)
            .into_iter()
            .flatten()
            .flat_map(|subject| derive_units(subject, class, &faculty_map))
            .collect();
        // uniform shuffle so subjects entered first get no systematic edge
        units.shuffle(&mut rng);

        let mut grid = Grid::new(config.days, config.periods);
        if let Err(unit) = place_class(&mut grid, units, &mut occupancy, &faculty_map, config) {
            let subject = input
                .subjects
                .iter()
                .find(|s| s.id == unit.subject_id)
                .map_or("a subject", |s| s.name.as_str());
            let reason = format!(
                "could not fully place all sessions for {class} with current constraints; \
                 no feasible slot left for {subject}"
            );
            warn!("{reason}");
            failures.push(ClassFailure {
                class_id: class.id,
                reason,
            });
        }
        // partial or empty grids persist for failed classes
        grids.insert(class.id, grid);
    }

    let clashes = detect_clashes(&grids);
    info!(
        "generation finished: {} grids, {} failures, {} clashing cells",
        grids.len(),
        failures.len(),
        clashes.len()
    );

    Ok(GenerationOutcome {
        grids,
        failures,
        clashes,
    })
}

fn cap_violations(
    classes: &[Class],
    subjects_by_class: &HashMap<ClassId, Vec<&Subject>>,
    faculties: &HashMap<FacultyId, &Faculty>,
) -> Vec<CapViolation> {
    classes
        .iter()
        .filter(|class| class.caps_dept_subjects())
        .filter_map(|class| {
            let dept_subjects = subjects_by_class
                .get(&class.id)
                .map_or(0, |subjects| {
                    subjects
                        .iter()
                        .filter(|s| {
                            faculties
                                .get(&s.faculty_id)
                                .is_some_and(|f| f.is_dept)
                        })
                        .count()
                });
            (dept_subjects as u32 > class.max_dept_subjects).then(|| CapViolation {
                class_id: class.id,
                dept_subjects,
                cap: class.max_dept_subjects,
                class: class.to_string(),
            })
        })
        .collect()
}

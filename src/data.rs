use serde::{Deserialize, Serialize};
use std::fmt;

// Type aliases for clarity
pub type FacultyId = u32;
pub type ClassId = u32;
pub type SubjectId = u32;

/// A faculty member who can be assigned to subjects.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    pub code: String,
    pub is_dept: bool,
}

impl fmt::Display for Faculty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)?;
        if !self.is_dept {
            write!(f, " [external]")?;
        }
        Ok(())
    }
}

/// Program track a class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Program {
    UG,
    PG,
}

impl Program {
    pub fn valid_year(self, year: u32) -> bool {
        match self {
            Program::UG => (1..=3).contains(&year),
            Program::PG => (1..=2).contains(&year),
        }
    }
}

/// How lab blocks are sized for a given program/year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabRule {
    /// Blocks of 2 or 3 periods (UG years 1-2, PG year 1).
    Short,
    /// One full-day block of 5 periods (UG year 3, PG year 2).
    FullDay,
}

/// A class (one cohort following a single weekly grid).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub program: Program,
    pub year: u32,
    pub section: String,
    /// Cap on department-taught subjects; enforced only where
    /// `caps_dept_subjects` is true.
    pub max_dept_subjects: u32,
}

impl Class {
    /// The department-subject cap is meaningful only for UG years 1 and 2.
    pub fn caps_dept_subjects(&self) -> bool {
        self.program == Program::UG && (self.year == 1 || self.year == 2)
    }

    pub fn lab_rule(&self) -> LabRule {
        match (self.program, self.year) {
            (Program::UG, 3) | (Program::PG, 2) => LabRule::FullDay,
            _ => LabRule::Short,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}-{} {}", self.program, self.year, self.section)
    }
}

/// Kind of a subject (and of a derived placement unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Theory,
    Lab,
}

/// Requested lab block size; `Auto` defers to the class's lab rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabBlockRequest {
    #[default]
    Auto,
    #[serde(untagged)]
    Periods(u32),
}

/// A subject owned by exactly one class and taught by exactly one faculty.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub class_id: ClassId,
    pub name: String,
    /// Total weekly hours; mapped to sessions by the unit deriver.
    pub hours: u32,
    pub kind: SubjectKind,
    pub faculty_id: FacultyId,
    #[serde(default)]
    pub lab_block: LabBlockRequest,
}

/// Grid dimensions and the department daily load cap.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub days: usize,
    pub periods: usize,
    pub max_dept_per_day: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            days: 6,
            periods: 5,
            max_dept_per_day: 3,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.days == 0 {
            return Err("days must be a positive integer");
        }
        if self.periods == 0 {
            return Err("periods must be a positive integer");
        }
        if self.max_dept_per_day == 0 {
            return Err("maxDeptPerDay must be a positive integer");
        }
        Ok(())
    }
}

/// One filled timetable cell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub subject_id: SubjectId,
    pub faculty_id: FacultyId,
    /// Block size of the placement that produced this cell (1 for theory).
    pub size: u32,
    /// 1-based position within a lab block; absent for theory cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<u32>,
}

/// A per-class days x periods timetable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<Vec<Option<Cell>>>,
}

impl Grid {
    pub fn new(days: usize, periods: usize) -> Self {
        Self {
            cells: vec![vec![None; periods]; days],
        }
    }

    pub fn days(&self) -> usize {
        self.cells.len()
    }

    pub fn periods(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn in_bounds(&self, day: usize, period: usize) -> bool {
        day < self.days() && period < self.periods()
    }

    pub fn get(&self, day: usize, period: usize) -> Option<&Cell> {
        self.cells.get(day)?.get(period)?.as_ref()
    }

    pub fn is_empty_at(&self, day: usize, period: usize) -> bool {
        self.get(day, period).is_none()
    }

    pub fn set(&mut self, day: usize, period: usize, cell: Option<Cell>) {
        self.cells[day][period] = cell;
    }

    pub fn take(&mut self, day: usize, period: usize) -> Option<Cell> {
        self.cells[day][period].take()
    }
}

/// Reference to one cell of one class's grid. Doubles as a clash-set member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRef {
    pub class_id: ClassId,
    pub day: usize,
    pub period: usize,
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // day/period are 1-based in anything a human reads
        write!(
            f,
            "class {} at day {}, period {}",
            self.class_id,
            self.day + 1,
            self.period + 1
        )
    }
}

/// A class whose grid could not be fully filled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFailure {
    pub class_id: ClassId,
    pub reason: String,
}

impl fmt::Display for ClassFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[class {}] {}", self.class_id, self.reason)
    }
}

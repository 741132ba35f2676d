use crate::data::{Class, Faculty, FacultyId, LabBlockRequest, LabRule, Subject, SubjectKind};
use std::collections::HashMap;

/// One indivisible placement request: a single theory period or a lab block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub kind: SubjectKind,
    /// Periods this unit occupies (1 for theory, the block size for labs).
    pub size: u32,
    pub subject_id: u32,
    pub faculty_id: FacultyId,
    /// True for the single-period remainder of a lab whose hours do not
    /// divide evenly by the block size. Placed under theory rules.
    pub leftover: bool,
}

/// Resolves a lab subject's block size from the owning class's lab rule.
///
/// Full-day classes always get a block spanning the whole day regardless of
/// what was requested. Short-lab classes honour a requested 2 or 3 and fall
/// back to 2 for `auto` or anything else.
pub fn resolve_lab_block(request: LabBlockRequest, class: &Class) -> u32 {
    match class.lab_rule() {
        LabRule::FullDay => 5,
        LabRule::Short => match request {
            LabBlockRequest::Periods(n) if n == 2 || n == 3 => n,
            _ => 2,
        },
    }
}

/// Weekly session count for a theory subject.
///
/// 60-hour and 90-hour courses follow the standard 4- and 6-period weeks;
/// any other hour total maps one session per hour.
pub fn theory_sessions(hours: u32) -> u32 {
    match hours {
        60 => 4,
        90 => 6,
        h => h,
    }
}

/// Expands one subject into its placement units.
///
/// Returns no units when the subject's faculty reference cannot be resolved,
/// so a dangling reference degrades to an unscheduled subject rather than an
/// error mid-generation.
pub fn derive_units(
    subject: &Subject,
    class: &Class,
    faculties: &HashMap<FacultyId, &Faculty>,
) -> Vec<Unit> {
    if !faculties.contains_key(&subject.faculty_id) {
        return Vec::new();
    }

    let mut units = Vec::new();
    match subject.kind {
        SubjectKind::Lab => {
            let block = resolve_lab_block(subject.lab_block, class);
            for _ in 0..subject.hours / block {
                units.push(Unit {
                    kind: SubjectKind::Lab,
                    size: block,
                    subject_id: subject.id,
                    faculty_id: subject.faculty_id,
                    leftover: false,
                });
            }
            if subject.hours % block > 0 {
                units.push(Unit {
                    kind: SubjectKind::Theory,
                    size: 1,
                    subject_id: subject.id,
                    faculty_id: subject.faculty_id,
                    leftover: true,
                });
            }
        }
        SubjectKind::Theory => {
            for _ in 0..theory_sessions(subject.hours) {
                units.push(Unit {
                    kind: SubjectKind::Theory,
                    size: 1,
                    subject_id: subject.id,
                    faculty_id: subject.faculty_id,
                    leftover: false,
                });
            }
        }
    }
    units
}

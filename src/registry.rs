use crate::data::{
    Class, ClassId, Config, Faculty, FacultyId, LabBlockRequest, Program, Subject, SubjectId,
    SubjectKind,
};
use crate::engine::GenerationInput;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown faculty {0}")]
    UnknownFaculty(FacultyId),
    #[error("unknown class {0}")]
    UnknownClass(ClassId),
    #[error("unknown subject {0}")]
    UnknownSubject(SubjectId),
    #[error("faculty {0} is assigned to a subject; remove that subject first")]
    FacultyInUse(FacultyId),
    #[error("class {0} still has subjects; remove those subjects first")]
    ClassHasSubjects(ClassId),
    #[error("a class with this program, year and section already exists")]
    DuplicateClass,
    #[error("year {year} is not valid for the {program:?} track")]
    InvalidYear { program: Program, year: u32 },
}

/// Owned entity collections with referential checks at every mutation.
///
/// Deletion is blocked while a record is referenced, and subjects can only
/// reference records that exist, so the engine never sees dangling ids from
/// this path. Ids are allocated from a single counter.
#[derive(Debug, Default)]
pub struct Registry {
    faculties: Vec<Faculty>,
    classes: Vec<Class>,
    subjects: Vec<Subject>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faculties(&self) -> &[Faculty] {
        &self.faculties
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_faculty(
        &mut self,
        name: impl Into<String>,
        code: impl Into<String>,
        is_dept: bool,
    ) -> FacultyId {
        let id = self.alloc_id();
        self.faculties.push(Faculty {
            id,
            name: name.into(),
            code: code.into(),
            is_dept,
        });
        id
    }

    pub fn remove_faculty(&mut self, id: FacultyId) -> Result<(), RegistryError> {
        if !self.faculties.iter().any(|f| f.id == id) {
            return Err(RegistryError::UnknownFaculty(id));
        }
        if self.subjects.iter().any(|s| s.faculty_id == id) {
            return Err(RegistryError::FacultyInUse(id));
        }
        self.faculties.retain(|f| f.id != id);
        Ok(())
    }

    pub fn add_class(
        &mut self,
        program: Program,
        year: u32,
        section: impl Into<String>,
        max_dept_subjects: u32,
    ) -> Result<ClassId, RegistryError> {
        if !program.valid_year(year) {
            return Err(RegistryError::InvalidYear { program, year });
        }
        let section = section.into();
        let duplicate = self
            .classes
            .iter()
            .any(|c| c.program == program && c.year == year && c.section == section);
        if duplicate {
            return Err(RegistryError::DuplicateClass);
        }
        let id = self.alloc_id();
        self.classes.push(Class {
            id,
            program,
            year,
            section,
            max_dept_subjects,
        });
        Ok(id)
    }

    pub fn remove_class(&mut self, id: ClassId) -> Result<(), RegistryError> {
        if !self.classes.iter().any(|c| c.id == id) {
            return Err(RegistryError::UnknownClass(id));
        }
        if self.subjects.iter().any(|s| s.class_id == id) {
            return Err(RegistryError::ClassHasSubjects(id));
        }
        self.classes.retain(|c| c.id != id);
        Ok(())
    }

    pub fn add_subject(
        &mut self,
        class_id: ClassId,
        name: impl Into<String>,
        hours: u32,
        kind: SubjectKind,
        faculty_id: FacultyId,
        lab_block: LabBlockRequest,
    ) -> Result<SubjectId, RegistryError> {
        if !self.classes.iter().any(|c| c.id == class_id) {
            return Err(RegistryError::UnknownClass(class_id));
        }
        if !self.faculties.iter().any(|f| f.id == faculty_id) {
            return Err(RegistryError::UnknownFaculty(faculty_id));
        }
        let id = self.alloc_id();
        self.subjects.push(Subject {
            id,
            class_id,
            name: name.into(),
            hours,
            kind,
            faculty_id,
            lab_block,
        });
        Ok(id)
    }

    pub fn remove_subject(&mut self, id: SubjectId) -> Result<(), RegistryError> {
        if !self.subjects.iter().any(|s| s.id == id) {
            return Err(RegistryError::UnknownSubject(id));
        }
        self.subjects.retain(|s| s.id != id);
        Ok(())
    }

    /// Snapshot of the current entities as a generation input.
    pub fn generation_input(&self, config: Config) -> GenerationInput {
        GenerationInput {
            faculties: self.faculties.clone(),
            classes: self.classes.clone(),
            subjects: self.subjects.clone(),
            config,
        }
    }
}

use std::fmt;

/// Semantic scan category
///
/// Each category maps to one sub-directory of a standardized session and
/// one filename suffix convention. Categories are always processed in the
/// order given by [`ScanCategory::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScanCategory {
    /// Anatomical (T1-weighted) scan
    Anat,
    /// Functional (task) scan
    Func,
    /// Diffusion-weighted scan
    Dwi,
    /// Field map (distortion correction) scan
    Fmap,
}

impl ScanCategory {
    /// All categories in canonical processing order
    pub const ALL: [ScanCategory; 4] = [
        ScanCategory::Anat,
        ScanCategory::Func,
        ScanCategory::Dwi,
        ScanCategory::Fmap,
    ];

    /// Returns the standardized sub-directory name for this category
    pub fn dir_name(&self) -> &'static str {
        match self {
            ScanCategory::Anat => "anat",
            ScanCategory::Func => "func",
            ScanCategory::Dwi => "dwi",
            ScanCategory::Fmap => "fmap",
        }
    }

    /// Returns whether files in this category carry a field-map marker
    pub fn is_fieldmap(&self) -> bool {
        matches!(self, ScanCategory::Fmap)
    }
}

impl fmt::Display for ScanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// Functional task names
///
/// The task vocabulary is fixed: five tasks per session. Raw spellings
/// differ by site; [`Task::tag`] is the canonical spelling encoded into
/// output filenames regardless of site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Caat,
    CueRun01,
    CueRun02,
    Nback,
    Rest,
}

impl Task {
    /// All tasks in canonical processing order
    pub const ALL: [Task; 5] = [
        Task::Caat,
        Task::CueRun01,
        Task::CueRun02,
        Task::Nback,
        Task::Rest,
    ];

    /// Returns the canonical tag encoded into output filenames
    pub fn tag(&self) -> &'static str {
        match self {
            Task::Caat => "CAAT",
            Task::CueRun01 => "CUE-RUN-01",
            Task::CueRun02 => "CUE-RUN-02",
            Task::Nback => "NBACK",
            Task::Rest => "REST",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Acquisition tag carried by a functional or field-map output
///
/// Field maps are acquired once per task plus once for the diffusion scan,
/// so the tag vocabulary is the five tasks plus `dwi`. The tag ties a field
/// map to the single image it is intended to correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcqTag {
    Task(Task),
    Dwi,
}

impl AcqTag {
    /// All acquisition tags in canonical processing order
    pub const ALL: [AcqTag; 6] = [
        AcqTag::Task(Task::Caat),
        AcqTag::Task(Task::CueRun01),
        AcqTag::Task(Task::CueRun02),
        AcqTag::Task(Task::Nback),
        AcqTag::Task(Task::Rest),
        AcqTag::Dwi,
    ];

    /// Returns the canonical tag encoded into output filenames
    pub fn tag(&self) -> &'static str {
        match self {
            AcqTag::Task(task) => task.tag(),
            AcqTag::Dwi => "dwi",
        }
    }
}

impl fmt::Display for AcqTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(ScanCategory::Anat.dir_name(), "anat");
        assert_eq!(ScanCategory::Func.dir_name(), "func");
        assert_eq!(ScanCategory::Dwi.dir_name(), "dwi");
        assert_eq!(ScanCategory::Fmap.dir_name(), "fmap");
        assert!(ScanCategory::Fmap.is_fieldmap());
        assert!(!ScanCategory::Func.is_fieldmap());
    }

    #[test]
    fn test_task_tags_are_canonical() {
        let tags: Vec<&str> = Task::ALL.iter().map(|t| t.tag()).collect();
        assert_eq!(
            tags,
            vec!["CAAT", "CUE-RUN-01", "CUE-RUN-02", "NBACK", "REST"]
        );
    }

    #[test]
    fn test_acq_tags_extend_tasks_with_dwi() {
        assert_eq!(AcqTag::ALL.len(), Task::ALL.len() + 1);
        assert_eq!(AcqTag::ALL[5].tag(), "dwi");
    }

    #[test]
    fn test_cue_run_tags_are_distinct() {
        // The two cue runs share a prefix; exact comparison must tell them apart.
        assert_ne!(Task::CueRun01.tag(), Task::CueRun02.tag());
        assert!(Task::CueRun02.tag().starts_with("CUE-RUN-0"));
    }
}

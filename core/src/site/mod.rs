//! Site formats and their pattern vocabularies
//!
//! Raw data arrives in one of two incompatible site formats. Instead of
//! branching on the site throughout the engine, a [`SiteProfile`] is
//! selected once at subject construction and supplies every site-specific
//! detail as data: glob shapes, sequence tokens, the field-map marker and
//! the session ordering source.

use crate::error::Result;
use crate::types::{AcqTag, Task};
use log::warn;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Raw data site format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    /// Scanner export with nested series directories and `TOP_UP` field maps
    Utd,
    /// PAR/REC export with `ses-XX` session folders and `topup` field maps
    Nl,
}

impl Site {
    /// Infers the site format from the trailing component of a raw path
    ///
    /// NL subject folders already carry the `sub` prefix; UTD folders are
    /// bare scanner identifiers.
    pub fn infer(dir_name: &str) -> Self {
        if dir_name.starts_with("sub") {
            Site::Nl
        } else {
            Site::Utd
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Site::Utd => "UTD",
            Site::Nl => "NL",
        };
        write!(f, "{}", name)
    }
}

/// Per-site pattern vocabulary
///
/// Immutable for the lifetime of a subject. All sequence matching, session
/// ordering and converter selection consult this profile instead of
/// re-testing the site flag.
#[derive(Debug, Clone, Copy)]
pub struct SiteProfile {
    site: Site,
}

impl SiteProfile {
    /// Creates the profile for a site
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    /// Returns the site this profile describes
    pub fn site(&self) -> Site {
        self.site
    }

    /// Returns the field-map marker substring (case-sensitive)
    pub fn fieldmap_marker(&self) -> &'static str {
        match self.site {
            Site::Utd => "TOP_UP",
            Site::Nl => "topup",
        }
    }

    /// Returns the anatomical sequence token
    pub fn anat_token(&self) -> &'static str {
        match self.site {
            Site::Utd => "MPR",
            Site::Nl => "T1w",
        }
    }

    /// Returns the diffusion sequence token
    pub fn dwi_token(&self) -> &'static str {
        match self.site {
            Site::Utd => "DTI",
            Site::Nl => "dwi",
        }
    }

    /// Returns the raw sequence token for a task
    ///
    /// Spellings differ by site; NL tokens embed a `*` wildcard where the
    /// scanner inserts variable separators.
    pub fn task_token(&self, task: Task) -> &'static str {
        match self.site {
            Site::Utd => match task {
                Task::Caat => "CAAT",
                Task::CueRun01 => "CUE_RUN1",
                Task::CueRun02 => "CUE_RUN2",
                Task::Nback => "NBACK",
                Task::Rest => "REST",
            },
            Site::Nl => match task {
                Task::Caat => "CAAT",
                Task::CueRun01 => "cue*run-1",
                Task::CueRun02 => "cue*run-2",
                Task::Nback => "nback",
                Task::Rest => "rest",
            },
        }
    }

    /// Returns the raw sequence token for an acquisition tag
    pub fn acq_token(&self, acq: AcqTag) -> &'static str {
        match acq {
            AcqTag::Task(task) => self.task_token(task),
            AcqTag::Dwi => self.dwi_token(),
        }
    }

    /// Builds the glob pattern matching raw files for a sequence token
    ///
    /// UTD raw files sit inside a series directory named after the sequence;
    /// NL raw files are PAR headers named after the sequence.
    pub fn glob_pattern(&self, root: &Path, token: &str) -> String {
        match self.site {
            Site::Utd => format!("{}/*/*{}*/*", root.display(), token),
            Site::Nl => format!("{}/*/*{}*.PAR", root.display(), token),
        }
    }

    /// Extracts the sortable acquisition key from a raw session folder name
    ///
    /// UTD folder names embed the acquisition date as the numeric field
    /// between `Study` and `at`. NL folders carry no date and yield `None`.
    pub fn session_sort_key(&self, folder_name: &str) -> Option<i64> {
        match self.site {
            Site::Utd => {
                static DATE_RE: OnceLock<Regex> = OnceLock::new();
                let re = DATE_RE.get_or_init(|| Regex::new(r"Study(\d+)at").unwrap());
                re.captures(folder_name)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse::<i64>().ok())
            }
            Site::Nl => None,
        }
    }

    /// Resolves the per-session raw path tags, in canonical session order
    ///
    /// The tag at index 0 belongs to `session-1`. UTD sessions are ordered
    /// reverse-chronologically by acquisition date, so the most recent
    /// acquisition becomes `session-1`; the tag is the date field itself,
    /// which appears in every raw path of that acquisition. NL sessions are
    /// the literal folder labels.
    pub fn session_tags(&self, raw_root: &Path) -> Result<Vec<String>> {
        match self.site {
            Site::Utd => {
                let mut keys = Vec::new();
                for entry in fs::read_dir(raw_root)? {
                    let entry = entry?;
                    if !entry.path().is_dir() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy().into_owned();
                    match self.session_sort_key(&name) {
                        Some(key) => keys.push(key),
                        None => {
                            warn!("skipping acquisition folder without date field: {}", name)
                        }
                    }
                }
                // Most recent acquisition first
                keys.sort_unstable_by(|a, b| b.cmp(a));
                Ok(keys.into_iter().map(|k| k.to_string()).collect())
            }
            Site::Nl => Ok(vec!["ses-01".to_string(), "ses-02".to_string()]),
        }
    }

    /// Returns the site-default external converter binary name
    pub fn converter_name(&self) -> &'static str {
        match self.site {
            Site::Utd => "dcm2niix",
            Site::Nl => "dcm2niix_NL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_site_inference() {
        assert_eq!(Site::infer("sub-1126"), Site::Nl);
        assert_eq!(Site::infer("M75005160"), Site::Utd);
        // Bare "sub" prefix without dash still reads as NL
        assert_eq!(Site::infer("sub1126"), Site::Nl);
    }

    #[test]
    fn test_glob_pattern_shapes() {
        let root = PathBuf::from("/raw/M75005160");
        let utd = SiteProfile::new(Site::Utd);
        assert_eq!(
            utd.glob_pattern(&root, "MPR"),
            "/raw/M75005160/*/*MPR*/*"
        );

        let root = PathBuf::from("/raw/sub-1126");
        let nl = SiteProfile::new(Site::Nl);
        assert_eq!(
            nl.glob_pattern(&root, "T1w"),
            "/raw/sub-1126/*/*T1w*.PAR"
        );
    }

    #[test]
    fn test_session_sort_key_extracts_date() {
        let utd = SiteProfile::new(Site::Utd);
        assert_eq!(
            utd.session_sort_key("Magnetom_Study20190412at093000"),
            Some(20190412)
        );
        assert_eq!(utd.session_sort_key("no_date_here"), None);

        let nl = SiteProfile::new(Site::Nl);
        assert_eq!(nl.session_sort_key("ses-01"), None);
    }

    #[test]
    fn test_utd_session_tags_are_reverse_chronological() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("Magnetom_Study20180105at101500")).unwrap();
        std::fs::create_dir(temp.path().join("Magnetom_Study20190412at093000")).unwrap();

        let utd = SiteProfile::new(Site::Utd);
        let tags = utd.session_tags(temp.path()).unwrap();
        assert_eq!(tags, vec!["20190412".to_string(), "20180105".to_string()]);
    }

    #[test]
    fn test_utd_session_tags_ignore_undated_folders() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("Magnetom_Study20190412at093000")).unwrap();
        std::fs::create_dir(temp.path().join("scratch")).unwrap();

        let utd = SiteProfile::new(Site::Utd);
        let tags = utd.session_tags(temp.path()).unwrap();
        assert_eq!(tags, vec!["20190412".to_string()]);
    }

    #[test]
    fn test_nl_session_tags_are_literal() {
        let temp = TempDir::new().unwrap();
        let nl = SiteProfile::new(Site::Nl);
        let tags = nl.session_tags(temp.path()).unwrap();
        assert_eq!(tags, vec!["ses-01".to_string(), "ses-02".to_string()]);
    }

    #[test]
    fn test_converter_names() {
        assert_eq!(SiteProfile::new(Site::Utd).converter_name(), "dcm2niix");
        assert_eq!(SiteProfile::new(Site::Nl).converter_name(), "dcm2niix_NL");
    }
}

//! Subject standardization engine
//!
//! A [`Subject`] owns the end-to-end conversion of one participant's raw
//! scanner output into the standardized session layout: site inference,
//! prior-conversion detection, raw file categorization, session ordering,
//! external conversion and field-map sidecar linking. One Subject is built
//! per invocation, performs one pass and is discarded.

use crate::convert::{ensure_dataset_description, set_intended_for, ConversionJob, RawConverter};
use crate::error::{RawbidsError, Result};
use crate::locate::locate;
use crate::site::{Site, SiteProfile};
use crate::types::{AcqTag, ScanCategory, SessionLabel, Task};
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a standardization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Raw data was converted into the standardized layout
    Standardized,
    /// The subject's output directory already existed; nothing was done
    AlreadyStandardized,
}

/// Semantic kind of a located raw scan
///
/// Functional and field-map scans carry the acquisition tag that ends up in
/// their output filename; anatomical and diffusion scans do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Anat,
    Func(Task),
    Dwi,
    Fmap(AcqTag),
}

impl ScanKind {
    /// Returns the category this kind belongs to
    pub fn category(&self) -> ScanCategory {
        match self {
            ScanKind::Anat => ScanCategory::Anat,
            ScanKind::Func(_) => ScanCategory::Func,
            ScanKind::Dwi => ScanCategory::Dwi,
            ScanKind::Fmap(_) => ScanCategory::Fmap,
        }
    }
}

/// A raw file matched to a semantic scan kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedScan {
    /// Path to the raw file
    pub path: PathBuf,
    /// Semantic kind the locator matched it against
    pub kind: ScanKind,
}

/// One subject's raw data and its standardization state
#[derive(Debug)]
pub struct Subject {
    raw_root: PathBuf,
    bids_root: PathBuf,
    subject_id: String,
    profile: SiteProfile,
    completed_sessions: BTreeSet<SessionLabel>,
    raw_session_count: usize,
    seqs: BTreeMap<ScanCategory, Vec<LocatedScan>>,
}

impl Subject {
    /// Builds a subject from its raw data root and the standardized root
    ///
    /// The subject identity and site format are derived from the trailing
    /// path component: a `sub` prefix marks NL data, anything else is UTD
    /// and the prefix is synthesized. The site is fixed for the subject's
    /// lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`RawbidsError::InvalidRawRoot`] if `raw_root` is not an
    /// existing directory.
    pub fn new(raw_root: impl AsRef<Path>, bids_root: impl AsRef<Path>) -> Result<Self> {
        let raw_root = raw_root.as_ref().to_path_buf();
        let bids_root = bids_root.as_ref().to_path_buf();

        if !raw_root.is_dir() {
            return Err(RawbidsError::InvalidRawRoot(raw_root));
        }

        let dir_name = raw_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| RawbidsError::InvalidRawRoot(raw_root.clone()))?;

        let site = Site::infer(&dir_name);
        let subject_id = match site {
            Site::Nl => dir_name,
            Site::Utd => format!("sub-{}", dir_name),
        };

        let completed_sessions = scan_completed_sessions(&bids_root.join(&subject_id))?;
        let raw_session_count = count_subdirectories(&raw_root)?;

        Ok(Self {
            raw_root,
            bids_root,
            subject_id,
            profile: SiteProfile::new(site),
            completed_sessions,
            raw_session_count,
            seqs: BTreeMap::new(),
        })
    }

    /// Returns the subject identifier (always `sub`-prefixed)
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Returns the inferred site format
    pub fn site(&self) -> Site {
        self.profile.site()
    }

    /// Returns the site profile in use
    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Returns the sessions already present under the standardized root
    pub fn completed_sessions(&self) -> &BTreeSet<SessionLabel> {
        &self.completed_sessions
    }

    /// Returns the number of raw acquisition folders found
    pub fn raw_session_count(&self) -> usize {
        self.raw_session_count
    }

    /// Returns the categorized raw files (populated by [`Subject::standardize`])
    pub fn categorized_files(&self) -> &BTreeMap<ScanCategory, Vec<LocatedScan>> {
        &self.seqs
    }

    /// Runs the full standardization pass for this subject
    ///
    /// Sessions are processed strictly in order, each at most once. A
    /// pre-existing subject output directory short-circuits the whole run;
    /// missing raw files for a category are diagnosed and skipped; a failed
    /// converter invocation aborts the remaining work.
    pub fn standardize(&mut self, converter: &dyn RawConverter) -> Result<Outcome> {
        let subject_out = self.bids_root.join(&self.subject_id);
        if subject_out.is_dir() {
            warn!(
                "standardized directory for {} exists, skipping conversion",
                self.subject_id
            );
            return Ok(Outcome::AlreadyStandardized);
        }

        fs::create_dir_all(&self.bids_root)?;
        ensure_dataset_description(&self.bids_root)?;

        self.categorize()?;
        let session_tags = self.profile.session_tags(&self.raw_root)?;

        fs::create_dir_all(&subject_out)?;
        for (idx, session) in SessionLabel::ALL.iter().enumerate() {
            if self.completed_sessions.contains(session) {
                info!("{}: {} already converted, skipping", self.subject_id, session);
                continue;
            }
            if session.ordinal() > self.raw_session_count || idx >= session_tags.len() {
                info!("{}: no raw acquisition for {}", self.subject_id, session);
                continue;
            }
            self.materialize_session(converter, &subject_out, *session, &session_tags[idx])?;
        }

        Ok(Outcome::Standardized)
    }

    /// Populates the per-category raw file listing via the locator
    ///
    /// One locator query per category token: the anatomical and diffusion
    /// markers, the five task tokens, and the field-map variants of the
    /// tasks plus diffusion. Queries that match nothing are diagnosed once
    /// and leave the category entry unfilled.
    fn categorize(&mut self) -> Result<()> {
        let mut queries: Vec<(ScanKind, &'static str)> =
            vec![(ScanKind::Anat, self.profile.anat_token())];
        for task in Task::ALL {
            queries.push((ScanKind::Func(task), self.profile.task_token(task)));
        }
        queries.push((ScanKind::Dwi, self.profile.dwi_token()));
        for acq in AcqTag::ALL {
            queries.push((ScanKind::Fmap(acq), self.profile.acq_token(acq)));
        }

        for (kind, token) in queries {
            let fieldmap = kind.category().is_fieldmap();
            let matches = locate(&self.profile, &self.raw_root, token, fieldmap)?;
            if matches.is_empty() {
                warn!(
                    "{}: no {} raw file matched \"{}\" (fieldmap: {})",
                    self.subject_id,
                    kind.category(),
                    token,
                    fieldmap
                );
                continue;
            }
            let entry = self.seqs.entry(kind.category()).or_default();
            for path in matches {
                entry.push(LocatedScan { path, kind });
            }
        }
        Ok(())
    }

    /// Converts every located raw file belonging to one session
    fn materialize_session(
        &self,
        converter: &dyn RawConverter,
        subject_out: &Path,
        session: SessionLabel,
        tag: &str,
    ) -> Result<()> {
        info!("{}: converting {}", self.subject_id, session);
        let session_out = subject_out.join(session.as_str());
        fs::create_dir(&session_out)?;
        for category in ScanCategory::ALL {
            fs::create_dir(session_out.join(category.dir_name()))?;
        }

        for category in ScanCategory::ALL {
            for scan in self.session_scans(category, tag) {
                let stem = self.output_stem(session, scan.kind);
                let out_dir = session_out.join(category.dir_name());
                let job = ConversionJob {
                    input: scan.path.clone(),
                    out_dir: out_dir.clone(),
                    stem: stem.clone(),
                };
                info!(
                    "{}: {} -> {}/{}",
                    self.subject_id,
                    scan.path.display(),
                    category,
                    stem
                );
                converter.convert(&job)?;

                if let ScanKind::Fmap(acq) = scan.kind {
                    self.link_fieldmap(&session_out, session, acq, &out_dir, &stem)?;
                }
            }
        }
        Ok(())
    }

    /// Selects this session's raw files for a category
    ///
    /// Filters the category listing to paths carrying the session tag and
    /// keeps the first (lexicographically smallest, the locator pre-sorts)
    /// file per scan kind. A UTD series directory matches every file it
    /// contains; the converter only needs one of them.
    fn session_scans(&self, category: ScanCategory, tag: &str) -> Vec<&LocatedScan> {
        let all = match self.seqs.get(&category) {
            Some(scans) => scans,
            None => return Vec::new(),
        };

        let mut seen: Vec<ScanKind> = Vec::new();
        let mut picked = Vec::new();
        for scan in all {
            if !scan.path.to_string_lossy().contains(tag) {
                continue;
            }
            if seen.contains(&scan.kind) {
                continue;
            }
            seen.push(scan.kind);
            picked.push(scan);
        }
        picked
    }

    /// Builds the canonical output filename stem for a scan
    fn output_stem(&self, session: SessionLabel, kind: ScanKind) -> String {
        let base = format!("{}_{}", self.subject_id, session.as_str());
        match kind {
            ScanKind::Anat => format!("{}_T1w", base),
            ScanKind::Func(task) => format!("{}_task-{}_bold", base, task.tag()),
            ScanKind::Dwi => format!("{}_dwi", base),
            ScanKind::Fmap(acq) => format!("{}_acq-{}_dir-AP_epi", base, acq.tag()),
        }
    }

    /// Points a freshly converted field map at the image it corrects
    ///
    /// The pair is resolved by exact acquisition tag: a task field map binds
    /// the bold image of the same task, the diffusion field map binds the
    /// diffusion image. Missing target or missing sidecar is diagnosed and
    /// skipped.
    fn link_fieldmap(
        &self,
        session_out: &Path,
        session: SessionLabel,
        acq: AcqTag,
        fmap_dir: &Path,
        fmap_stem: &str,
    ) -> Result<()> {
        let (target_kind, target_dir) = match acq {
            AcqTag::Task(task) => (ScanKind::Func(task), ScanCategory::Func),
            AcqTag::Dwi => (ScanKind::Dwi, ScanCategory::Dwi),
        };
        let target_stem = self.output_stem(session, target_kind);

        let image = find_image(&session_out.join(target_dir.dir_name()), &target_stem)?;
        let image = match image {
            Some(image) => image,
            None => {
                warn!(
                    "{}: no paired image for acq-{} field map, leaving sidecar unlinked",
                    self.subject_id,
                    acq.tag()
                );
                return Ok(());
            }
        };

        let sidecar = fmap_dir.join(format!("{}.json", fmap_stem));
        if !sidecar.is_file() {
            warn!(
                "{}: field map sidecar missing: {}",
                self.subject_id,
                sidecar.display()
            );
            return Ok(());
        }

        let target_name = image.file_name().map(|n| n.to_string_lossy().into_owned());
        let target_name = match target_name {
            Some(name) => name,
            None => return Ok(()),
        };
        let link = format!(
            "{}/{}/{}",
            session.as_str(),
            target_dir.dir_name(),
            target_name
        );
        set_intended_for(&sidecar, &link)
    }
}

/// Scans a subject output directory for already-converted sessions
fn scan_completed_sessions(subject_out: &Path) -> Result<BTreeSet<SessionLabel>> {
    let mut completed = BTreeSet::new();
    if !subject_out.is_dir() {
        return Ok(completed);
    }
    for entry in fs::read_dir(subject_out)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(label) = SessionLabel::from_dir_name(&name) {
            completed.insert(label);
        }
    }
    Ok(completed)
}

/// Counts raw acquisition folders under a raw root
fn count_subdirectories(root: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(root)? {
        if entry?.path().is_dir() {
            count += 1;
        }
    }
    Ok(count)
}

/// Finds the converted image with the given stem inside a directory
///
/// The converter writes one image plus one `.json` sidecar per job; the
/// stem match is exact and `.nii`/`.nii.gz` is preferred over auxiliary
/// outputs (bval/bvec) sharing the stem.
fn find_image(dir: &Path, stem: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let prefix = format!("{}.", stem);
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .map(|name| name.starts_with(&prefix) && !name.ends_with(".json"))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    let nii = candidates.iter().find(|path| {
        let name = path.to_string_lossy();
        name.ends_with(".nii") || name.ends_with(".nii.gz")
    });
    Ok(nii.cloned().or_else(|| candidates.first().cloned()))
}

//! Raw file locator
//!
//! Resolves a (sequence token, field-map flag) query to the matching raw
//! files under a subject's raw root. Matching is a pure function of
//! filesystem state: a site-shaped glob narrows candidates, then the
//! field-map marker splits plain images from their correction scans.

use crate::error::Result;
use crate::site::SiteProfile;
use glob::glob;
use std::path::{Path, PathBuf};

/// Locates raw files matching a sequence token
///
/// Builds the site glob for `token` under `root` and filters the matches by
/// the site's field-map marker: when `fieldmap` is set only paths containing
/// the marker are kept, otherwise they are excluded. The marker test is a
/// case-sensitive substring check on the whole path.
///
/// Returns the surviving paths sorted lexicographically, without
/// duplicates. An empty vec means no raw file matched; that is a
/// recoverable condition the caller is expected to diagnose and skip.
pub fn locate(
    profile: &SiteProfile,
    root: &Path,
    token: &str,
    fieldmap: bool,
) -> Result<Vec<PathBuf>> {
    let pattern = profile.glob_pattern(root, token);
    let marker = profile.fieldmap_marker();

    let mut matches: Vec<PathBuf> = glob(&pattern)?
        .filter_map(std::result::Result::ok)
        .filter(|path| {
            let has_marker = path.to_string_lossy().contains(marker);
            has_marker == fieldmap
        })
        .collect();

    matches.sort();
    matches.dedup();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Site;
    use rstest::rstest;
    use std::fs::{self, File};
    use tempfile::TempDir;

    /// Builds a UTD-shaped raw tree: root/<acq>/<series>/<file>
    fn utd_series(root: &Path, acq: &str, series: &str, file: &str) -> PathBuf {
        let dir = root.join(acq).join(series);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        File::create(&path).unwrap();
        path
    }

    /// Builds an NL-shaped raw tree: root/<ses>/<file>.PAR (+ .REC twin)
    fn nl_scan(root: &Path, ses: &str, stem: &str) -> PathBuf {
        let dir = root.join(ses);
        fs::create_dir_all(&dir).unwrap();
        File::create(dir.join(format!("{}.REC", stem))).unwrap();
        let path = dir.join(format!("{}.PAR", stem));
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn test_utd_locate_matches_series_contents() {
        let temp = TempDir::new().unwrap();
        let expected = utd_series(
            temp.path(),
            "Magnetom_Study20190412at093000",
            "T1_MPRAGE_4",
            "IM-0001.dcm",
        );

        let profile = SiteProfile::new(Site::Utd);
        let found = locate(&profile, temp.path(), "MPR", false).unwrap();
        assert_eq!(found, vec![expected]);
    }

    #[test]
    fn test_nl_locate_matches_par_only() {
        let temp = TempDir::new().unwrap();
        let expected = nl_scan(temp.path(), "ses-01", "sub-1126_T1w");

        let profile = SiteProfile::new(Site::Nl);
        let found = locate(&profile, temp.path(), "T1w", false).unwrap();
        // The .REC twin must not match
        assert_eq!(found, vec![expected]);
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_utd_fieldmap_marker_splits_matches(#[case] fieldmap: bool) {
        let temp = TempDir::new().unwrap();
        let acq = "Magnetom_Study20190412at093000";
        let bold = utd_series(temp.path(), acq, "BOLD_REST_7", "IM-0001.dcm");
        let topup = utd_series(temp.path(), acq, "BOLD_REST_TOP_UP_8", "IM-0001.dcm");

        let profile = SiteProfile::new(Site::Utd);
        let found = locate(&profile, temp.path(), "REST", fieldmap).unwrap();
        let expected = if fieldmap { topup } else { bold };
        assert_eq!(found, vec![expected]);
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn test_nl_fieldmap_marker_splits_matches(#[case] fieldmap: bool) {
        let temp = TempDir::new().unwrap();
        let bold = nl_scan(temp.path(), "ses-01", "sub-1126_task-rest_bold");
        let topup = nl_scan(temp.path(), "ses-01", "sub-1126_task-rest_topup");

        let profile = SiteProfile::new(Site::Nl);
        let found = locate(&profile, temp.path(), "rest", fieldmap).unwrap();
        let expected = if fieldmap { topup } else { bold };
        assert_eq!(found, vec![expected]);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let temp = TempDir::new().unwrap();
        // Lowercase marker in a UTD tree is not a field map
        let lower = utd_series(
            temp.path(),
            "Magnetom_Study20190412at093000",
            "BOLD_REST_top_up_8",
            "IM-0001.dcm",
        );

        let profile = SiteProfile::new(Site::Utd);
        assert!(locate(&profile, temp.path(), "REST", true)
            .unwrap()
            .is_empty());
        assert_eq!(
            locate(&profile, temp.path(), "REST", false).unwrap(),
            vec![lower]
        );
    }

    #[test]
    fn test_matches_are_sorted() {
        let temp = TempDir::new().unwrap();
        let b = nl_scan(temp.path(), "ses-02", "sub-1126_task-rest_bold");
        let a = nl_scan(temp.path(), "ses-01", "sub-1126_task-rest_bold");

        let profile = SiteProfile::new(Site::Nl);
        let found = locate(&profile, temp.path(), "rest", false).unwrap();
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let temp = TempDir::new().unwrap();
        let profile = SiteProfile::new(Site::Utd);
        let found = locate(&profile, temp.path(), "MPR", false).unwrap();
        assert!(found.is_empty());
    }
}

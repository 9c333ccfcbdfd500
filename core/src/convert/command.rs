use crate::error::{RawbidsError, Result};
use std::path::PathBuf;
use std::process::Command;

/// One planned invocation of the external converter
///
/// Converting `input` produces one image plus one sidecar named `stem`
/// (with converter-chosen extensions) inside `out_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Raw input file
    pub input: PathBuf,
    /// Output directory (must exist)
    pub out_dir: PathBuf,
    /// Output filename stem, without extension
    pub stem: String,
}

/// Converter seam for the standardizer
///
/// Implemented by the real subprocess wrapper and by the recording mock
/// used in tests. A converter call is blocking and performed once per raw
/// file; any failure is fatal for the subject.
pub trait RawConverter {
    /// Runs one conversion to completion
    fn convert(&self, job: &ConversionJob) -> Result<()>;
}

/// Subprocess wrapper around a dcm2niix-style binary
///
/// Command contract: `<binary> -p n -o <out_dir> -f <stem> <input>`,
/// exit code 0 on success.
#[derive(Debug, Clone)]
pub struct Dcm2niix {
    binary: PathBuf,
}

impl Dcm2niix {
    /// Creates a wrapper for the given converter binary
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Returns the wrapped binary path
    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }
}

impl RawConverter for Dcm2niix {
    fn convert(&self, job: &ConversionJob) -> Result<()> {
        let status = Command::new(&self.binary)
            .arg("-p")
            .arg("n")
            .arg("-o")
            .arg(&job.out_dir)
            .arg("-f")
            .arg(&job.stem)
            .arg(&job.input)
            .status()
            .map_err(|source| RawbidsError::ConverterUnavailable {
                binary: self.binary.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RawbidsError::ConversionFailed {
                input: job.input.clone(),
                status: status.code().unwrap_or(-1),
            })
        }
    }
}

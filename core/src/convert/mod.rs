//! External conversion and output metadata
//!
//! The proprietary-to-portable image conversion itself is an external
//! binary with a fixed command contract; this module wraps it behind the
//! [`RawConverter`] trait and owns the two metadata documents the engine
//! writes: per-image sidecars and the top-level dataset descriptor.

mod command;
mod descriptor;
mod sidecar;

pub use command::{ConversionJob, Dcm2niix, RawConverter};
pub use descriptor::{ensure_dataset_description, DESCRIPTOR_FILE};
pub use sidecar::{set_intended_for, INTENDED_FOR_KEY};

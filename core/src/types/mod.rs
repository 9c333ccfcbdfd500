//! Core type definitions for raw-scan standardization
//!
//! This module provides the fundamental types used throughout the rawbids library:
//! - [`ScanCategory`]: Semantic scan classes (anatomical, functional, diffusion, field map)
//! - [`Task`]: The five fixed functional task names
//! - [`AcqTag`]: Acquisition tag carried by functional and field-map outputs
//! - [`SessionLabel`]: Canonical session labels (`session-1`, `session-2`)

mod category;
mod session;

pub use category::{AcqTag, ScanCategory, Task};
pub use session::SessionLabel;

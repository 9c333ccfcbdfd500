pub mod cli;
pub mod convert;
pub mod error;
pub mod locate;
pub mod site;
pub mod subject;
pub mod types;

pub use convert::{ConversionJob, Dcm2niix, RawConverter};
pub use error::{RawbidsError, Result};
pub use site::{Site, SiteProfile};
pub use subject::{LocatedScan, Outcome, ScanKind, Subject};
pub use types::*;

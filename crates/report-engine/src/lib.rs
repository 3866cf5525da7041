//! PDF report rendering for contract analyses
//!
//! An embedded Typst template reads the analysis from `sys.inputs` and is
//! compiled in memory against the fonts bundled by `typst-assets`.
//!
//! - [`render_report`]: async, compiles on a blocking thread under a timeout
//! - [`render_report_sync`]: same pipeline without the timeout

pub mod error;
pub mod render;
pub mod templates;
pub mod world;

pub use error::ReportError;
pub use render::{render_report, render_report_sync, ReportArtifact, DEFAULT_RENDER_TIMEOUT_MS};

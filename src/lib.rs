//! orphanscan - find orphaned code in Go projects
//!
//! This library finds top-level symbols that cannot be reached from any
//! program entry point, so they can be deleted with confidence.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Loading** - Discover packages, parse their sources, resolve use-sites
//! 2. **Symbol extraction** - Record every named top-level declaration
//! 3. **Reference extraction** - Record every resolved use-site
//! 4. **Entry-point selection** - Enumerate roots from `main` packages
//! 5. **Reachability tracing** - BFS over the use-graph from the roots
//! 6. **Orphan selection** - Report defined-but-unreachable symbols

pub mod analysis;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod syntax;

pub use analysis::{AnalysisResult, Analyzer};
pub use config::Config;
pub use error::Error;
pub use model::{Kind, Position, Reference, Symbol};
pub use report::{ReportFormat, Reporter};

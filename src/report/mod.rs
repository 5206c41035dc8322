mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::AnalysisResult;
use crate::error::Result;

/// Output format for analysis results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable output, grouped by symbol kind.
    #[default]
    Terminal,
    /// Machine-readable JSON document on standard output.
    Json,
}

/// Reporter for analysis results.
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn report(&self, result: &AnalysisResult) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                TerminalReporter::new().report(result);
                Ok(())
            }
            ReportFormat::Json => JsonReporter::new().report(result),
        }
    }
}

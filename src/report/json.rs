//! JSON reporter: emits the result document and nothing else, so the
//! output is always parseable by tooling.

use crate::analysis::AnalysisResult;
use crate::error::Result;

pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, result: &AnalysisResult) -> Result<()> {
        let document = serde_json::to_string_pretty(result)?;
        println!("{}", document);
        Ok(())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

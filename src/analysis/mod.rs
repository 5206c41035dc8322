//! Orphaned-code analysis pipeline.
//!
//! The pipeline runs sequentially over shared in-memory state owned by one
//! [`Analyzer`] value: load packages, extract symbols, extract references,
//! pick entry-point packages, trace reachability, select orphans.

mod entry_points;
mod reachability;
mod references;
mod symbols;

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::loader::{self, Package};
use crate::model::{Reference, Symbol};

/// Complete results of one analysis run. Serializes to the JSON document
/// emitted in `--json` mode.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub project_path: String,
    pub total_symbols: usize,
    pub reachable_symbols: usize,
    pub main_packages: usize,
    pub orphaned_symbols: Vec<Symbol>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_packages: Vec<String>,
    pub included_tests: bool,
}

/// Performs the orphaned-code analysis. All state is created at pipeline
/// start and dropped with the analyzer; nothing is shared across instances.
pub struct Analyzer {
    config: Config,
    packages: Vec<Package>,
    symbols: HashMap<String, Symbol>,
    references: HashMap<String, Vec<Reference>>,
    reachable: HashSet<String>,
    main_packages: Vec<usize>,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            packages: Vec::new(),
            symbols: HashMap::new(),
            references: HashMap::new(),
            reachable: HashSet::new(),
            main_packages: Vec::new(),
        }
    }

    /// Run the whole pipeline and return the results.
    pub fn analyze(&mut self) -> Result<AnalysisResult> {
        self.packages = loader::load(&self.config)?;
        debug!("loaded {} packages", self.packages.len());

        self.collect_symbols();
        debug!("found {} symbols", self.symbols.len());

        self.collect_references();
        debug!("found references to {} distinct keys", self.references.len());

        self.select_main_packages();
        self.trace_reachability();

        let orphans = self.find_orphans();

        Ok(AnalysisResult {
            project_path: self.config.project_path.display().to_string(),
            total_symbols: self.symbols.len(),
            reachable_symbols: self.reachable.len(),
            main_packages: self.main_packages.len(),
            orphaned_symbols: orphans,
            excluded_packages: self.config.exclude.clone(),
            included_tests: self.config.include_tests,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The symbol table, keyed by `<package>.<name>.<kind>`.
    pub fn symbols(&self) -> &HashMap<String, Symbol> {
        &self.symbols
    }

    /// References grouped by target key, in syntactic-walk order.
    pub fn references(&self) -> &HashMap<String, Vec<Reference>> {
        &self.references
    }

    /// Keys marked reachable by the trace; always a subset of the symbol
    /// table's key set.
    pub fn reachable(&self) -> &HashSet<String> {
        &self.reachable
    }
}

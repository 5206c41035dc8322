//! Entry-point selection: which packages and symbols root the trace.

use tracing::debug;

use crate::model::{symbol_key, Kind};

use super::Analyzer;

impl Analyzer {
    /// Record every package whose clause name is `main`. When there is
    /// none, every retained package is treated as an entry-point package
    /// and the analysis degrades to reporting internal-only dead code.
    pub(crate) fn select_main_packages(&mut self) {
        self.main_packages = self
            .packages
            .iter()
            .enumerate()
            .filter(|(_, pkg)| pkg.name == "main")
            .map(|(index, _)| index)
            .collect();

        if self.main_packages.is_empty() {
            debug!("no main packages found - analyzing all packages for internal usage");
            self.main_packages = (0..self.packages.len()).collect();
        } else {
            debug!("found {} main package(s)", self.main_packages.len());
            for &index in &self.main_packages {
                debug!("    {}", self.packages[index].path);
            }
        }
    }

    /// Enumerate root keys and mark them reachable: `main` and `init` of
    /// every entry-point package, plus the package's exported symbols
    /// (external harnesses and tooling may call those directly). Roots
    /// that name no symbol in the table are never marked.
    pub(crate) fn entry_points(&mut self) -> Vec<String> {
        let mut queue = Vec::new();

        for &index in &self.main_packages {
            let pkg_path = &self.packages[index].path;

            for name in ["main", "init"] {
                let key = symbol_key(pkg_path, name, Kind::Function);
                if self.symbols.contains_key(&key) && self.reachable.insert(key.clone()) {
                    queue.push(key);
                }
            }

            let exported: Vec<String> = self
                .symbols
                .iter()
                .filter(|(_, symbol)| symbol.package == *pkg_path && symbol.exported)
                .map(|(key, _)| key.clone())
                .collect();
            for key in exported {
                if self.reachable.insert(key.clone()) {
                    queue.push(key);
                }
            }
        }

        queue
    }
}

//! Reachability trace and orphan selection.
//!
//! Classical BFS over symbol keys. Edges are resolved at file granularity:
//! a symbol's outgoing edges are every resolved use-site in the files of
//! its package that declare a matching top-level (name, kind). All
//! declarations sharing a file therefore share that file's edge set. The
//! approximation may add edges but never drops one, which keeps every
//! reported orphan genuinely unreachable.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::model::{Kind, Symbol};
use crate::syntax::ast::{Decl, Spec};
use crate::syntax::SourceFile;

use super::Analyzer;

impl Analyzer {
    /// BFS from the entry-point frontier, marking every visited key.
    pub(crate) fn trace_reachability(&mut self) {
        debug!("tracing reachability from entry-point packages");

        let mut queue: VecDeque<String> = self.entry_points().into();
        debug!("starting with {} entry points", queue.len());

        let mut visited: HashSet<String> = HashSet::new();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            let referenced = self.referenced_symbols(&current);
            for key in referenced {
                // Keys outside the symbol table (library symbols, builtins)
                // are discarded: reachable stays a subset of the table.
                if self.symbols.contains_key(&key) && self.reachable.insert(key.clone()) {
                    queue.push_back(key);
                }
            }
        }

        debug!(
            "reachability analysis: {}/{} symbols reachable",
            self.reachable.len(),
            self.symbols.len()
        );
    }

    /// Outgoing edges of one symbol, excluding self-edges: every resolved
    /// use-site in the containing files of its declaration.
    fn referenced_symbols(&self, key: &str) -> Vec<String> {
        let Some(symbol) = self.symbols.get(key) else {
            return Vec::new();
        };

        let mut referenced = Vec::new();
        for pkg in self
            .packages
            .iter()
            .filter(|pkg| pkg.path == symbol.package)
        {
            for file in &pkg.syntax {
                if !file_declares(file, &symbol.name, symbol.kind) {
                    continue;
                }
                for use_expr in file.uses() {
                    use_expr.for_each_ident(|ident| {
                        if let Some(object) = pkg.uses.get(&ident.id) {
                            let ref_key = object.key();
                            if ref_key != key {
                                referenced.push(ref_key);
                            }
                        }
                    });
                }
            }
        }
        referenced
    }

    /// Symbols defined but never reached, minus test-harness entry points.
    /// Order follows symbol-table iteration; formatters sort for display.
    pub(crate) fn find_orphans(&self) -> Vec<Symbol> {
        self.symbols
            .iter()
            .filter(|(key, symbol)| {
                !is_test_shaped(&symbol.name) && !self.reachable.contains(*key)
            })
            .map(|(_, symbol)| symbol.clone())
            .collect()
    }
}

/// Whether a file declares a top-level name matching (name, kind). Value
/// specs match for both variable and constant lookups.
fn file_declares(file: &SourceFile, name: &str, kind: Kind) -> bool {
    file.decls.iter().any(|decl| match decl {
        Decl::Func(func) => kind == Kind::Function && func.name.name == name,
        Decl::Gen(gen) => gen.specs.iter().any(|spec| match spec {
            Spec::Type(spec) => kind == Kind::Type && spec.name.name == name,
            Spec::Value(spec) => {
                (kind == Kind::Variable || kind == Kind::Constant)
                    && spec.names.iter().any(|n| n.name == name)
            }
        }),
    })
}

/// Test-harness entry points are reported separately by their runner and
/// never as orphans.
pub fn is_test_shaped(name: &str) -> bool {
    name.starts_with("Test") || name.starts_with("Benchmark") || name.starts_with("Example")
}

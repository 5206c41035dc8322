//! Reference extraction: every resolved use-site becomes a [`Reference`]
//! appended to the bucket of its target key.
//!
//! Buckets may name symbols that are not in the table (library symbols
//! defined outside the scanned packages); those are retained but never
//! influence reachability.

use std::collections::HashMap;

use crate::model::Reference;

use super::Analyzer;

impl Analyzer {
    pub(crate) fn collect_references(&mut self) {
        let mut references: HashMap<String, Vec<Reference>> = HashMap::new();

        for pkg in &self.packages {
            for (index, file) in pkg.syntax.iter().enumerate() {
                let Some(file_path) = pkg.files.get(index) else {
                    continue;
                };
                for use_expr in file.uses() {
                    use_expr.for_each_ident(|ident| {
                        if let Some(object) = pkg.uses.get(&ident.id) {
                            references.entry(object.key()).or_default().push(Reference {
                                file: file_path.clone(),
                                position: ident.span.start,
                            });
                        }
                    });
                }
            }
        }

        self.references = references;
    }
}

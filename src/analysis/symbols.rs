//! Symbol extraction: one [`Symbol`] per named top-level declaration.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Error;
use crate::model::{is_exported, Kind, Symbol};
use crate::syntax::ast::{Decl, GenKeyword, Spec};

use super::Analyzer;

impl Analyzer {
    /// Walk every retained package and record its top-level symbols. Keys
    /// collide last-wins; a colliding declaration is logged, never fatal.
    pub(crate) fn collect_symbols(&mut self) {
        let mut symbols: HashMap<String, Symbol> = HashMap::new();

        for pkg in &self.packages {
            for (index, file) in pkg.syntax.iter().enumerate() {
                let Some(file_path) = pkg.files.get(index) else {
                    let skip = Error::IndexMismatch {
                        package: pkg.path.clone(),
                        index,
                    };
                    debug!("skipping file: {}", skip);
                    continue;
                };

                for decl in &file.decls {
                    match decl {
                        Decl::Func(func) => {
                            if func.name.is_blank() {
                                continue;
                            }
                            let symbol = Symbol {
                                name: func.name.name.clone(),
                                kind: Kind::Function,
                                file: file_path.clone(),
                                start: func.span.start,
                                end: func.span.end,
                                exported: is_exported(&func.name.name),
                                package: pkg.path.clone(),
                            };
                            insert(&mut symbols, symbol);
                        }
                        Decl::Gen(gen) => {
                            for spec in &gen.specs {
                                match spec {
                                    Spec::Type(spec) => {
                                        if spec.name.is_blank() {
                                            continue;
                                        }
                                        let symbol = Symbol {
                                            name: spec.name.name.clone(),
                                            kind: Kind::Type,
                                            file: file_path.clone(),
                                            start: spec.span.start,
                                            end: spec.span.end,
                                            exported: is_exported(&spec.name.name),
                                            package: pkg.path.clone(),
                                        };
                                        insert(&mut symbols, symbol);
                                    }
                                    Spec::Value(spec) => {
                                        let kind = match gen.keyword {
                                            GenKeyword::Const => Kind::Constant,
                                            _ => Kind::Variable,
                                        };
                                        for name in &spec.names {
                                            if name.is_blank() {
                                                continue;
                                            }
                                            let symbol = Symbol {
                                                name: name.name.clone(),
                                                kind,
                                                file: file_path.clone(),
                                                start: name.span.start,
                                                end: name.span.end,
                                                exported: is_exported(&name.name),
                                                package: pkg.path.clone(),
                                            };
                                            insert(&mut symbols, symbol);
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        self.symbols = symbols;
    }
}

fn insert(symbols: &mut HashMap<String, Symbol>, symbol: Symbol) {
    let key = symbol.key();
    if let Some(previous) = symbols.insert(key.clone(), symbol) {
        debug!(
            "symbol key {} redeclared (previously in {})",
            key,
            previous.file.display()
        );
    }
}

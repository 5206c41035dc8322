//! Use-site resolution: associates identifier nodes with the semantic
//! object they denote, using the top-level scopes of every loaded package.
//!
//! Resolution is name-based and deliberately over-approximates: a use-site
//! that could denote a symbol is resolved to it even when full type
//! information would rule it out. The reachability tracer tolerates
//! spurious edges; dropped edges are what must never happen.

use std::collections::{BTreeMap, HashMap};

use crate::model::{is_exported, symbol_key, Kind};
use crate::syntax::ast::{Decl, GenKeyword, NodeId, SourceFile, Spec, UseExpr};

use super::Package;

/// The semantic object a use-site resolves to: name, defining-package
/// path (empty for predeclared identifiers) and kind.
#[derive(Debug, Clone)]
pub struct SemObject {
    pub name: String,
    pub package: String,
    pub kind: Kind,
}

impl SemObject {
    pub fn key(&self) -> String {
        symbol_key(&self.package, &self.name, self.kind)
    }
}

/// Top-level declared names of one package, by name.
type Scope = HashMap<String, Kind>;

/// Build the use-resolution map of every package in place.
pub(crate) fn resolve_uses(packages: &mut [Package]) {
    let mut scopes: HashMap<String, Scope> = HashMap::new();
    let mut clause_names: HashMap<String, String> = HashMap::new();
    // Fallback index for receiver-style selectors: name -> declaring
    // packages, in path order for determinism.
    let mut declared_in: BTreeMap<String, Vec<(String, Kind)>> = BTreeMap::new();

    for pkg in packages.iter() {
        let scope = scopes.entry(pkg.path.clone()).or_default();
        clause_names.insert(pkg.path.clone(), pkg.name.clone());
        for file in &pkg.syntax {
            collect_scope(file, scope);
        }
    }
    for (path, scope) in &scopes {
        for (name, kind) in scope {
            declared_in
                .entry(name.clone())
                .or_default()
                .push((path.clone(), *kind));
        }
    }
    for candidates in declared_in.values_mut() {
        candidates.sort();
    }

    let mut resolved: Vec<HashMap<NodeId, SemObject>> = Vec::with_capacity(packages.len());
    for pkg in packages.iter() {
        let mut uses = HashMap::new();
        let own_scope = &scopes[&pkg.path];
        for file in &pkg.syntax {
            let imports = import_table(file, &clause_names);
            let dots = dot_imports(file, &scopes);
            for use_expr in file.uses() {
                match use_expr {
                    UseExpr::Ident(ident) => {
                        if let Some(object) =
                            resolve_bare(&ident.name, &pkg.path, own_scope, &dots, &scopes)
                        {
                            uses.insert(ident.id, object);
                        }
                    }
                    UseExpr::Selector(selector) => {
                        // The base may itself denote a package-level object.
                        if !imports.contains_key(&selector.base.name) {
                            if let Some(object) = resolve_bare(
                                &selector.base.name,
                                &pkg.path,
                                own_scope,
                                &dots,
                                &scopes,
                            ) {
                                uses.insert(selector.base.id, object);
                            }
                        }
                        if let Some(object) = resolve_selector_tail(
                            selector,
                            &pkg.path,
                            own_scope,
                            &imports,
                            &scopes,
                            &declared_in,
                        ) {
                            uses.insert(selector.sel.id, object);
                        }
                    }
                }
            }
        }
        resolved.push(uses);
    }

    for (pkg, uses) in packages.iter_mut().zip(resolved) {
        pkg.uses = uses;
    }
}

fn collect_scope(file: &SourceFile, scope: &mut Scope) {
    for decl in &file.decls {
        match decl {
            Decl::Func(func) => {
                if !func.name.is_blank() {
                    scope.insert(func.name.name.clone(), Kind::Function);
                }
            }
            Decl::Gen(gen) => {
                for spec in &gen.specs {
                    match spec {
                        Spec::Type(spec) => {
                            if !spec.name.is_blank() {
                                scope.insert(spec.name.name.clone(), Kind::Type);
                            }
                        }
                        Spec::Value(spec) => {
                            let kind = match gen.keyword {
                                GenKeyword::Const => Kind::Constant,
                                _ => Kind::Variable,
                            };
                            for name in &spec.names {
                                if !name.is_blank() {
                                    scope.insert(name.name.clone(), kind);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Per-file import table: alias -> canonical path. Dot-imports merge into
/// the file's bare-identifier scope instead (see [`dot_imports`]); blank
/// imports never resolve anything.
fn import_table(
    file: &SourceFile,
    clause_names: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut table = HashMap::new();
    for import in &file.imports {
        let alias = match import.alias.as_deref() {
            Some(".") | Some("_") => continue,
            Some(alias) => alias.to_string(),
            None => default_alias(&import.path, clause_names),
        };
        table.insert(alias, import.path.clone());
    }
    table
}

/// Dot-imports of one file, split into packages that are part of this load
/// (their exported scope joins the file's bare-identifier scope) and a flag
/// for dot-imports of anything outside it.
struct DotImports {
    local: Vec<String>,
    external: bool,
}

fn dot_imports(file: &SourceFile, scopes: &HashMap<String, Scope>) -> DotImports {
    let mut local = Vec::new();
    let mut external = false;
    for import in &file.imports {
        if import.alias.as_deref() == Some(".") {
            if scopes.contains_key(&import.path) {
                local.push(import.path.clone());
            } else {
                external = true;
            }
        }
    }
    DotImports { local, external }
}

/// Default alias of an import: the imported package's clause name when it
/// is part of this load, its last path segment otherwise.
fn default_alias(path: &str, clause_names: &HashMap<String, String>) -> String {
    if let Some(name) = clause_names.get(path) {
        return name.clone();
    }
    path.rsplit('/').next().unwrap_or(path).to_string()
}

fn resolve_bare(
    name: &str,
    pkg_path: &str,
    own_scope: &Scope,
    dots: &DotImports,
    scopes: &HashMap<String, Scope>,
) -> Option<SemObject> {
    if let Some(&kind) = own_scope.get(name) {
        return Some(SemObject {
            name: name.to_string(),
            package: pkg_path.to_string(),
            kind,
        });
    }
    // Exported names of dot-imported packages land in the file scope.
    if is_exported(name) {
        for path in &dots.local {
            if let Some(&kind) = scopes.get(path).and_then(|scope| scope.get(name)) {
                return Some(SemObject {
                    name: name.to_string(),
                    package: path.clone(),
                    kind,
                });
            }
        }
    }
    if let Some(kind) = predeclared_kind(name) {
        return Some(SemObject {
            name: name.to_string(),
            package: String::new(),
            kind,
        });
    }
    if dots.external {
        // The name may come from a package outside the load; keep the
        // use-site rather than dropping it.
        return Some(SemObject {
            name: name.to_string(),
            package: String::new(),
            kind: Kind::Unknown,
        });
    }
    None
}

/// Resolve the tail of a selector. A base naming an import alias resolves
/// against the imported package (kind `Unknown` when that package is not
/// part of the load). Otherwise the base is some value and the tail is a
/// field or method: it resolves by name against the current package, then
/// against the first other package declaring that name.
fn resolve_selector_tail(
    selector: &crate::syntax::ast::SelectorExpr,
    pkg_path: &str,
    own_scope: &Scope,
    imports: &HashMap<String, String>,
    scopes: &HashMap<String, Scope>,
    declared_in: &BTreeMap<String, Vec<(String, Kind)>>,
) -> Option<SemObject> {
    let name = &selector.sel.name;

    if let Some(target_path) = imports.get(&selector.base.name) {
        let kind = scopes
            .get(target_path)
            .and_then(|scope| scope.get(name).copied())
            .unwrap_or(Kind::Unknown);
        return Some(SemObject {
            name: name.clone(),
            package: target_path.clone(),
            kind,
        });
    }

    if let Some(&kind) = own_scope.get(name) {
        return Some(SemObject {
            name: name.clone(),
            package: pkg_path.to_string(),
            kind,
        });
    }

    declared_in.get(name).and_then(|candidates| {
        candidates
            .iter()
            .find(|(path, _)| path != pkg_path)
            .map(|(path, kind)| SemObject {
                name: name.clone(),
                package: path.clone(),
                kind: *kind,
            })
    })
}

/// Kinds of Go's predeclared identifiers. Builtin functions and `nil` fall
/// outside the declared categories, matching how unresolvable semantic
/// objects are reported.
fn predeclared_kind(name: &str) -> Option<Kind> {
    match name {
        "bool" | "byte" | "complex64" | "complex128" | "error" | "float32" | "float64"
        | "int" | "int8" | "int16" | "int32" | "int64" | "rune" | "string" | "uint" | "uint8"
        | "uint16" | "uint32" | "uint64" | "uintptr" | "any" | "comparable" => Some(Kind::Type),
        "true" | "false" | "iota" => Some(Kind::Constant),
        "append" | "cap" | "clear" | "close" | "complex" | "copy" | "delete" | "imag" | "len"
        | "make" | "max" | "min" | "new" | "panic" | "print" | "println" | "real" | "recover"
        | "nil" => Some(Kind::Unknown),
        _ => None,
    }
}

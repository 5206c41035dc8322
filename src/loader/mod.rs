//! Package loader: discovers Go packages under a project root, parses their
//! sources and attaches a use-resolution map to each package.
//!
//! Packages with syntax errors are skipped entirely; packages matching an
//! exclusion pattern are dropped before indexing. Both are surfaced through
//! verbose logging, never as fatal errors. Only an unusable root (or a root
//! that yields no packages at all) aborts the run.

mod resolve;

pub use resolve::SemObject;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::syntax::ast::NodeId;
use crate::syntax::{NodeIds, Parser, SourceFile, SyntaxError};

/// A lex/parse problem tied to one file of a package.
#[derive(Debug, Clone)]
pub struct FileDiagnostic {
    pub file: PathBuf,
    pub message: String,
}

/// One loaded package: canonical path, compiled file list, syntax trees
/// parallel to that list, and resolved use-sites keyed by identifier node.
#[derive(Debug)]
pub struct Package {
    /// Package clause name (`main` for entry-point packages).
    pub name: String,
    /// Canonical path: module path joined with the root-relative directory.
    pub path: String,
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub syntax: Vec<SourceFile>,
    pub uses: HashMap<NodeId, SemObject>,
    pub errors: Vec<FileDiagnostic>,
}

/// Load, filter and resolve every package under the configured root.
pub fn load(config: &Config) -> Result<Vec<Package>> {
    let root = &config.project_path;
    if !root.is_dir() {
        return Err(Error::LoadFailure {
            path: root.clone(),
            reason: "not a directory".into(),
        });
    }

    let module_path = read_module_path(root);
    if let Some(ref module) = module_path {
        debug!("module path: {}", module);
    }

    let files_by_dir = discover_source_files(root, config.include_tests);
    let mut ids = NodeIds::new();
    let mut packages = Vec::new();

    for (dir, files) in files_by_dir {
        let path = canonical_path(root, &dir, module_path.as_deref());
        packages.extend(parse_directory(&dir, &path, files, &mut ids));
    }

    // Per-package errors are non-fatal: the package is dropped whole so a
    // half-parsed file can never leak partial declarations into the index.
    packages.retain(|pkg| {
        if !pkg.errors.is_empty() {
            let skip = Error::PackageError {
                package: pkg.path.clone(),
                count: pkg.errors.len(),
            };
            debug!("skipping: {}", skip);
            for diag in &pkg.errors {
                debug!("    {}: {}", diag.file.display(), diag.message);
            }
            return false;
        }
        if is_package_excluded(&pkg.path, &config.exclude) {
            debug!("excluding package {} (matches exclude pattern)", pkg.path);
            return false;
        }
        true
    });

    if packages.is_empty() {
        return Err(Error::LoadFailure {
            path: root.clone(),
            reason: "no Go packages found".into(),
        });
    }

    resolve::resolve_uses(&mut packages);
    Ok(packages)
}

/// Walk the root and group source files per directory, in path order.
fn discover_source_files(root: &Path, include_tests: bool) -> BTreeMap<PathBuf, Vec<PathBuf>> {
    let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.') && name != "vendor" && name != "testdata"
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !is_source_file(&name, include_tests) {
            continue;
        }
        if let Some(parent) = entry.path().parent() {
            by_dir
                .entry(parent.to_path_buf())
                .or_default()
                .push(entry.path().to_path_buf());
        }
    }
    by_dir
}

fn is_source_file(name: &str, include_tests: bool) -> bool {
    name.ends_with(".go")
        && !name.starts_with('_')
        && !name.starts_with('.')
        && (include_tests || !name.ends_with("_test.go"))
}

/// Parse every file of one directory. Files are grouped by package clause:
/// the first clause seen keeps the directory's canonical path, any further
/// clause (an external test package, typically) gets a suffixed path.
fn parse_directory(
    dir: &Path,
    path: &str,
    files: Vec<PathBuf>,
    ids: &mut NodeIds,
) -> Vec<Package> {
    let mut groups: Vec<Package> = Vec::new();
    let mut read_errors: Vec<FileDiagnostic> = Vec::new();

    for file in files {
        let contents = match fs::read_to_string(&file) {
            Ok(contents) => contents,
            Err(err) => {
                read_errors.push(FileDiagnostic {
                    file,
                    message: err.to_string(),
                });
                continue;
            }
        };

        let (syntax, errors) = Parser::parse_file(&contents, ids);
        let clause = syntax.package.clone();
        let index = match groups.iter().position(|g| g.name == clause) {
            Some(index) => index,
            None => {
                let pkg_path = if groups.is_empty() {
                    path.to_string()
                } else {
                    format!("{}.{}", path, clause)
                };
                groups.push(Package {
                    name: clause,
                    path: pkg_path,
                    dir: dir.to_path_buf(),
                    files: Vec::new(),
                    syntax: Vec::new(),
                    uses: HashMap::new(),
                    errors: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group
            .errors
            .extend(errors.into_iter().map(|e| syntax_diagnostic(&file, e)));
        group.files.push(file);
        group.syntax.push(syntax);
    }

    if !read_errors.is_empty() {
        match groups.first_mut() {
            Some(group) => group.errors.extend(read_errors),
            None => {
                let name = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                groups.push(Package {
                    name,
                    path: path.to_string(),
                    dir: dir.to_path_buf(),
                    files: Vec::new(),
                    syntax: Vec::new(),
                    uses: HashMap::new(),
                    errors: read_errors,
                });
            }
        }
    }

    groups
}

fn syntax_diagnostic(file: &Path, error: SyntaxError) -> FileDiagnostic {
    FileDiagnostic {
        file: file.to_path_buf(),
        message: error.to_string(),
    }
}

/// Canonical package path: the module path joined with the root-relative
/// directory, or the relative directory alone when there is no `go.mod`.
fn canonical_path(root: &Path, dir: &Path, module_path: Option<&str>) -> String {
    let rel: Vec<String> = dir
        .strip_prefix(root)
        .unwrap_or(dir)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let rel = rel.join("/");
    match (module_path, rel.is_empty()) {
        (Some(module), true) => module.to_string(),
        (Some(module), false) => format!("{}/{}", module, rel),
        (None, true) => ".".to_string(),
        (None, false) => rel,
    }
}

/// Extract the module path from `go.mod` at the project root, if any.
fn read_module_path(root: &Path) -> Option<String> {
    let contents = fs::read_to_string(root.join("go.mod")).ok()?;
    for line in contents.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("module") {
            if rest.starts_with(char::is_whitespace) {
                let path = rest.trim().trim_matches('"');
                if !path.is_empty() {
                    return Some(path.to_string());
                }
            }
        }
    }
    None
}

/// A package is excluded when a pattern glob-matches its whole path, or
/// when the path contains the pattern with leading/trailing `*` stripped.
pub fn is_package_excluded(path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Ok(compiled) = glob::Pattern::new(pattern) {
            if compiled.matches(path) {
                return true;
            }
        }
        path.contains(pattern.trim_matches('*'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_matches_globs_and_substrings() {
        let patterns = vec!["vendor/*".to_string(), "*generated*".to_string()];
        assert!(is_package_excluded("vendor/lib", &patterns));
        assert!(is_package_excluded("app/generated/types", &patterns));
        assert!(!is_package_excluded("app/server", &patterns));
    }

    #[test]
    fn star_pattern_excludes_everything() {
        let patterns = vec!["*".to_string()];
        assert!(is_package_excluded("anything/at/all", &patterns));
    }

    #[test]
    fn module_path_parses_from_go_mod() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("go.mod"),
            "module example.com/demo\n\ngo 1.22\n",
        )
        .unwrap();
        assert_eq!(
            read_module_path(dir.path()).as_deref(),
            Some("example.com/demo")
        );
    }

    #[test]
    fn test_files_are_filtered_by_default() {
        assert!(is_source_file("server.go", false));
        assert!(!is_source_file("server_test.go", false));
        assert!(is_source_file("server_test.go", true));
        assert!(!is_source_file("_gen.go", false));
        assert!(!is_source_file("notes.txt", false));
    }

    #[test]
    fn canonical_paths_join_module_and_directory() {
        let root = Path::new("/work/demo");
        assert_eq!(
            canonical_path(root, Path::new("/work/demo"), Some("example.com/demo")),
            "example.com/demo"
        );
        assert_eq!(
            canonical_path(
                root,
                Path::new("/work/demo/internal/db"),
                Some("example.com/demo")
            ),
            "example.com/demo/internal/db"
        );
        assert_eq!(canonical_path(root, Path::new("/work/demo/lib"), None), "lib");
        assert_eq!(canonical_path(root, Path::new("/work/demo"), None), ".");
    }
}

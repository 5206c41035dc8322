//! End-to-end analysis tests over real fixture projects on disk.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use orphanscan::{AnalysisResult, Analyzer, Config};
use tempfile::TempDir;

/// Write a Go project into a tempdir: a `go.mod` plus the given files.
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::write(
        dir.path().join("go.mod"),
        "module example.com/demo\n\ngo 1.22\n",
    )
    .expect("write go.mod");
    for (path, contents) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(full, contents).expect("write fixture file");
    }
    dir
}

fn analyze_with(dir: &Path, configure: impl FnOnce(&mut Config)) -> (Analyzer, AnalysisResult) {
    let mut config = Config {
        project_path: dir.to_path_buf(),
        ..Config::default()
    };
    configure(&mut config);
    let mut analyzer = Analyzer::new(config);
    let result = analyzer.analyze().expect("analysis failed");
    (analyzer, result)
}

fn analyze(dir: &Path) -> (Analyzer, AnalysisResult) {
    analyze_with(dir, |_| {})
}

fn orphan_names(result: &AnalysisResult) -> Vec<String> {
    let mut names: Vec<_> = result
        .orphaned_symbols
        .iter()
        .map(|s| s.name.clone())
        .collect();
    names.sort();
    names
}

#[test]
fn unused_function_in_main_package_is_orphaned() {
    let dir = project(&[
        (
            "a.go",
            "package main\n\nfunc main() {\n\tused()\n}\n",
        ),
        (
            "b.go",
            "package main\n\nfunc used() {}\n\nfunc unused() {}\n",
        ),
    ]);

    let (_, result) = analyze(dir.path());
    assert_eq!(orphan_names(&result), vec!["unused"]);
    assert_eq!(result.total_symbols, 3);
    assert_eq!(result.reachable_symbols, 2);
    assert_eq!(result.main_packages, 1);
}

#[test]
fn reachability_crosses_package_boundaries() {
    let dir = project(&[
        (
            "cmd/main.go",
            concat!(
                "package main\n\n",
                "import \"example.com/demo/lib\"\n\n",
                "func main() {\n\tlib.Do()\n}\n",
            ),
        ),
        (
            "lib/lib.go",
            concat!(
                "package lib\n\n",
                "func Do() {\n\thelper()\n}\n\n",
                "func helper() {}\n\n",
                "func stale() {}\n",
            ),
        ),
    ]);

    let (analyzer, result) = analyze(dir.path());
    assert_eq!(orphan_names(&result), vec!["stale"]);
    assert!(analyzer
        .reachable()
        .contains("example.com/demo/lib.Do.function"));
    assert!(analyzer
        .reachable()
        .contains("example.com/demo/lib.helper.function"));
    assert_eq!(
        result.orphaned_symbols[0].package,
        "example.com/demo/lib"
    );
}

#[test]
fn library_mode_roots_every_exported_symbol() {
    let dir = project(&[(
        "lib/lib.go",
        concat!(
            "package lib\n\n",
            "func Public() {\n\tprivate()\n}\n\n",
            "func private() {}\n\n",
            "func Unused() {}\n\n",
            "func stranded() {}\n",
        ),
    )]);

    let (analyzer, result) = analyze(dir.path());
    assert_eq!(orphan_names(&result), vec!["stranded"]);
    // Exported-but-uncalled symbols are roots in library mode.
    assert!(analyzer
        .reachable()
        .contains("example.com/demo/lib.Unused.function"));
    assert!(analyzer
        .reachable()
        .contains("example.com/demo/lib.private.function"));
}

#[test]
fn test_shaped_symbols_are_never_reported() {
    let dir = project(&[
        ("main.go", "package main\n\nfunc main() {}\n"),
        (
            "helpers.go",
            concat!(
                "package main\n\n",
                "func TestFoo() {}\n\n",
                "func BenchmarkBar() {}\n\n",
                "func ExampleBaz() {}\n\n",
                "func helperNotCalled() {}\n",
            ),
        ),
    ]);

    let (_, result) = analyze(dir.path());
    assert_eq!(orphan_names(&result), vec!["helperNotCalled"]);
}

#[test]
fn init_functions_and_blank_assignments_propagate_reachability() {
    let dir = project(&[
        ("main.go", "package main\n\nfunc main() {}\n"),
        (
            "setup.go",
            concat!(
                "package main\n\n",
                "var _ = sentinel()\n\n",
                "func init() {\n\tsetup()\n}\n\n",
                "func setup() {}\n\n",
                "func sentinel() int {\n\treturn 1\n}\n",
            ),
        ),
    ]);

    let (analyzer, result) = analyze(dir.path());
    assert!(orphan_names(&result).is_empty());
    assert!(analyzer
        .reachable()
        .contains("example.com/demo.setup.function"));
    assert!(analyzer
        .reachable()
        .contains("example.com/demo.sentinel.function"));
    // The blank placeholder never becomes a symbol.
    assert!(analyzer.symbols().values().all(|s| s.name != "_"));
}

#[test]
fn exported_surface_of_main_package_is_rooted() {
    let dir = project(&[(
        "main.go",
        concat!(
            "package main\n\n",
            "func main() {}\n\n",
            "func HelperForTests() {}\n",
        ),
    )]);

    let (analyzer, result) = analyze(dir.path());
    assert!(orphan_names(&result).is_empty());
    assert!(analyzer
        .reachable()
        .contains("example.com/demo.HelperForTests.function"));
}

#[test]
fn variables_constants_and_types_participate() {
    let dir = project(&[(
        "main.go",
        concat!(
            "package main\n\n",
            "type config struct {\n\tlimit int\n}\n\n",
            "type unusedType struct{}\n\n",
            "const defaultLimit = 10\n\n",
            "const staleLimit = 99\n\n",
            "var current = config{limit: defaultLimit}\n\n",
            "var abandoned = 3\n\n",
            "func main() {\n\t_ = current\n}\n",
        ),
    )]);

    let (_, result) = analyze(dir.path());
    assert_eq!(
        orphan_names(&result),
        vec!["abandoned", "staleLimit", "unusedType"]
    );
    let kinds: HashSet<_> = result
        .orphaned_symbols
        .iter()
        .map(|s| (s.name.clone(), s.kind.as_str()))
        .collect();
    assert!(kinds.contains(&("abandoned".to_string(), "variable")));
    assert!(kinds.contains(&("staleLimit".to_string(), "constant")));
    assert!(kinds.contains(&("unusedType".to_string(), "type")));
}

#[test]
fn methods_called_through_values_stay_reachable() {
    let dir = project(&[(
        "main.go",
        concat!(
            "package main\n\n",
            "type server struct{}\n\n",
            "func newServer() server {\n\treturn server{}\n}\n\n",
            "func (s server) handle() {}\n\n",
            "func (s server) neverCalled() {}\n\n",
            "func main() {\n\tsrv := newServer()\n\tsrv.handle()\n}\n",
        ),
    )]);

    let (analyzer, result) = analyze(dir.path());
    assert!(analyzer
        .reachable()
        .contains("example.com/demo.handle.function"));
    assert_eq!(orphan_names(&result), vec!["neverCalled"]);
}

#[test]
fn chained_selector_calls_keep_methods_reachable() {
    let dir = project(&[(
        "main.go",
        concat!(
            "package main\n\n",
            "type db struct{}\n\n",
            "func (d db) connect() {}\n\n",
            "type app struct {\n\tstore db\n}\n\n",
            "func main() {\n\tvar a app\n\ta.store.connect()\n}\n",
        ),
    )]);

    let (analyzer, result) = analyze(dir.path());
    assert!(analyzer
        .reachable()
        .contains("example.com/demo.connect.function"));
    assert!(orphan_names(&result).is_empty());
}

#[test]
fn dot_imported_packages_resolve_bare_calls() {
    let dir = project(&[
        (
            "cmd/main.go",
            concat!(
                "package main\n\n",
                "import . \"example.com/demo/lib\"\n\n",
                "func main() {\n\tDo()\n}\n",
            ),
        ),
        (
            "lib/lib.go",
            concat!(
                "package lib\n\n",
                "func Do() {\n\thelper()\n}\n\n",
                "func helper() {}\n",
            ),
        ),
    ]);

    let (analyzer, result) = analyze(dir.path());
    assert!(analyzer
        .reachable()
        .contains("example.com/demo/lib.Do.function"));
    assert!(analyzer
        .reachable()
        .contains("example.com/demo/lib.helper.function"));
    assert!(orphan_names(&result).is_empty());
}

#[test]
fn reachable_membership_is_deterministic_across_runs() {
    let dir = project(&[
        (
            "cmd/main.go",
            concat!(
                "package main\n\n",
                "import \"example.com/demo/lib\"\n\n",
                "func main() {\n\tlib.Do()\n}\n",
            ),
        ),
        (
            "lib/lib.go",
            concat!(
                "package lib\n\n",
                "func Do() {\n\thelper()\n}\n\n",
                "func helper() {}\n\n",
                "func stale() {}\n",
            ),
        ),
    ]);

    let (first, first_result) = analyze(dir.path());
    let (second, second_result) = analyze(dir.path());
    assert_eq!(first.reachable(), second.reachable());
    assert_eq!(orphan_names(&first_result), orphan_names(&second_result));
}

#[test]
fn every_root_present_in_the_table_is_reachable() {
    let dir = project(&[(
        "main.go",
        concat!(
            "package main\n\n",
            "func main() {}\n\n",
            "func init() {}\n\n",
            "func Exported() {}\n",
        ),
    )]);

    let (analyzer, _) = analyze(dir.path());
    for root in [
        "example.com/demo.main.function",
        "example.com/demo.init.function",
        "example.com/demo.Exported.function",
    ] {
        assert!(
            analyzer.reachable().contains(root),
            "root {} should be reachable",
            root
        );
    }
}

#[test]
fn reachable_is_a_subset_of_the_symbol_table() {
    let dir = project(&[(
        "main.go",
        concat!(
            "package main\n\n",
            "import \"fmt\"\n\n",
            "func main() {\n\tfmt.Println(len(\"x\"))\n}\n",
        ),
    )]);

    let (analyzer, result) = analyze(dir.path());
    for key in analyzer.reachable() {
        assert!(
            analyzer.symbols().contains_key(key),
            "reachable key {} missing from symbol table",
            key
        );
    }
    // Cross-boundary references are retained but contribute nothing.
    assert!(analyzer.references().contains_key("fmt.Println.unknown"));
    assert_eq!(result.reachable_symbols, 1);
}

#[test]
fn counts_add_up_without_test_shaped_symbols() {
    let dir = project(&[
        ("a.go", "package main\n\nfunc main() {\n\tused()\n}\n"),
        (
            "b.go",
            "package main\n\nfunc used() {}\n\nfunc unused() {}\n",
        ),
    ]);

    let (_, result) = analyze(dir.path());
    assert_eq!(
        result.reachable_symbols + result.orphaned_symbols.len(),
        result.total_symbols
    );
}

#[test]
fn excluded_packages_are_dropped_before_indexing() {
    let dir = project(&[
        (
            "cmd/main.go",
            concat!(
                "package main\n\n",
                "import \"example.com/demo/gen\"\n\n",
                "func main() {\n\tgen.Run()\n}\n",
            ),
        ),
        (
            "gen/gen.go",
            "package gen\n\nfunc Run() {}\n\nfunc stale() {}\n",
        ),
    ]);

    let (analyzer, result) = analyze_with(dir.path(), |config| {
        config.exclude = vec!["*gen*".to_string()];
    });
    assert!(orphan_names(&result).is_empty());
    assert!(analyzer
        .symbols()
        .keys()
        .all(|key| !key.contains("/gen.")));
    assert_eq!(result.excluded_packages, vec!["*gen*"]);
}

#[test]
fn packages_with_syntax_errors_are_skipped_whole() {
    let dir = project(&[
        ("main.go", "package main\n\nfunc main() {}\n"),
        (
            "broken/broken.go",
            "package broken\n\nfunc lonely( {\n",
        ),
    ]);

    let (analyzer, result) = analyze(dir.path());
    assert!(analyzer
        .symbols()
        .values()
        .all(|s| s.package != "example.com/demo/broken"));
    assert!(orphan_names(&result).is_empty());
}

#[test]
fn include_tests_pulls_test_files_into_the_load() {
    let files = [
        (
            "main.go",
            "package main\n\nfunc main() {}\n\nfunc helper() {}\n",
        ),
        (
            "main_test.go",
            "package main\n\nfunc TestHelper() {\n\thelper()\n}\n",
        ),
    ];

    let without = project(&files);
    let (_, result) = analyze(without.path());
    assert_eq!(orphan_names(&result), vec!["helper"]);

    let with = project(&files);
    let (_, result) = analyze_with(with.path(), |config| {
        config.include_tests = true;
    });
    assert!(orphan_names(&result).is_empty());
    assert!(result.included_tests);
}

#[test]
fn missing_project_root_is_a_load_failure() {
    let config = Config {
        project_path: Path::new("/nonexistent/project").to_path_buf(),
        ..Config::default()
    };
    let mut analyzer = Analyzer::new(config);
    assert!(analyzer.analyze().is_err());
}

#[test]
fn positions_point_at_declarations() {
    let dir = project(&[(
        "main.go",
        "package main\n\nfunc main() {}\n\nfunc unused() {}\n",
    )]);

    let (_, result) = analyze(dir.path());
    let orphan = &result.orphaned_symbols[0];
    assert_eq!(orphan.name, "unused");
    assert_eq!(orphan.start.line, 5);
    assert_eq!(orphan.start.column, 1);
    assert!(orphan.file.ends_with("main.go"));
    assert!(!orphan.exported);
}

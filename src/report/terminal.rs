//! Terminal reporter: orphans grouped by kind with relative paths, and a
//! closing summary with the orphan rate.

use std::collections::HashMap;
use std::path::Path;

use colored::Colorize;

use crate::analysis::AnalysisResult;
use crate::model::{Kind, Symbol};

pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, result: &AnalysisResult) {
        if result.orphaned_symbols.is_empty() {
            println!();
            println!("{}", "✅ No orphaned code found!".green().bold());
            println!("All symbols are reachable from entry-point packages.");
            return;
        }

        println!();
        println!("{}", "🗑️  ORPHANED CODE ANALYSIS".bold());
        println!(
            "Found {} symbols that are NOT reachable from any entry point:\n",
            result.orphaned_symbols.len().to_string().yellow().bold()
        );

        let mut by_kind: HashMap<Kind, Vec<&Symbol>> = HashMap::new();
        for orphan in &result.orphaned_symbols {
            by_kind.entry(orphan.kind).or_default().push(orphan);
        }

        let project_root = Path::new(&result.project_path);
        for kind in [Kind::Function, Kind::Type, Kind::Variable, Kind::Constant] {
            let Some(symbols) = by_kind.get_mut(&kind) else {
                continue;
            };
            symbols.sort_by(|a, b| (&a.file, a.start.line).cmp(&(&b.file, b.start.line)));

            println!("=== {}s ===", kind.display_name().cyan().bold());
            for symbol in symbols.iter() {
                let rel_path = symbol
                    .file
                    .strip_prefix(project_root)
                    .unwrap_or(&symbol.file);
                let visibility = if symbol.exported {
                    "exported".green()
                } else {
                    "private".dimmed()
                };
                println!(
                    "  📍 {} ({}) - {}",
                    symbol.name.bold(),
                    visibility,
                    format!("{}:{}", rel_path.display(), symbol.start).dimmed()
                );
            }
            println!();
        }

        self.print_summary(result);
    }

    fn print_summary(&self, result: &AnalysisResult) {
        println!(
            "{}",
            "💡 These symbols are not reachable from any main() or init() function.".dimmed()
        );
        println!(
            "{}",
            "💡 Test functions are excluded as they have separate entry points.".dimmed()
        );
        if result.main_packages > 0 {
            println!(
                "{}",
                format!(
                    "💡 Analysis based on {} entry-point package(s) found in the project.",
                    result.main_packages
                )
                .dimmed()
            );
        }

        println!();
        println!("{}", "📊 Analysis Summary:".bold());
        println!("  • Total symbols: {}", result.total_symbols);
        println!("  • Reachable symbols: {}", result.reachable_symbols);
        println!("  • Orphaned symbols: {}", result.orphaned_symbols.len());
        if result.total_symbols > 0 {
            let rate =
                result.orphaned_symbols.len() as f64 / result.total_symbols as f64 * 100.0;
            println!("  • Orphan rate: {:.1}%", rate);
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use orphanscan::analysis::Analyzer;
use orphanscan::config::{
    home_dir, Config, FileConfig, CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE,
};
use orphanscan::report::{ReportFormat, Reporter};

/// orphanscan - find orphaned code in Go projects
///
/// Traces execution paths from main() and init() functions to identify
/// symbols that are genuinely unreachable, so dead code can be removed
/// with confidence.
#[derive(Parser, Debug)]
#[command(name = "orphanscan")]
#[command(author, version, about)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Verbose output with detailed progress
    #[arg(short, long)]
    verbose: bool,

    /// Exclude packages matching these patterns (repeatable, comma-joined)
    #[arg(short, long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Include test files in the analysis
    #[arg(long)]
    include_tests: bool,

    /// Path to configuration file (default is $HOME/.orphanscan.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print version information including build metadata
    Version,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show the current configuration values from all sources
    Show,
    /// Create a default configuration file in the home directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    match &cli.command {
        Some(Commands::Version) => {
            print_version();
            Ok(())
        }
        Some(Commands::Config { action }) => run_config(action, &cli),
        None => run_analysis(&cli),
    }
}

fn run_analysis(cli: &Cli) -> Result<()> {
    let (mut file_config, config_path) = FileConfig::load(cli.config.as_deref())?;
    file_config.apply_env();

    // CLI flags override environment, which overrides the file.
    let output_json = cli.json || file_config.json;
    let verbose = cli.verbose || file_config.verbose;
    let include_tests = cli.include_tests || file_config.include_tests;
    let mut exclude = file_config.exclude;
    exclude.extend(cli.exclude.iter().cloned());

    init_logging(verbose, output_json);

    info!("orphanscan v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &config_path {
        debug!("using config file: {}", path.display());
    }

    let project_path = std::path::absolute(&cli.path).into_diagnostic()?;
    debug!("analyzing project at: {}", project_path.display());
    if !exclude.is_empty() {
        debug!("excluding patterns: {:?}", exclude);
    }
    if include_tests {
        debug!("including test files in analysis");
    }

    let config = Config {
        project_path,
        output_json,
        verbose,
        exclude,
        include_tests,
    };

    let mut analyzer = Analyzer::new(config);
    let result = analyzer.analyze()?;

    let format = if output_json {
        ReportFormat::Json
    } else {
        ReportFormat::Terminal
    };
    Reporter::new(format).report(&result)?;

    Ok(())
}

fn init_logging(verbose: bool, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if json {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_version() {
    println!("orphanscan {}", env!("CARGO_PKG_VERSION"));
    println!(
        "Commit: {}",
        option_env!("ORPHANSCAN_COMMIT").unwrap_or("unknown")
    );
    println!(
        "Built: {}",
        option_env!("ORPHANSCAN_BUILD_DATE").unwrap_or("unknown")
    );
}

fn run_config(action: &ConfigAction, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (mut file_config, config_path) = FileConfig::load(cli.config.as_deref())?;
            file_config.apply_env();

            println!("Current configuration:");
            match config_path {
                Some(path) => println!("Config file: {}", path.display()),
                None => println!("Config file: (none)"),
            }
            println!("JSON output: {}", file_config.json);
            println!("Verbose: {}", file_config.verbose);
            println!("Exclude patterns: {:?}", file_config.exclude);
            println!("Include tests: {}", file_config.include_tests);
            Ok(())
        }
        ConfigAction::Init => {
            let home = home_dir()
                .ok_or_else(|| miette::miette!("failed to determine home directory"))?;
            let config_path = home.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                miette::bail!("config file already exists at {}", config_path.display());
            }

            std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE).into_diagnostic()?;
            println!(
                "{}",
                format!("✅ Created config file at {}", config_path.display()).green()
            );
            Ok(())
        }
    }
}

//! Configuration layering: built-in defaults, then a YAML config file,
//! then `ORPHANSCAN_*` environment variables, then CLI flags.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const CONFIG_FILE_NAME: &str = ".orphanscan.yaml";
pub const ENV_PREFIX: &str = "ORPHANSCAN_";

/// Default config file contents written by `orphanscan config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = "\
# orphanscan configuration file

# Output format
json: false
verbose: false

# Analysis options
include-tests: false

# Exclude patterns (glob patterns for package paths)
exclude:
  - \"vendor/*\"
";

/// Effective settings for one analysis run.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_path: PathBuf,
    pub output_json: bool,
    pub verbose: bool,
    pub exclude: Vec<String>,
    pub include_tests: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_path: PathBuf::from("."),
            output_json: false,
            verbose: false,
            exclude: Vec::new(),
            include_tests: false,
        }
    }
}

/// The on-disk shape of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileConfig {
    pub json: bool,
    pub verbose: bool,
    pub include_tests: bool,
    pub exclude: Vec<String>,
}

impl FileConfig {
    /// Load the file config, from an explicit path or the default search
    /// locations (home directory first, then the current directory). A
    /// missing default file is not an error; a missing explicit one is.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), Error> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            return Ok((config, Some(path.to_path_buf())));
        }
        for path in Self::default_locations() {
            if path.is_file() {
                let config = Self::from_file(&path)?;
                return Ok((config, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigFailure {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        serde_yaml::from_str(&contents).map_err(|e| Error::ConfigFailure {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();
        if let Some(home) = home_dir() {
            locations.push(home.join(CONFIG_FILE_NAME));
        }
        locations.push(PathBuf::from(CONFIG_FILE_NAME));
        locations
    }

    /// Overlay `ORPHANSCAN_*` environment variables on the file values.
    pub fn apply_env(&mut self) {
        if let Some(value) = env_bool("JSON") {
            self.json = value;
        }
        if let Some(value) = env_bool("VERBOSE") {
            self.verbose = value;
        }
        if let Some(value) = env_bool("INCLUDE_TESTS") {
            self.include_tests = value;
        }
        if let Ok(value) = env::var(format!("{ENV_PREFIX}EXCLUDE")) {
            self.exclude = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }
}

pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

fn env_bool(key: &str) -> Option<bool> {
    let value = env::var(format!("{ENV_PREFIX}{key}")).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

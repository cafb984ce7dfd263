//! Configuration settings for treefs
//!
//! Defines which tree operations a composed filesystem exposes, the
//! defaults they run with, and the CLI arguments of the `treefs` binary.

use crate::error::{Result, TreeError};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default stream buffer for file copies
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// A recursive operation that can be attached to a filesystem
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create a directory and its missing ancestors
    #[serde(alias = "mkdirp")]
    #[value(name = "ensure_dir", alias = "mkdirp")]
    EnsureDir,
    /// Delete a directory tree
    #[serde(alias = "rmdirp")]
    #[value(name = "remove_tree", alias = "rmdirp")]
    RemoveTree,
    /// Flatten a directory tree into a listing
    #[serde(alias = "readdirp")]
    #[value(name = "list_tree", alias = "readdirp")]
    ListTree,
    /// Copy a single file
    #[serde(alias = "copyFile")]
    #[value(name = "copy_file", alias = "copyFile")]
    CopyFile,
    /// Copy a directory tree
    #[serde(alias = "copyDir")]
    #[value(name = "copy_tree", alias = "copyDir")]
    CopyTree,
}

impl Operation {
    /// Every operation, in declaration order
    pub const ALL: [Operation; 5] = [
        Operation::EnsureDir,
        Operation::RemoveTree,
        Operation::ListTree,
        Operation::CopyFile,
        Operation::CopyTree,
    ];

    /// Snake-case name used in config files and messages
    pub fn name(&self) -> &'static str {
        match self {
            Operation::EnsureDir => "ensure_dir",
            Operation::RemoveTree => "remove_tree",
            Operation::ListTree => "list_tree",
            Operation::CopyFile => "copy_file",
            Operation::CopyTree => "copy_tree",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which operations a composed filesystem carries and how they behave
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Enabled operations
    pub enabled: BTreeSet<Operation>,
    /// Mode for directories created without an explicit one
    pub dir_mode: Option<u32>,
    /// Buffer size for file copies
    pub buffer_size: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            enabled: Operation::ALL.into_iter().collect(),
            dir_mode: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl TreeConfig {
    /// Config enabling exactly the given operations
    pub fn only(ops: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            enabled: ops.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Remove an operation from the enabled set
    pub fn without(mut self, op: Operation) -> Self {
        self.enabled.remove(&op);
        self
    }

    /// Set the default directory creation mode
    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = Some(mode);
        self
    }

    /// Check whether an operation is enabled
    pub fn is_enabled(&self, op: Operation) -> bool {
        self.enabled.contains(&op)
    }

    /// Parse a config from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let config: TreeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TreeError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Reject settings the tree operations cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(TreeError::config("buffer_size must be greater than zero"));
        }
        if let Some(mode) = self.dir_mode {
            if mode > 0o7777 {
                return Err(TreeError::config(format!(
                    "dir_mode {:o} is not a permission mode",
                    mode
                )));
            }
        }
        Ok(())
    }

    /// Build the config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        for op in &args.disable {
            config.enabled.remove(op);
        }

        if let Some(size) = &args.buffer_size {
            config.buffer_size = parse_size(size).map_err(TreeError::Config)?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One path per line
    #[default]
    Text,
    /// JSON array of paths
    Json,
}

/// treefs - recursive filesystem tree operations
#[derive(Parser, Debug, Clone)]
#[command(name = "treefs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Recursive mkdir, copy, remove and list for directory trees")]
#[command(long_about = r#"
treefs runs whole-tree filesystem operations as single commands.

Examples:
  treefs mkdirp a/b/c --mode 755     # Create a path with all ancestors
  treefs cp-dir src dst              # Copy a directory tree
  treefs ls dst --output-format json # List every entry under a root
  treefs rmdirp dst                  # Delete a directory tree
"#)]
pub struct CliArgs {
    /// JSON config file
    #[arg(long, value_name = "PATH", env = "TREEFS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable an operation (can be repeated)
    #[arg(long, value_enum, value_name = "OP")]
    pub disable: Vec<Operation>,

    /// Buffer size for file copies (e.g., 64K, 1M)
    #[arg(short = 'b', long, value_name = "SIZE")]
    pub buffer_size: Option<String>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a directory and all missing ancestors
    #[command(name = "mkdirp")]
    Mkdirp {
        /// Directory to create
        path: PathBuf,
        /// Octal creation mode (e.g., 755)
        #[arg(short, long, value_name = "MODE")]
        mode: Option<String>,
    },

    /// Remove a directory tree
    #[command(name = "rmdirp")]
    Rmdirp {
        /// Directory to remove
        path: PathBuf,
    },

    /// List every directory and file under a root
    #[command(name = "ls")]
    List {
        /// Root directory
        path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Copy a single file, creating the destination's parent
    #[command(name = "cp")]
    CopyFile {
        /// Source file
        source: PathBuf,
        /// Destination file
        destination: PathBuf,
    },

    /// Copy a directory tree
    #[command(name = "cp-dir")]
    CopyDir {
        /// Source directory
        source: PathBuf,
        /// Destination directory
        destination: PathBuf,
    },
}

/// Parse an octal permission mode such as `755` or `0o700`
pub fn parse_mode(s: &str) -> std::result::Result<u32, String> {
    let digits = s.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);

    let mode = u32::from_str_radix(digits, 8).map_err(|_| format!("Invalid mode: {}", s))?;
    if mode > 0o7777 {
        return Err(format!("Invalid mode: {}", s));
    }
    Ok(mode)
}

/// Parse a size string like "64K", "1M"
pub fn parse_size(s: &str) -> std::result::Result<usize, String> {
    let s = s.trim().to_uppercase();

    let (num_str, multiplier) = if s.ends_with("G") || s.ends_with("GB") {
        (s.trim_end_matches("GB").trim_end_matches('G'), 1024 * 1024 * 1024)
    } else if s.ends_with("M") || s.ends_with("MB") {
        (s.trim_end_matches("MB").trim_end_matches('M'), 1024 * 1024)
    } else if s.ends_with("K") || s.ends_with("KB") {
        (s.trim_end_matches("KB").trim_end_matches('K'), 1024)
    } else if s.ends_with("B") {
        (s.trim_end_matches('B'), 1)
    } else {
        (s.as_str(), 1)
    };

    let num: usize = num_str
        .parse()
        .map_err(|_| format!("Invalid size: {}", s))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("Size too large: {}", s))
}

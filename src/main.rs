//! treefs CLI - Recursive Filesystem Tree Operations
//!
//! Runs mkdirp, copy, remove and list over whole directory trees.

use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use treefs::config::{parse_mode, CliArgs, Commands, OutputFormat, TreeConfig};
use treefs::core::TreeFs;
use treefs::error::{Result, TreeError};

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v/-q
    let default_level = match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config = TreeConfig::from_cli(&args)?;

    if args.verbose > 0 {
        print_config(&config);
    }

    let fs = TreeFs::disk(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| TreeError::config(format!("Failed to create runtime: {}", e)))?;

    rt.block_on(handle_command(&fs, &args))
}

async fn handle_command(fs: &TreeFs<treefs::DiskFs>, args: &CliArgs) -> Result<()> {
    match &args.command {
        Commands::Mkdirp { path, mode } => cmd_mkdirp(fs, path, mode.as_deref()).await,
        Commands::Rmdirp { path } => fs.remove_tree(path).await,
        Commands::List {
            path,
            output_format,
        } => cmd_list(fs, path, *output_format).await,
        Commands::CopyFile {
            source,
            destination,
        } => {
            let bytes = fs.copy_file(source, destination).await?;
            if !args.quiet {
                println!(
                    "Copied {} -> {} ({})",
                    source.display(),
                    destination.display(),
                    humansize::format_size(bytes, humansize::BINARY)
                );
            }
            Ok(())
        }
        Commands::CopyDir {
            source,
            destination,
        } => {
            fs.copy_tree(source, destination).await?;
            if !args.quiet {
                println!("Copied {} -> {}", source.display(), destination.display());
            }
            Ok(())
        }
    }
}

async fn cmd_mkdirp(fs: &TreeFs<treefs::DiskFs>, path: &Path, mode: Option<&str>) -> Result<()> {
    match mode {
        Some(mode) => {
            let mode = parse_mode(mode).map_err(TreeError::Config)?;
            fs.ensure_dir_with_mode(path, Some(mode)).await
        }
        None => fs.ensure_dir(path).await,
    }
}

async fn cmd_list(fs: &TreeFs<treefs::DiskFs>, path: &Path, format: OutputFormat) -> Result<()> {
    let listing = fs.list_tree(path).await?;

    match format {
        OutputFormat::Text => {
            for entry in &listing {
                println!("{}", entry.display());
            }
        }
        OutputFormat::Json => {
            let paths: Vec<String> = listing
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            println!("{}", serde_json::to_string_pretty(&paths)?);
        }
    }
    Ok(())
}

fn print_config(config: &TreeConfig) {
    println!("=== Configuration ===");
    println!(
        "Enabled:     {}",
        config
            .enabled
            .iter()
            .map(|op| op.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Buffer:      {}", humansize::format_size(config.buffer_size as u64, humansize::BINARY));
    match config.dir_mode {
        Some(mode) => println!("Dir mode:    {:o}", mode),
        None => println!("Dir mode:    (system default)"),
    }
    println!();
}

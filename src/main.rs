//! filesift - enumerate the files under a directory tree.
//!
//! Usage:
//!   filesift [PATH]                 List files (concurrent walk)
//!   filesift list [PATH] [OPTIONS]  List files with filters
//!   filesift compare [PATH]         Check both walkers agree
//!   filesift copy SRC DST           Copy a file or create a directory
//!   filesift --help                 Show help

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use filesift_core::{Strategy, WalkConfig};
use filesift_walk::{SequentialWalker, WalkOutput};

#[derive(Parser)]
#[command(
    name = "filesift",
    version,
    about = "Enumerate the files under a directory tree",
    long_about = "filesift lists every file under a directory that passes its filters.\n\n\
                  Directories are listed in parallel by default; use --sequential \
                  for a single-threaded depth-first walk."
)]
struct Cli {
    /// Path to walk (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Log more (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List matching files
    List {
        /// Path to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Walk with a single thread
        #[arg(long)]
        sequential: bool,

        /// Maximum simultaneous directory listings (0 = number of CPUs)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Sort paths before printing
        #[arg(short, long)]
        sort: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run both walkers and report any difference
    Compare {
        /// Path to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Maximum simultaneous directory listings (0 = number of CPUs)
        #[arg(short, long, default_value = "0")]
        jobs: usize,
    },

    /// Copy a file, or create the directory a directory maps to
    Copy {
        /// Source path
        src: PathBuf,

        /// Destination path
        dst: PathBuf,
    },
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Skip directories with this name (`name`, `prefix*`, `*suffix`); repeatable
    #[arg(short = 'x', long = "ignore-dir")]
    ignore_dirs: Vec<String>,

    /// Only keep files whose full path matches this glob; repeatable
    #[arg(short, long = "include")]
    include: Vec<String>,

    /// Descend into .git, .svn and .hg directories
    #[arg(long)]
    no_vcs_skip: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::List {
            path,
            filters,
            sequential,
            jobs,
            sort,
            format,
        }) => {
            let strategy = if sequential {
                Strategy::Sequential
            } else {
                Strategy::Concurrent
            };
            run_list(build_config(path, &filters, strategy, jobs)?, sort, format)?;
        }
        Some(Command::Compare {
            path,
            filters,
            jobs,
        }) => {
            run_compare(build_config(path, &filters, Strategy::Concurrent, jobs)?)?;
        }
        Some(Command::Copy { src, dst }) => {
            filesift_ops::copy_entry(&src, &dst)
                .with_context(|| format!("Failed to copy {}", src.display()))?;
        }
        None => {
            let config = build_config(cli.path, &FilterArgs::default(), Strategy::Concurrent, 0)?;
            run_list(config, false, OutputFormat::Text)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(
    path: PathBuf,
    filters: &FilterArgs,
    strategy: Strategy,
    jobs: usize,
) -> Result<WalkConfig> {
    WalkConfig::builder()
        .root(path)
        .strategy(strategy)
        .max_concurrency(jobs)
        .skip_vcs(!filters.no_vcs_skip)
        .ignore_dirs(filters.ignore_dirs.clone())
        .include_globs(filters.include.clone())
        .build()
        .context("Invalid walk configuration")
}

/// Walk and print matching paths.
fn run_list(config: WalkConfig, sort: bool, format: OutputFormat) -> Result<()> {
    let mut output = filesift_walk::walk(&config).context("Walk failed")?;
    if sort {
        output.sort();
    }

    match format {
        OutputFormat::Text => {
            for file in &output.files {
                println!("{file}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    report_warnings(&output);
    Ok(())
}

/// Walk with both strategies and compare the resulting sets.
fn run_compare(config: WalkConfig) -> Result<()> {
    let concurrent = filesift_walk::walk(&config).context("Concurrent walk failed")?;
    let sequential = SequentialWalker::new()
        .walk(
            &config.root,
            config.dir_filter().as_ref(),
            config.file_filter()?.as_ref(),
        )
        .context("Sequential walk failed")?;

    let a = concurrent.file_set();
    let b = sequential.file_set();
    let only_concurrent: BTreeSet<_> = a.difference(&b).collect();
    let only_sequential: BTreeSet<_> = b.difference(&a).collect();

    eprintln!(
        "concurrent: {} files in {:.3}s (peak {} listings)",
        concurrent.files.len(),
        concurrent.duration.as_secs_f64(),
        concurrent.stats.peak_listings
    );
    eprintln!(
        "sequential: {} files in {:.3}s",
        sequential.files.len(),
        sequential.duration.as_secs_f64()
    );

    if only_concurrent.is_empty() && only_sequential.is_empty() {
        println!("{} files, both walkers agree", a.len());
        return Ok(());
    }
    for path in &only_concurrent {
        println!("+ {path}");
    }
    for path in &only_sequential {
        println!("- {path}");
    }
    bail!(
        "walkers disagree: {} only in concurrent, {} only in sequential",
        only_concurrent.len(),
        only_sequential.len()
    );
}

fn report_warnings(output: &WalkOutput) {
    if !output.warnings.is_empty() {
        eprintln!();
        eprintln!("{} path(s) skipped:", output.warnings.len());
        for warning in &output.warnings {
            eprintln!("  {}", warning.message);
        }
    }
}

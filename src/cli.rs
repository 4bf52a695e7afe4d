//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::{discover_config, BundleConfig};
use crate::core::file_reader::EncodingStrategy;
use crate::core::model::{BundleJob, SuffixFilter};
use crate::core::paths::resolve;
use crate::core::render::{OutputFormat, RenderConfig};

/// srcbundle - concatenate source files into single bundle files.
#[derive(Parser, Debug)]
#[command(name = "srcbundle")]
#[command(
    author,
    version,
    about,
    long_about = r#"srcbundle walks source directories and writes every file whose name ends in a
recognized suffix (default: .js, .jsx, .tsx) into one bundle file per directory.

Each file is written as:

    /<relative_path> :

    <raw file content>

    ------------------------

Jobs come from --config, from ROOT/srcbundle.toml, or from the built-in
defaults (components -> Components.txt, lib -> Lib.txt, app -> App.txt).

Examples:
    srcbundle run --root ~/projects/foodie-app
    srcbundle export src/components Components.txt --ext .tsx
    srcbundle list --format jsonl
"#
)]
pub struct Cli {
    /// Project root that job sources are resolved against.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Project root (defaults to the current directory).\n\n\
Relative job sources and the EXPORT source are resolved against it, and\n\
ROOT/srcbundle.toml is used when --config is not given."
    )]
    pub root: PathBuf,

    /// Directory that bundle outputs are written to.
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        long_help = "Directory that relative bundle outputs are resolved against.\n\n\
Overrides `out_dir` from the config file. Defaults to the current directory."
    )]
    pub out_dir: Option<PathBuf>,

    /// Report format (text/jsonl/json).
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_name = "FORMAT",
        long_help = "Select the format of the report printed to stdout.\n\n\
Supported values:\n\
- text (default)\n\
- jsonl\n\
- json\n\n\
Bundle files themselves are not affected."
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Visit files in name order instead of filesystem order.
    #[arg(
        long,
        global = true,
        long_help = "Visit directory entries sorted by file name.\n\n\
By default files are bundled in the order the filesystem lists them, which is\n\
stable on one machine but may differ between machines."
    )]
    pub sort: bool,

    /// Replace invalid UTF-8 instead of failing.
    #[arg(
        long,
        global = true,
        long_help = "Read non-UTF-8 files with lossy conversion (invalid bytes become U+FFFD).\n\n\
By default an export fails on the first file that is not valid UTF-8."
    )]
    pub lossy: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (trace/debug/info/warn/error).
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every configured bundle job in order.
    #[command(
        long_about = "Run every configured job, one after another. The first failing job\n\
aborts the run with a non-zero exit code.\n\n\
Examples:\n\
  srcbundle run\n\
  srcbundle run --config bundles.toml --out-dir dist\n"
    )]
    Run {
        /// Config file (TOML).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Bundle a single directory into a single file.
    #[command(
        long_about = "Bundle one SOURCE directory into OUTPUT without a config file.\n\n\
Examples:\n\
  srcbundle export components Components.txt\n\
  srcbundle export src out.txt --ext .ts --ext .tsx\n"
    )]
    Export {
        /// Directory to scan (relative to ROOT unless absolute).
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Bundle file to write (relative to --out-dir unless absolute).
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// File name suffix to include; repeatable.
        #[arg(
            long = "ext",
            value_name = "SUFFIX",
            long_help = "File name suffix to include. May be given more than once.\n\n\
Matching is a case-sensitive suffix test on the file name.\n\
Defaults to .js, .jsx and .tsx."
        )]
        ext: Vec<String>,
    },

    /// List the files each job would bundle, without writing anything.
    List {
        /// Config file (TOML).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Apply global flags on top of a loaded config
fn apply_overrides(config: &mut BundleConfig, cli: &Cli) {
    if let Some(out_dir) = &cli.out_dir {
        config.out_dir = out_dir.clone();
    }
    if cli.sort {
        config.options.sort = true;
    }
    if cli.lossy {
        config.options.encoding = EncodingStrategy::Lossy;
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    match &cli.command {
        Commands::Run { config } => {
            let mut bundle_config = discover_config(&cli.root, config.as_deref())
                .context("failed to load configuration")?;
            apply_overrides(&mut bundle_config, &cli);
            crate::flows::bundle::run_bundle(&bundle_config, render_config)
        }

        Commands::Export {
            source,
            output,
            ext,
        } => {
            if ext.iter().any(|s| s.is_empty()) {
                bail!("--ext must not be empty");
            }
            let filter = if ext.is_empty() {
                SuffixFilter::default()
            } else {
                SuffixFilter::new(ext.iter().cloned())
            };

            let mut bundle_config = BundleConfig::default_jobs(&cli.root);
            apply_overrides(&mut bundle_config, &cli);

            let job = BundleJob::new(
                resolve(&cli.root, source),
                resolve(&bundle_config.out_dir, output),
            )
            .with_filter(filter);
            crate::flows::bundle::run_export(&job, bundle_config.options, render_config)
        }

        Commands::List { config } => {
            let mut bundle_config = discover_config(&cli.root, config.as_deref())
                .context("failed to load configuration")?;
            apply_overrides(&mut bundle_config, &cli);
            crate::backends::scan::run_list(&bundle_config, render_config)
        }
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "callmap",
    version,
    about = "Cross-file call graph extractor for JavaScript/Vue projects",
    after_help = r#"Examples:
  callmap analyze --root . --out-dir ./callmap-out
  callmap analyze --root . --filter-text easyfile
  callmap functions --root .
  callmap resolve --root . --file src/model/api.js --function fetchUser
  callmap filter --result ./callmap-out/result.json --text session
  callmap filter --diagram ./callmap-out/diagram-readable.mmd --text session
"#
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a project and write result.json plus both diagrams.
    Analyze {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Directory names to skip, comma-separated (defaults to the
        /// conventional set: node_modules, dist, VCS metadata).
        #[arg(long = "ignore", value_delimiter = ',')]
        ignore: Vec<String>,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
        /// Directory the artifacts are written into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Also write a filtered diagram for this match text.
        #[arg(long)]
        filter_text: Option<String>,
    },
    /// List every user-defined function as JSON.
    Functions {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Directory names to skip, comma-separated.
        #[arg(long = "ignore", value_delimiter = ',')]
        ignore: Vec<String>,
        /// Include files ignored by .gitignore.
        #[arg(long)]
        no_ignore: bool,
    },
    /// Resolve one function's calls and print the buckets as JSON.
    Resolve {
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Script or component file, absolute or relative to --root.
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        function: String,
    },
    /// Extract a filtered call chain from an existing result or diagram.
    Filter {
        /// Aggregate result.json to filter (rich mode).
        #[arg(long)]
        result: Option<PathBuf>,
        /// Diagram file to filter (edge mode).
        #[arg(long)]
        diagram: Option<PathBuf>,
        /// Match text, compared case-insensitively against node names.
        #[arg(long)]
        text: String,
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Directory the artifacts are written into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

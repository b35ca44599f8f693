use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for hypermark
#[derive(Parser, Debug)]
#[command(author, version, about = "hypermark: markdown to hypertext AST")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,
}

/// All supported subcommands for the hypermark CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Parse a markdown file into its AST, metadata and HTML.
  Parse {
    /// Markdown file, or an id resolvable to `<id>.md` / `<id>/index.md`.
    file: PathBuf,

    /// Write the JSON results to a file instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    compact: bool,

    /// Do not assign ids to headings.
    #[arg(long = "no-heading-ids", action = clap::ArgAction::SetTrue)]
    no_heading_ids: bool,

    /// Inject anchor links into headings.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    heading_anchors: bool,

    /// Prefix for generated heading ids.
    #[arg(long, default_value = "")]
    heading_id_prefix: String,
  },

  /// Resolve a table-of-contents outline into its navigation tree.
  Toc {
    /// Outline markdown file (a nested list of page links).
    file: PathBuf,

    /// Root directory of the site's pages.
    #[arg(short, long)]
    root: PathBuf,

    /// End every generated url with a `/`.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    trailing_slash: bool,
  },

  /// Compute previous/next/parent navigation for a page.
  Nav {
    /// Page markdown file.
    file: PathBuf,

    /// Root directory of the site's pages.
    #[arg(short, long)]
    root: PathBuf,

    /// Outline file used to derive previous/next/parent links.
    #[arg(short, long)]
    toc: Option<PathBuf>,

    /// End every generated url with a `/`.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    trailing_slash: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

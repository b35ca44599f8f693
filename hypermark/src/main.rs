use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use hypermark_markdown::{
  HtmlOptions,
  MarkdownOptions,
  NavigationOptions,
  UrlOptions,
  page_navigation,
  parse_markdown,
  parse_table_of_contents,
};
use log::{LevelFilter, info};
use serde::Serialize;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging before command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Parse {
      file,
      out,
      compact,
      no_heading_ids,
      heading_anchors,
      heading_id_prefix,
    } => {
      let opts = MarkdownOptions {
        html: HtmlOptions {
          heading_ids: !no_heading_ids,
          heading_anchors: *heading_anchors,
          heading_id_prefix: heading_id_prefix.clone(),
          ..HtmlOptions::default()
        },
        ..MarkdownOptions::default()
      };

      let results = parse_markdown(file, &opts)
        .wrap_err_with(|| format!("Failed to parse {}", file.display()))?;
      emit(&results, out.as_deref(), *compact)
    },

    Commands::Toc {
      file,
      root,
      trailing_slash,
    } => {
      let toc = parse_table_of_contents(file, root, &UrlOptions {
        trailing_slash: *trailing_slash,
      })
      .wrap_err_with(|| {
        format!("Failed to resolve outline {}", file.display())
      })?;
      emit(toc.as_ref(), None, false)
    },

    Commands::Nav {
      file,
      root,
      toc,
      trailing_slash,
    } => {
      let table_of_contents = match toc {
        Some(toc_file) => {
          Some(
            parse_table_of_contents(toc_file, root, &UrlOptions {
              trailing_slash: *trailing_slash,
            })
            .wrap_err_with(|| {
              format!("Failed to resolve outline {}", toc_file.display())
            })?,
          )
        },
        None => None,
      };

      let navigation = page_navigation(root, file, &NavigationOptions {
        trailing_slash: *trailing_slash,
        table_of_contents,
      })
      .wrap_err_with(|| {
        format!("Failed to compute navigation for {}", file.display())
      })?;
      emit(&navigation, None, false)
    },
  }
}

/// Print results as JSON on stdout, or write them to a file.
fn emit<T: Serialize>(
  value: &T,
  out: Option<&Path>,
  compact: bool,
) -> Result<()> {
  let json = if compact {
    serde_json::to_string(value)?
  } else {
    serde_json::to_string_pretty(value)?
  };

  match out {
    Some(path) => {
      fs::write(path, json)?;
      info!("Wrote {}", path.display());
    },
    None => println!("{json}"),
  }
  Ok(())
}

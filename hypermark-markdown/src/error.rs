use std::{io, path::PathBuf};

use thiserror::Error;

/// Top-level error type for the hypermark-markdown crate.
#[derive(Debug, Error)]
pub enum HypermarkError {
  #[error(
    "page file \"{file}\" must be a descendant of the root directory \
     \"{root}\"",
    file = .file.display(),
    root = .root.display()
  )]
  NotDescendant { file: PathBuf, root: PathBuf },

  #[error("file must have a \".md\" extension: {}", .0.display())]
  NotMarkdown(PathBuf),

  #[error("only \".md\" markdown extensions are supported: {}", .0.display())]
  MarkdownExtension(PathBuf),

  #[error(
    "unable to read \"{id}\". Attempted: \"{md}\", \"{index_md}\"",
    id = .id.display(),
    md = .md.display(),
    index_md = .index_md.display()
  )]
  Resolve {
    id:       PathBuf,
    md:       PathBuf,
    index_md: PathBuf,
  },

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("front matter error: {0}")]
  FrontMatter(#[from] serde_yaml::Error),
}

/// Result type for hypermark-markdown operations.
pub type Result<T> = std::result::Result<T, HypermarkError>;

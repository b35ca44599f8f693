//! Public data model for parse results, table-of-contents trees and page
//! navigation.
use std::{path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::ast::AstNode;

/// One hyperlink found in a document, in document order. Anchors without an
/// `href` attribute, or whose href only targets a fragment (`#...`), are
/// not collected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnchorData {
  /// Link target exactly as written in the document.
  pub href: Option<String>,
  /// Concatenated descendant text of the anchor element.
  pub text: String,
}

/// One heading (h1-h6) found in a document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadingData {
  /// Heading text with inline markup flattened away.
  pub text:  String,
  /// Heading level (1-6).
  pub level: u8,
  /// Anchor ID of the heading, when one was assigned or already present.
  pub id:    Option<String>,
}

/// One image found in a document, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImgData {
  /// The image's `alt` text.
  pub text: Option<String>,
  /// The image's `src` attribute.
  pub src:  Option<String>,
}

/// Result of parsing an HTML fragment into the serializable AST.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HtmlResults {
  /// The fragment reduced to a serializable node tree, one entry per
  /// top-level element.
  pub ast: Vec<AstNode>,

  /// Anchor data in document order.
  pub anchors: Vec<AnchorData>,

  /// Heading data in document order.
  pub headings: Vec<HeadingData>,

  /// Image data in document order.
  pub imgs: Vec<ImgData>,

  /// Every tag name seen in the fragment, first-seen order, no duplicates.
  pub tag_names: Vec<String>,

  /// The fragment re-serialized to HTML after heading annotation.
  pub html: String,
}

/// Result of the full markdown pipeline: front matter, rendered HTML and
/// the parsed AST with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkdownResults {
  /// Front matter attributes parsed from the document head.
  pub attributes: serde_yaml::Mapping,

  /// HTML rendered from the markdown body.
  pub html: String,

  /// The rendered HTML reduced to a serializable node tree.
  pub ast: Vec<AstNode>,

  /// Anchor data in document order.
  pub anchors: Vec<AnchorData>,

  /// Heading data in document order.
  pub headings: Vec<HeadingData>,

  /// Image data in document order.
  pub imgs: Vec<ImgData>,

  /// Every tag name seen, first-seen order, no duplicates.
  pub tag_names: Vec<String>,

  /// The `title` front matter attribute, if present.
  pub title: Option<String>,

  /// The `description` front matter attribute, if present.
  pub description: Option<String>,

  /// The `slug` front matter attribute, falling back to a slug derived
  /// from the file name when the document was parsed from a file.
  pub slug: Option<String>,

  /// The resolved path of the parsed file, when one was given.
  pub file_path: Option<PathBuf>,
}

/// One node of a table-of-contents tree, mirroring one `<li>` of the
/// outline document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableOfContentsNode {
  /// Link or item text.
  pub text: Option<String>,

  /// Site url for the item. Local markdown links are rewritten through the
  /// page URL rule; external links keep their href.
  pub url: Option<String>,

  /// Path of the linked markdown file, relative to the outline's
  /// directory. Only set for local links that resolve to an absolute
  /// `.md` path.
  pub file: Option<PathBuf>,

  /// Whether this node sits inside a nested list.
  pub has_parent: bool,

  /// Nodes of a nested list, if any.
  pub children: Vec<TableOfContentsNode>,

  /// Nesting level; the outermost list is depth 0.
  pub depth: usize,
}

/// A parsed table-of-contents document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableOfContents {
  /// Absolute path of the outline markdown file.
  pub toc_file_path: PathBuf,

  /// Directory containing the outline; link files are relative to it.
  pub toc_dir_path: PathBuf,

  /// Root directory of the site's pages; urls are relative to it.
  pub root_pages_dir: PathBuf,

  /// Top-level outline nodes.
  pub root: Vec<TableOfContentsNode>,
}

/// One flattened table-of-contents entry.
///
/// Built by [`crate::toc::walk`]: pre-order, one entry per node, each
/// carrying the chain of its ancestors accumulated top-down. Ancestor
/// entries are trimmed copies and carry no chain of their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalkEntry {
  /// The node's text, when it had any.
  pub title: Option<String>,

  /// Absolute path of the node's markdown file, when it linked to one.
  pub file: Option<PathBuf>,

  /// Nesting level of the node in the outline.
  pub depth: usize,

  /// Ancestor entries, outermost first.
  pub ancestors: Vec<WalkEntry>,
}

/// Title and url of one navigation target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageNavigationData {
  pub title: Option<String>,
  pub url:   Option<String>,
}

/// Navigation data for a page: where it lives and, when a table of
/// contents is available, where to go from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageNavigation {
  pub current:  PageNavigationData,
  pub parent:   Option<PageNavigationData>,
  pub previous: Option<PageNavigationData>,
  pub next:     Option<PageNavigationData>,
}

/// Options for the HTML parsing stage.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
  /// Assign an `id` attribute to h1-h6 heading tags.
  pub heading_ids: bool,

  /// Prefix prepended to generated heading ids.
  pub heading_id_prefix: String,

  /// Inject an anchor link as the first child of each heading, using the
  /// heading id as the href hash. Requires `heading_ids`; without them no
  /// anchors are injected.
  pub heading_anchors: bool,

  /// CSS class added to injected heading anchor elements.
  pub heading_anchor_class: String,

  /// Smallest heading level that receives an anchor link. The default
  /// anchors every heading; set 2 to leave `h1` elements bare.
  pub heading_anchor_min_level: u8,

  /// CSS class added to the document's intro paragraphs: every top-level
  /// paragraph before the first subheading, or only the first paragraph
  /// when the document has no subheadings. `None` disables the pass.
  pub paragraph_intro_class: Option<String>,
}

impl Default for HtmlOptions {
  fn default() -> Self {
    Self {
      heading_ids:              true,
      heading_id_prefix:        String::new(),
      heading_anchors:          false,
      heading_anchor_class:     "heading-anchor".to_string(),
      heading_anchor_min_level: 1,
      paragraph_intro_class:    Some("paragraph-intro".to_string()),
    }
  }
}

/// Options for the markdown pipeline.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Render single newlines as hard breaks.
  pub breaks: bool,

  /// HTML parsing options applied to the rendered output.
  pub html: HtmlOptions,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:    true,
      breaks: true,
      html:   HtmlOptions::default(),
    }
  }
}

/// Options for page url formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlOptions {
  /// End every url with a `/`. The default is to not.
  pub trailing_slash: bool,
}

/// Options for page navigation.
#[derive(Debug, Clone, Default)]
pub struct NavigationOptions {
  /// End every url with a `/`. The default is to not.
  pub trailing_slash: bool,

  /// Table of contents used to derive the previous, next and parent pages.
  pub table_of_contents: Option<Arc<TableOfContents>>,
}

//! # hypermark-markdown
//!
//! Markdown and HTML parsing into a serializable hypertext AST, plus page
//! metadata extraction and table-of-contents driven navigation.
//!
//! A markdown document's YAML front matter becomes `attributes`, its body
//! is rendered to HTML with comrak, and the HTML is reduced to a compact
//! node tree shaped like hypertext call arguments, such as
//! `["div", {"id": "foo"}, "bar"]`, which can be serialized, shipped, and
//! later re-hydrated into live UI elements. Parsing also collects the
//! document's anchors, headings, images and tag names in document order.
//!
//! ## Quick start
//!
//! ```rust
//! use hypermark_markdown::{MarkdownOptions, parse_markdown_content};
//!
//! # fn main() -> Result<(), hypermark_markdown::HypermarkError> {
//! let results = parse_markdown_content(
//!   "---\ntitle: Hill Valley\n---\n\n# Hill Valley\n\nSave the [clock](/clock) tower!",
//!   &MarkdownOptions::default(),
//! )?;
//!
//! assert_eq!(results.title.as_deref(), Some("Hill Valley"));
//! assert_eq!(results.headings[0].id.as_deref(), Some("hill-valley"));
//! assert_eq!(results.anchors[0].href.as_deref(), Some("/clock"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Navigation
//!
//! A table-of-contents document (a markdown file holding a nested list of
//! page links) resolves to a [`TableOfContents`] tree. Flattening the
//! tree with [`toc::walk`] and searching it with [`page_navigation`]
//! yields the previous, next and parent pages of any file in the site.

pub mod ast;
mod error;
mod frontmatter;
mod html;
mod markdown;
mod navigation;
pub mod toc;
mod types;
pub mod utils;

pub use crate::{
  ast::{AstNode, AttrMap, AttrValue, ElementNode, MetaCollector, parse_style},
  error::{HypermarkError, Result},
  frontmatter::extract_front_matter,
  html::{parse_html, parse_html_content},
  markdown::{parse_markdown, parse_markdown_content, render_markdown},
  navigation::{find_best_match, page_navigation, page_url},
  toc::{parse_table_of_contents, parse_table_of_contents_content},
  types::{
    AnchorData,
    HeadingData,
    HtmlOptions,
    HtmlResults,
    ImgData,
    MarkdownOptions,
    MarkdownResults,
    NavigationOptions,
    PageNavigation,
    PageNavigationData,
    TableOfContents,
    TableOfContentsNode,
    UrlOptions,
    WalkEntry,
  },
};

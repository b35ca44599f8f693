//! The markdown pipeline: front matter, comrak rendering and HTML parsing.
use std::{
  fs,
  path::{Path, PathBuf},
};

use comrak::{Arena, options::Options, parse_document};
use log::trace;

use crate::{
  error::{HypermarkError, Result},
  frontmatter::extract_front_matter,
  html::parse_html_content,
  types::{MarkdownOptions, MarkdownResults},
  utils::slugify_file_path,
};

/// Render a markdown body to HTML with comrak.
///
/// Inline HTML passes through untouched; heading ids are left for the HTML
/// parsing stage to assign.
#[must_use]
pub fn render_markdown(markdown: &str, opts: &MarkdownOptions) -> String {
  let arena = Arena::new();
  let options = comrak_options(opts);
  let root = parse_document(&arena, markdown, &options);

  let mut html = String::new();
  comrak::format_html(root, &options, &mut html).unwrap_or_default();
  html
}

/// Build comrak options from [`MarkdownOptions`].
fn comrak_options(opts: &MarkdownOptions) -> Options<'static> {
  let mut options = Options::default();
  if opts.gfm {
    options.extension.table = true;
    options.extension.footnotes = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.autolink = true;
  }
  options.render.hardbreaks = opts.breaks;
  options.render.r#unsafe = true;
  // Heading ids are assigned during HTML parsing, not by the renderer.
  options.extension.header_ids = None;
  options
}

/// Parse markdown content: the front matter into `attributes`, the body
/// into `html`, and the html into the serializable `ast` plus the
/// extracted metadata.
///
/// # Errors
///
/// Returns an error when the front matter block does not parse as YAML.
pub fn parse_markdown_content(
  content: &str,
  opts: &MarkdownOptions,
) -> Result<MarkdownResults> {
  let content = content.trim();
  let (attributes, body) = extract_front_matter(content)?;

  let html = render_markdown(body, opts);
  let html_results = parse_html_content(&html, &opts.html);

  let title = attribute_string(&attributes, "title");
  let description = attribute_string(&attributes, "description");
  let slug = attribute_string(&attributes, "slug");

  Ok(MarkdownResults {
    attributes,
    html,
    ast: html_results.ast,
    anchors: html_results.anchors,
    headings: html_results.headings,
    imgs: html_results.imgs,
    tag_names: html_results.tag_names,
    title,
    description,
    slug,
    file_path: None,
  })
}

/// Parse a markdown file.
///
/// The id is resolved the way a module loader would resolve it: an exact
/// `.md` path is read directly, anything else tries `<id>.md` first and
/// `<id>/index.md` second. A missing `slug` attribute falls back to a slug
/// derived from the resolved file name.
///
/// # Errors
///
/// Returns an error when the id cannot be resolved to a readable file,
/// uses the unsupported `.markdown` extension, or its front matter does
/// not parse as YAML.
pub fn parse_markdown(
  id: &Path,
  opts: &MarkdownOptions,
) -> Result<MarkdownResults> {
  let (file_path, content) = read_markdown_content(id)?;

  let mut results = parse_markdown_content(&content, opts)?;
  if results.slug.is_none() {
    results.slug = Some(slugify_file_path(&file_path));
  }
  results.file_path = Some(file_path);
  Ok(results)
}

/// Resolve a markdown id to a readable file and its content.
fn read_markdown_content(id: &Path) -> Result<(PathBuf, String)> {
  let ext = id
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_lowercase);

  match ext.as_deref() {
    Some("markdown") => {
      Err(HypermarkError::MarkdownExtension(id.to_path_buf()))
    },
    Some("md") => {
      // An explicit .md path is read directly, no resolving.
      Ok((id.to_path_buf(), fs::read_to_string(id)?))
    },
    _ => {
      // With an id of `pages/my-file`, attempt:
      //  1. `pages/my-file.md`
      //  2. `pages/my-file/index.md`
      let mut with_ext = id.as_os_str().to_os_string();
      with_ext.push(".md");
      let md_path = PathBuf::from(with_ext);
      let index_md_path = id.join("index.md");

      if let Ok(content) = fs::read_to_string(&md_path) {
        trace!("resolved {} to {}", id.display(), md_path.display());
        return Ok((md_path, content));
      }
      match fs::read_to_string(&index_md_path) {
        Ok(content) => {
          trace!("resolved {} to {}", id.display(), index_md_path.display());
          Ok((index_md_path, content))
        },
        Err(_) => {
          Err(HypermarkError::Resolve {
            id:       id.to_path_buf(),
            md:       md_path,
            index_md: index_md_path,
          })
        },
      }
    },
  }
}

/// Read a string attribute from the front matter mapping.
fn attribute_string(
  attributes: &serde_yaml::Mapping,
  key: &str,
) -> Option<String> {
  attributes
    .get(&serde_yaml::Value::from(key))
    .and_then(serde_yaml::Value::as_str)
    .map(str::to_string)
}

//! Table-of-contents parsing, flattening and caching.
//!
//! A table of contents is a markdown document whose body is a nested
//! unordered list of links to the site's pages. The parsed tree can drive
//! a site menu, and flattening it powers the previous/next/parent page
//! navigation.
use std::{
  fs,
  hash::{DefaultHasher, Hash, Hasher},
  path::{Path, PathBuf},
  sync::{Arc, LazyLock, Mutex},
};

use indexmap::IndexMap;
use kuchikikiki::NodeRef;
use log::debug;

use crate::{
  error::Result,
  html::parse_fragment_root,
  markdown::render_markdown,
  navigation::{normalize_path, page_url, relative_path},
  types::{
    MarkdownOptions,
    TableOfContents,
    TableOfContentsNode,
    UrlOptions,
    WalkEntry,
  },
};

const TOC_CACHE_CAPACITY: usize = 64;

/// Process-wide cache of parsed outlines, keyed by a hash of the outline
/// content together with the outline path and the root pages directory.
static TOC_CACHE: LazyLock<Mutex<TocCache>> =
  LazyLock::new(|| Mutex::new(TocCache::new(TOC_CACHE_CAPACITY)));

/// A minimal least-recently-used map. Lookups move the entry to the back;
/// inserts evict from the front once the capacity is reached.
struct TocCache {
  entries:  IndexMap<u64, Arc<TableOfContents>>,
  capacity: usize,
}

impl TocCache {
  fn new(capacity: usize) -> Self {
    Self {
      entries: IndexMap::new(),
      capacity,
    }
  }

  fn get(&mut self, key: u64) -> Option<Arc<TableOfContents>> {
    let toc = self.entries.shift_remove(&key)?;
    self.entries.insert(key, Arc::clone(&toc));
    Some(toc)
  }

  fn insert(&mut self, key: u64, toc: Arc<TableOfContents>) {
    if self.entries.len() >= self.capacity && !self.entries.contains_key(&key)
    {
      self.entries.shift_remove_index(0);
    }
    self.entries.insert(key, toc);
  }
}

fn cache_key(content: &str, toc_path: &Path, root_pages_dir: &Path) -> u64 {
  let mut hasher = DefaultHasher::new();
  content.hash(&mut hasher);
  toc_path.hash(&mut hasher);
  root_pages_dir.hash(&mut hasher);
  hasher.finish()
}

/// Parse a markdown file holding a nested list of the site's pages.
///
/// Each link's file path is resolved relative to the outline file; each
/// link's url is computed relative to `root_pages_dir`. Results are cached
/// process-wide on the outline content and both directories.
///
/// # Errors
///
/// Returns an error when the outline file cannot be read.
pub fn parse_table_of_contents(
  toc_file_path: &Path,
  root_pages_dir: &Path,
  opts: &UrlOptions,
) -> Result<Arc<TableOfContents>> {
  let content = fs::read_to_string(toc_file_path)?;

  let key = cache_key(&content, toc_file_path, root_pages_dir);
  if let Ok(mut cache) = TOC_CACHE.lock() {
    if let Some(toc) = cache.get(key) {
      debug!("outline cache hit: {}", toc_file_path.display());
      return Ok(toc);
    }
  }

  let toc = Arc::new(parse_table_of_contents_content(
    &content,
    toc_file_path,
    root_pages_dir,
    opts,
  ));

  if let Ok(mut cache) = TOC_CACHE.lock() {
    cache.insert(key, Arc::clone(&toc));
  }
  Ok(toc)
}

/// Parse outline markdown that was already read from `toc_file_path`.
#[must_use]
pub fn parse_table_of_contents_content(
  content: &str,
  toc_file_path: &Path,
  root_pages_dir: &Path,
  opts: &UrlOptions,
) -> TableOfContents {
  let html = render_markdown(content, &MarkdownOptions::default());
  let fragment = parse_fragment_root(&html);

  let toc_dir_path = toc_file_path
    .parent()
    .map_or_else(PathBuf::new, Path::to_path_buf);

  let mut root = Vec::new();
  if let Some(list) = fragment.children().find(is_unordered_list) {
    parse_outline_list(
      0,
      &toc_dir_path,
      root_pages_dir,
      &list,
      false,
      &mut root,
      opts,
    );
  }

  TableOfContents {
    toc_file_path: toc_file_path.to_path_buf(),
    toc_dir_path,
    root_pages_dir: root_pages_dir.to_path_buf(),
    root,
  }
}

fn is_unordered_list(node: &NodeRef) -> bool {
  node
    .as_element()
    .is_some_and(|element| element.name.local.as_ref() == "ul")
}

fn is_list_item(node: &NodeRef) -> bool {
  node
    .as_element()
    .is_some_and(|element| element.name.local.as_ref() == "li")
}

/// Build nodes from one `<ul>` level of the outline, depth first and in
/// document order. An item is kept only when it carried text, a link or a
/// non-empty nested list.
fn parse_outline_list(
  depth: usize,
  toc_dir_path: &Path,
  root_pages_dir: &Path,
  list: &NodeRef,
  has_parent: bool,
  out: &mut Vec<TableOfContentsNode>,
  opts: &UrlOptions,
) {
  for item in list.children().filter(is_list_item) {
    let mut node = TableOfContentsNode {
      depth,
      has_parent,
      ..TableOfContentsNode::default()
    };
    let mut include = false;

    for child in item.children() {
      if let Some(text) = child.as_text() {
        let text = text.borrow();
        if !text.trim().is_empty() {
          node.text = Some(text.trim().to_string());
          include = true;
        }
      } else if let Some(element) = child.as_element() {
        match element.name.local.as_ref() {
          "a" => {
            // The link's own text wins over bare item text.
            let text = direct_text(&child);
            if !text.trim().is_empty() {
              node.text = Some(text);
            }

            let href = element
              .attributes
              .borrow()
              .get("href")
              .map(str::to_string);
            if let Some(href) = href {
              if !href.trim().is_empty() {
                apply_link(&mut node, &href, toc_dir_path, root_pages_dir, opts);
              }
            }
            include = true;
          },
          "ul" => {
            let mut children = Vec::new();
            parse_outline_list(
              depth + 1,
              toc_dir_path,
              root_pages_dir,
              &child,
              true,
              &mut children,
              opts,
            );
            if !children.is_empty() {
              node.children = children;
              include = true;
            }
          },
          _ => {},
        }
      }
    }

    if include {
      out.push(node);
    }
  }
}

/// Concatenate the direct text children of a node, joined by single
/// spaces.
fn direct_text(node: &NodeRef) -> String {
  node
    .children()
    .filter_map(|child| child.as_text().map(|text| text.borrow().clone()))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Apply an outline link to a node: strip any `#fragment` and `?query`
/// suffix, then resolve local markdown targets to a site url and a file
/// path relative to the outline.
fn apply_link(
  node: &mut TableOfContentsNode,
  href: &str,
  toc_dir_path: &Path,
  root_pages_dir: &Path,
  opts: &UrlOptions,
) {
  let href = href.split(['#', '?']).next().unwrap_or(href);
  node.url = Some(href.to_string());

  if href.to_lowercase().starts_with("http") {
    return;
  }

  let markdown_path = normalize_path(&toc_dir_path.join(href));
  let is_markdown = markdown_path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

  if markdown_path.is_absolute() && is_markdown {
    if let Ok(url) = page_url(root_pages_dir, &markdown_path, opts) {
      node.url = Some(url);
    }
    node.file = Some(relative_path(toc_dir_path, &markdown_path));
  }
}

/// Flatten a table of contents into one entry per node, pre-order, each
/// carrying its chain of ancestors accumulated top-down. Nodes without a
/// file still occupy a slot (so navigation can skip over them) and still
/// extend the chain for their descendants.
#[must_use]
pub fn walk(toc: &TableOfContents) -> Vec<WalkEntry> {
  let mut entries = Vec::new();
  walk_nodes(&[], &toc.root, &toc.toc_dir_path, &mut entries);
  entries
}

fn walk_nodes(
  ancestors: &[WalkEntry],
  nodes: &[TableOfContentsNode],
  toc_dir: &Path,
  out: &mut Vec<WalkEntry>,
) {
  for node in nodes {
    let file = node
      .file
      .as_ref()
      .map(|file| normalize_path(&toc_dir.join(file)));

    out.push(WalkEntry {
      title:     node.text.clone(),
      file:      file.clone(),
      depth:     node.depth,
      ancestors: ancestors.to_vec(),
    });

    // Extend the chain with a trimmed copy of this entry.
    let mut chain: Vec<WalkEntry> = ancestors.to_vec();
    chain.push(WalkEntry {
      title: node.text.clone(),
      file,
      depth: node.depth,
      ancestors: Vec::new(),
    });

    walk_nodes(&chain, &node.children, toc_dir, out);
  }
}

#[cfg(test)]
mod tests {
  use std::{path::Path, sync::Arc};

  use super::{TocCache, parse_table_of_contents_content, walk};
  use crate::types::{TableOfContents, UrlOptions};

  fn toc_fixture() -> TableOfContents {
    let outline = "\
- [Introduction](index.md)
- [Documentation](docs/index.md)
  - [Getting Started](docs/index.md)
  - [Installation](docs/installation.md)
- Guides
  - [Development Workflow](guides/workflow.md)
  - [IDE](guides/ide.md)
- [External](https://example.com/reference?tab=1#intro)
";
    parse_table_of_contents_content(
      outline,
      Path::new("/site/pages/readme.md"),
      Path::new("/site/pages"),
      &UrlOptions::default(),
    )
  }

  #[test]
  fn test_outline_tree_shape() {
    let toc = toc_fixture();
    assert_eq!(toc.root.len(), 4);

    let intro = &toc.root[0];
    assert_eq!(intro.text.as_deref(), Some("Introduction"));
    assert_eq!(intro.url.as_deref(), Some("/"));
    assert_eq!(intro.file.as_deref(), Some(Path::new("index.md")));
    assert_eq!(intro.depth, 0);
    assert!(!intro.has_parent);

    let docs = &toc.root[1];
    assert_eq!(docs.url.as_deref(), Some("/docs"));
    assert_eq!(docs.children.len(), 2);
    assert!(docs.children.iter().all(|child| {
      child.has_parent && child.depth == 1
    }));
    assert_eq!(
      docs.children[1].file.as_deref(),
      Some(Path::new("docs/installation.md"))
    );
    assert_eq!(docs.children[1].url.as_deref(), Some("/docs/installation"));
  }

  #[test]
  fn test_unlinked_item_keeps_children() {
    let toc = toc_fixture();
    let guides = &toc.root[2];
    assert_eq!(guides.text.as_deref(), Some("Guides"));
    assert_eq!(guides.url, None);
    assert_eq!(guides.file, None);
    assert_eq!(guides.children.len(), 2);
  }

  #[test]
  fn test_external_link_keeps_href_without_fragment_or_query() {
    let toc = toc_fixture();
    let external = &toc.root[3];
    assert_eq!(
      external.url.as_deref(),
      Some("https://example.com/reference")
    );
    assert_eq!(external.file, None);
  }

  #[test]
  fn test_walk_order_and_ancestors() {
    let toc = toc_fixture();
    let entries = walk(&toc);

    let titles: Vec<Option<&str>> =
      entries.iter().map(|entry| entry.title.as_deref()).collect();
    assert_eq!(titles, vec![
      Some("Introduction"),
      Some("Documentation"),
      Some("Getting Started"),
      Some("Installation"),
      Some("Guides"),
      Some("Development Workflow"),
      Some("IDE"),
      Some("External"),
    ]);

    // Fileless nodes still extend the ancestor chain.
    let ide = &entries[6];
    assert_eq!(ide.file.as_deref(), Some(Path::new("/site/pages/guides/ide.md")));
    assert_eq!(ide.ancestors.len(), 1);
    assert_eq!(ide.ancestors[0].title.as_deref(), Some("Guides"));
    assert_eq!(ide.ancestors[0].file, None);
    assert!(ide.ancestors[0].ancestors.is_empty());

    let installation = &entries[3];
    assert_eq!(
      installation.ancestors[0].file.as_deref(),
      Some(Path::new("/site/pages/docs/index.md"))
    );
  }

  #[test]
  fn test_cache_evicts_least_recently_used() {
    let toc = Arc::new(toc_fixture());
    let mut cache = TocCache::new(2);

    cache.insert(1, Arc::clone(&toc));
    cache.insert(2, Arc::clone(&toc));
    assert!(cache.get(1).is_some());

    // Key 2 is now the least recently used and gets evicted.
    cache.insert(3, Arc::clone(&toc));
    assert!(cache.get(2).is_none());
    assert!(cache.get(1).is_some());
    assert!(cache.get(3).is_some());
  }
}

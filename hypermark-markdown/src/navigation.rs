//! Page urls and previous/next/parent navigation over a flattened outline.
use std::path::{Component, Path, PathBuf};

use crate::{
  error::{HypermarkError, Result},
  toc::walk,
  types::{
    NavigationOptions,
    PageNavigation,
    PageNavigationData,
    UrlOptions,
    WalkEntry,
  },
};

/// Compute the site url for a page file, relative to the root pages
/// directory.
///
/// Any `index.md` file name is dropped: `/info/about/index.md` becomes
/// `/info/about`. Other files lose their `.md` suffix. The result always
/// starts with `/`, gaining a trailing `/` only when requested.
///
/// # Errors
///
/// Fails when `page_file_path` is not a descendant of `root_pages_dir`, or
/// does not have a `.md` extension.
pub fn page_url(
  root_pages_dir: &Path,
  page_file_path: &Path,
  opts: &UrlOptions,
) -> Result<String> {
  let root = normalize_path(root_pages_dir);
  let page = normalize_path(page_file_path);

  let Ok(relative) = page.strip_prefix(&root) else {
    return Err(HypermarkError::NotDescendant {
      file: page.clone(),
      root,
    });
  };

  let basename = relative
    .file_name()
    .map(|name| name.to_string_lossy().to_lowercase())
    .unwrap_or_default();
  if !basename.ends_with(".md") {
    return Err(HypermarkError::NotMarkdown(page.clone()));
  }

  let trimmed = if basename == "index.md" {
    relative.parent().unwrap_or_else(|| Path::new(""))
  } else {
    relative
  };

  let mut url = trimmed
    .components()
    .map(|component| component.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/");
  if url.ends_with(".md") {
    url.truncate(url.len() - 3);
  }

  if url.is_empty() {
    return Ok("/".to_string());
  }

  let mut url = format!("/{url}");
  if opts.trailing_slash && !url.ends_with('/') {
    url.push('/');
  }
  Ok(url)
}

/// Find the best navigation candidate from an ordered list of entries.
///
/// Entries with a title and a file differing from `current_file` are
/// preferred; among those the first entry's file is taken and the *last*
/// entry sharing that exact file wins, so an outline that links one file
/// several times under different labels resolves to the label declared
/// last. Titleless entries with a usable file come next; as a last resort
/// the final entry is returned, whatever it holds.
#[must_use]
pub fn find_best_match<'a>(
  current_file: &Path,
  candidates: &'a [WalkEntry],
) -> Option<&'a WalkEntry> {
  let titled: Vec<&WalkEntry> = candidates
    .iter()
    .filter(|entry| {
      entry_links_elsewhere(entry, current_file) && entry.title.is_some()
    })
    .collect();

  if let Some(first) = titled.first() {
    let file = first.file.clone();
    return titled
      .iter()
      .filter(|entry| entry.file == file)
      .next_back()
      .copied();
  }

  candidates
    .iter()
    .find(|entry| entry_links_elsewhere(entry, current_file))
    .or_else(|| candidates.last())
}

fn entry_links_elsewhere(entry: &WalkEntry, current_file: &Path) -> bool {
  entry.file.as_deref().is_some_and(|file| file != current_file)
}

/// Compute navigation data for a page.
///
/// The current url is always derived from the page path. When a table of
/// contents is supplied, the outline decides the current title plus the
/// previous, next and parent pages; the *last* outline entry for the page
/// file wins when the file is listed more than once.
///
/// # Errors
///
/// Fails when the page file (or a matched entry's file) violates the
/// [`page_url`] contract.
pub fn page_navigation(
  root_pages_dir: &Path,
  page_file_path: &Path,
  opts: &NavigationOptions,
) -> Result<PageNavigation> {
  let url_opts = UrlOptions {
    trailing_slash: opts.trailing_slash,
  };

  let mut navigation = PageNavigation {
    current:  PageNavigationData {
      url:   Some(page_url(root_pages_dir, page_file_path, &url_opts)?),
      title: None,
    },
    parent:   None,
    previous: None,
    next:     None,
  };

  let Some(toc) = opts.table_of_contents.as_ref() else {
    return Ok(navigation);
  };

  let entries = walk(toc);
  let page_file = normalize_path(page_file_path);
  let Some(current_index) = entries
    .iter()
    .rposition(|entry| entry.file.as_deref() == Some(page_file.as_path()))
  else {
    return Ok(navigation);
  };

  let current = &entries[current_index];
  navigation.current.title = current.title.clone();

  let mut previous_candidates = entries[..current_index].to_vec();
  previous_candidates.reverse();
  navigation.previous = navigation_data(
    root_pages_dir,
    find_best_match(&page_file, &previous_candidates),
    &url_opts,
  )?;

  navigation.next = navigation_data(
    root_pages_dir,
    find_best_match(&page_file, &entries[current_index + 1..]),
    &url_opts,
  )?;

  let mut ancestors = current.ancestors.clone();
  ancestors.reverse();
  navigation.parent = navigation_data(
    root_pages_dir,
    find_best_match(&page_file, &ancestors),
    &url_opts,
  )?;

  Ok(navigation)
}

/// Convert a matched entry into title/url navigation data. Entries without
/// a file (an unlinked outline item) keep a `None` url.
fn navigation_data(
  root_pages_dir: &Path,
  entry: Option<&WalkEntry>,
  opts: &UrlOptions,
) -> Result<Option<PageNavigationData>> {
  let Some(entry) = entry else {
    return Ok(None);
  };

  let url = match entry.file.as_deref() {
    Some(file) => Some(page_url(root_pages_dir, file, opts)?),
    None => None,
  };
  Ok(Some(PageNavigationData {
    title: entry.title.clone(),
    url,
  }))
}

/// Lexically normalize a path, resolving `.` and `..` components.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        if !normalized.pop() {
          normalized.push("..");
        }
      },
      other => normalized.push(other),
    }
  }
  normalized
}

/// Compute `target` relative to `base`, walking up with `..` components
/// where the paths diverge. Both paths are normalized first.
pub(crate) fn relative_path(base: &Path, target: &Path) -> PathBuf {
  let base = normalize_path(base);
  let target = normalize_path(target);

  let base_components: Vec<Component<'_>> = base.components().collect();
  let target_components: Vec<Component<'_>> = target.components().collect();

  let common = base_components
    .iter()
    .zip(target_components.iter())
    .take_while(|(a, b)| a == b)
    .count();

  let mut relative = PathBuf::new();
  for _ in common..base_components.len() {
    relative.push("..");
  }
  for component in &target_components[common..] {
    relative.push(component.as_os_str());
  }
  relative
}

#[cfg(test)]
mod tests {
  use std::path::{Path, PathBuf};

  use super::{
    find_best_match,
    normalize_path,
    page_url,
    relative_path,
  };
  use crate::{
    error::HypermarkError,
    types::{UrlOptions, WalkEntry},
  };

  fn entry(title: Option<&str>, file: Option<&str>) -> WalkEntry {
    WalkEntry {
      title:     title.map(str::to_string),
      file:      file.map(PathBuf::from),
      depth:     0,
      ancestors: Vec::new(),
    }
  }

  #[test]
  fn test_page_url_drops_index_basename() {
    let opts = UrlOptions::default();
    assert_eq!(
      page_url(Path::new("/root"), Path::new("/root/docs/index.md"), &opts)
        .unwrap(),
      "/docs"
    );
    assert_eq!(
      page_url(Path::new("/root"), Path::new("/root/index.md"), &opts)
        .unwrap(),
      "/"
    );
  }

  #[test]
  fn test_page_url_strips_md_suffix() {
    let opts = UrlOptions::default();
    assert_eq!(
      page_url(Path::new("/root"), Path::new("/root/about.md"), &opts)
        .unwrap(),
      "/about"
    );
    assert_eq!(
      page_url(
        Path::new("/root"),
        Path::new("/root/docs/getting-started.md"),
        &opts
      )
      .unwrap(),
      "/docs/getting-started"
    );
  }

  #[test]
  fn test_page_url_trailing_slash() {
    let opts = UrlOptions {
      trailing_slash: true,
    };
    assert_eq!(
      page_url(Path::new("/root"), Path::new("/root/docs/index.md"), &opts)
        .unwrap(),
      "/docs/"
    );
    // The bare root url never doubles its slash.
    assert_eq!(
      page_url(Path::new("/root"), Path::new("/root/index.md"), &opts)
        .unwrap(),
      "/"
    );
  }

  #[test]
  fn test_page_url_rejects_non_descendants() {
    let result = page_url(
      Path::new("/root/pages"),
      Path::new("/tmp/other.md"),
      &UrlOptions::default(),
    );
    assert!(matches!(result, Err(HypermarkError::NotDescendant { .. })));
  }

  #[test]
  fn test_page_url_rejects_non_markdown() {
    let result = page_url(
      Path::new("/root"),
      Path::new("/root/index.html"),
      &UrlOptions::default(),
    );
    assert!(matches!(result, Err(HypermarkError::NotMarkdown(_))));
  }

  #[test]
  fn test_best_match_prefers_last_of_tied_file_group() {
    let candidates = vec![
      entry(Some("T1"), Some("/pages/b.md")),
      entry(Some("T2"), Some("/pages/b.md")),
      entry(Some("T3"), Some("/pages/c.md")),
    ];
    let best =
      find_best_match(Path::new("/pages/a.md"), &candidates).unwrap();
    assert_eq!(best.title.as_deref(), Some("T2"));
  }

  #[test]
  fn test_best_match_skips_current_file_and_untitled() {
    let candidates = vec![
      entry(Some("Current"), Some("/pages/a.md")),
      entry(None, Some("/pages/b.md")),
      entry(Some("Next"), Some("/pages/c.md")),
    ];
    let best =
      find_best_match(Path::new("/pages/a.md"), &candidates).unwrap();
    assert_eq!(best.title.as_deref(), Some("Next"));
  }

  #[test]
  fn test_best_match_falls_back_to_untitled_entry() {
    let candidates = vec![
      entry(Some("Current"), Some("/pages/a.md")),
      entry(None, Some("/pages/b.md")),
    ];
    let best =
      find_best_match(Path::new("/pages/a.md"), &candidates).unwrap();
    assert_eq!(best.file.as_deref(), Some(Path::new("/pages/b.md")));
  }

  #[test]
  fn test_best_match_last_resort_and_empty() {
    let candidates = vec![entry(Some("Only"), None)];
    let best =
      find_best_match(Path::new("/pages/a.md"), &candidates).unwrap();
    assert_eq!(best.title.as_deref(), Some("Only"));

    assert!(find_best_match(Path::new("/pages/a.md"), &[]).is_none());
  }

  #[test]
  fn test_normalize_path() {
    assert_eq!(
      normalize_path(Path::new("/a/b/../c/./d.md")),
      PathBuf::from("/a/c/d.md")
    );
  }

  #[test]
  fn test_relative_path() {
    assert_eq!(
      relative_path(Path::new("/pages"), Path::new("/pages/docs/index.md")),
      PathBuf::from("docs/index.md")
    );
    assert_eq!(
      relative_path(Path::new("/pages/docs"), Path::new("/pages/about.md")),
      PathBuf::from("../about.md")
    );
  }
}

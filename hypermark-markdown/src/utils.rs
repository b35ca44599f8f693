//! Small text helpers shared across the crate.
use std::path::Path;

/// File extensions stripped by [`slugify`] before slugging, so that
/// `Getting Started.md` and `Getting Started` produce the same slug.
const SLUG_EXTENSIONS: [&str; 8] = [
  ".md", ".markdown", ".txt", ".html", ".htm", ".jpeg", ".jpg", ".png",
];

/// Slugify a string for use as an anchor ID or URL segment.
/// Converts to lowercase, collapses runs of non-alphanumeric characters
/// into a single dash, and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let lowered = text.to_lowercase();
  let mut base = lowered.as_str();
  for ext in SLUG_EXTENSIONS {
    if let Some(stripped) = base.strip_suffix(ext) {
      base = stripped;
      break;
    }
  }

  let mut slug = String::with_capacity(base.len());
  let mut pending_dash = false;
  for c in base.chars() {
    if c.is_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }
  slug
}

/// Slug for a markdown file path. `index.md` files take the name of their
/// containing directory, everything else uses the file name.
#[must_use]
pub fn slugify_file_path(path: &Path) -> String {
  let basename = path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();

  if basename.eq_ignore_ascii_case("index.md") {
    if let Some(parent) = path.parent().and_then(Path::file_name) {
      return slugify(&parent.to_string_lossy());
    }
  }
  slugify(&basename)
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::{slugify, slugify_file_path};

  #[test]
  fn test_slugify_basic() {
    assert_eq!(slugify("My Slugify"), "my-slugify");
    assert_eq!(slugify("My Slugify!!"), "my-slugify");
    assert_eq!(slugify("---My Slugify---"), "my-slugify");
  }

  #[test]
  fn test_slugify_strips_file_extensions() {
    assert_eq!(slugify("My Slugify.markdown"), "my-slugify");
    assert_eq!(slugify("getting-started.md"), "getting-started");
    assert_eq!(slugify("photo.png"), "photo");
  }

  #[test]
  fn test_slugify_collapses_runs() {
    assert_eq!(
      slugify("--#--This is  Some     Example of A_ Heading?!--"),
      "this-is-some-example-of-a-heading"
    );
  }

  #[test]
  fn test_slugify_file_path() {
    assert_eq!(slugify_file_path(Path::new("/pages/About Us.md")), "about-us");
    assert_eq!(slugify_file_path(Path::new("/pages/docs/index.md")), "docs");
    assert_eq!(slugify_file_path(Path::new("/pages/Index.MD")), "pages");
  }
}

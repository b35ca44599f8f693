//! YAML front matter extraction.
//!
//! A front matter block is a leading `---` line, YAML content, and a
//! closing `---` (or `...`) line. Content without such a block is returned
//! untouched with an empty attribute mapping.
use serde_yaml::{Mapping, Value};

use crate::error::Result;

/// Split content into parsed front matter attributes and the markdown
/// body.
///
/// # Errors
///
/// Returns an error when a front matter block is present but does not
/// parse as YAML.
pub fn extract_front_matter(content: &str) -> Result<(Mapping, &str)> {
  let Some((raw, body)) = split_front_matter(content) else {
    return Ok((Mapping::new(), content));
  };

  let attributes = match serde_yaml::from_str::<Value>(raw)? {
    Value::Mapping(mapping) => mapping,
    // A scalar or sequence document carries no usable attributes.
    _ => Mapping::new(),
  };
  Ok((attributes, body))
}

/// Locate a leading front matter block. Returns the raw YAML and the body
/// that follows the closing delimiter.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
  let rest = content.strip_prefix("---")?;
  let rest = rest
    .strip_prefix('\n')
    .or_else(|| rest.strip_prefix("\r\n"))?;

  for terminator in ["\n---", "\n..."] {
    if let Some(end) = rest.find(terminator) {
      let after = &rest[end + terminator.len()..];
      let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);
      return Some((&rest[..end], body));
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use serde_yaml::Value;

  use super::extract_front_matter;

  #[test]
  fn test_extracts_attributes_and_body() {
    let (attributes, body) =
      extract_front_matter("---\ntitle: StencilJS\ncount: 3\n---\n\n# Heading")
        .unwrap();

    assert_eq!(
      attributes.get(&Value::from("title")),
      Some(&Value::from("StencilJS"))
    );
    assert_eq!(attributes.get(&Value::from("count")), Some(&Value::from(3)));
    assert_eq!(body, "\n# Heading");
  }

  #[test]
  fn test_no_front_matter() {
    let (attributes, body) = extract_front_matter("# Just a doc").unwrap();
    assert!(attributes.is_empty());
    assert_eq!(body, "# Just a doc");
  }

  #[test]
  fn test_unterminated_block_is_body() {
    let (attributes, body) = extract_front_matter("---\ntitle: x").unwrap();
    assert!(attributes.is_empty());
    assert_eq!(body, "---\ntitle: x");
  }

  #[test]
  fn test_invalid_yaml_errors() {
    assert!(extract_front_matter("---\ntitle: [unclosed\n---\nbody").is_err());
  }
}

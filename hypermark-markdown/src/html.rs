//! HTML fragment parsing: heading annotation, AST reduction and
//! re-serialization.
use std::path::Path;

use kuchikikiki::NodeRef;
use markup5ever::local_name;
use tendril::TendrilSink;

use crate::{
  ast::{MetaCollector, heading_level, reduce_fragment},
  error::Result,
  types::{HtmlOptions, HtmlResults},
  utils::slugify,
};

/// Read an HTML file and parse it into [`HtmlResults`].
///
/// # Errors
///
/// Returns an error when the file cannot be read.
pub fn parse_html(path: &Path, opts: &HtmlOptions) -> Result<HtmlResults> {
  let content = std::fs::read_to_string(path)?;
  Ok(parse_html_content(&content, opts))
}

/// Parse an HTML fragment into a serializable AST plus extracted metadata.
///
/// Headings are annotated first (ids assigned, anchor links injected when
/// configured), then the fragment is reduced to the AST while anchors,
/// headings, images and tag names are collected in document order.
#[must_use]
pub fn parse_html_content(html: &str, opts: &HtmlOptions) -> HtmlResults {
  let root = parse_fragment_root(html);

  annotate_headings(&root, opts);
  if let Some(class) = opts.paragraph_intro_class.as_deref() {
    if !class.is_empty() {
      annotate_intro_paragraphs(&root, class);
    }
  }

  let mut collector = MetaCollector::new();
  let ast = reduce_fragment(&root, &mut collector);

  HtmlResults {
    ast,
    anchors: collector.anchors,
    headings: collector.headings,
    imgs: collector.imgs,
    tag_names: collector.tag_names,
    html: serialize_fragment(&root),
  }
}

/// Parse an HTML string as a body fragment and return the synthetic root
/// element whose children are the fragment's top-level nodes.
pub(crate) fn parse_fragment_root(html: &str) -> NodeRef {
  let context = markup5ever::QualName::new(
    None,
    markup5ever::ns!(html),
    local_name!("body"),
  );
  let document = kuchikikiki::parse_fragment(context, Vec::new()).one(html);

  // html5ever parses fragments into a document holding a synthetic <html>
  // element that wraps the actual content.
  document.first_child().unwrap_or(document)
}

/// Assign heading ids and, when configured, inject an anchor link as the
/// first child of each heading element.
fn annotate_headings(root: &NodeRef, opts: &HtmlOptions) {
  // Collect before modifying to keep iteration clear of DOM mutation.
  let headings: Vec<_> = match root.select("h1,h2,h3,h4,h5,h6") {
    Ok(select) => select.collect(),
    Err(()) => return,
  };

  for heading in &headings {
    let heading = heading.as_node();
    let Some(element) = heading.as_element() else {
      continue;
    };

    let level = heading_level(element.name.local.as_ref());

    let id = if opts.heading_ids {
      let id = format!(
        "{}{}",
        opts.heading_id_prefix,
        slugify(&heading.text_contents())
      );
      element
        .attributes
        .borrow_mut()
        .insert(local_name!("id"), id.clone());
      Some(id)
    } else {
      element.attributes.borrow().get("id").map(str::to_string)
    };

    // Anchor injection requires generated ids.
    if opts.heading_anchors
      && opts.heading_ids
      && level >= opts.heading_anchor_min_level
    {
      if let Some(id) = id.filter(|id| !id.is_empty()) {
        heading.prepend(heading_anchor(&id, &opts.heading_anchor_class));
      }
    }
  }
}

/// Add the configured class to the document's intro paragraphs: every
/// top-level paragraph before the first subheading, or only the first
/// paragraph when the document has no subheadings.
fn annotate_intro_paragraphs(root: &NodeRef, class: &str) {
  let elements: Vec<NodeRef> = root
    .children()
    .filter(|child| child.as_element().is_some())
    .collect();
  let has_subheadings = elements.iter().any(is_subheading);

  for element in &elements {
    if has_subheadings && is_subheading(element) {
      break;
    }
    if is_tag(element, "p") {
      append_class(element, class);
      if !has_subheadings {
        break;
      }
    }
  }
}

fn is_subheading(node: &NodeRef) -> bool {
  node.as_element().is_some_and(|element| {
    matches!(element.name.local.as_ref(), "h2" | "h3" | "h4" | "h5" | "h6")
  })
}

fn is_tag(node: &NodeRef, tag: &str) -> bool {
  node
    .as_element()
    .is_some_and(|element| element.name.local.as_ref() == tag)
}

/// Append a class to an element, leaving it alone when already present.
fn append_class(node: &NodeRef, class: &str) {
  let Some(element) = node.as_element() else {
    return;
  };

  let mut attributes = element.attributes.borrow_mut();
  let value = match attributes.get("class") {
    Some(existing)
      if existing.split_whitespace().any(|name| name == class) =>
    {
      return;
    },
    Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
    _ => class.to_string(),
  };
  attributes.insert(local_name!("class"), value);
}

/// Build `<a href="#{id}" class="{class}" aria-hidden="true"></a>`.
fn heading_anchor(id: &str, class: &str) -> NodeRef {
  NodeRef::new_element(
    markup5ever::QualName::new(
      None,
      markup5ever::ns!(html),
      local_name!("a"),
    ),
    vec![
      (
        kuchikikiki::ExpandedName::new("", "href"),
        kuchikikiki::Attribute {
          prefix: None,
          value:  format!("#{id}"),
        },
      ),
      (
        kuchikikiki::ExpandedName::new("", "class"),
        kuchikikiki::Attribute {
          prefix: None,
          value:  class.to_string(),
        },
      ),
      (
        kuchikikiki::ExpandedName::new("", "aria-hidden"),
        kuchikikiki::Attribute {
          prefix: None,
          value:  "true".to_string(),
        },
      ),
    ],
  )
}

/// Serialize the fragment's top-level nodes back into an HTML string.
fn serialize_fragment(root: &NodeRef) -> String {
  let mut out = Vec::new();
  for child in root.children() {
    child.serialize(&mut out).ok();
  }
  String::from_utf8(out).unwrap_or_default()
}

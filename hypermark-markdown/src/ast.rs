//! The serializable hypertext AST and the HTML-to-AST reducer.
//!
//! A parsed DOM fragment is lowered into a compact node tree shaped like
//! hypertext call arguments, so `<div id="foo">bar</div>` becomes
//! `["div", {"id": "foo"}, "bar"]` when serialized. The tree can later be
//! mapped directly onto a UI framework's `h(tag, attrs, ...children)`
//! element creation, both server side and client side.
//!
//! Reduction also records document metadata (anchors, headings, images and
//! tag-name usage) on a [`MetaCollector`] threaded through the single
//! traversal.
use std::fmt;

use indexmap::IndexMap;
use kuchikikiki::NodeRef;
use serde::{
  Deserialize,
  Deserializer,
  Serialize,
  Serializer,
  de::{self, SeqAccess, Visitor},
  ser::SerializeSeq,
};

use crate::types::{AnchorData, HeadingData, ImgData};

/// Tags that are unsafe or meaningless to retain verbatim in a serialized
/// AST meant for later re-hydration. They stay in the tree as inert
/// `template` elements.
const TAG_BLACKLIST: [&str; 7] =
  ["script", "link", "meta", "object", "head", "html", "body"];

/// Ordered attribute mapping of one element.
pub type AttrMap = IndexMap<String, AttrValue>;

/// A single attribute value: plain text, or the parsed `style` mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AttrValue {
  Text(String),
  Style(IndexMap<String, String>),
}

impl AttrValue {
  /// The textual value, when this attribute is not a style mapping.
  #[must_use]
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(text) => Some(text),
      Self::Style(_) => None,
    }
  }
}

/// One node of the serializable AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
  /// Plain text, kept exactly as it appeared in the document.
  Text(String),
  /// An element with a tag name, optional attributes and children.
  Element(ElementNode),
}

impl AstNode {
  /// The element node, when this is not text.
  #[must_use]
  pub fn as_element(&self) -> Option<&ElementNode> {
    match self {
      Self::Element(element) => Some(element),
      Self::Text(_) => None,
    }
  }
}

/// An element node. Serializes as `[tag, attrs | null, ...children]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
  pub tag:      String,
  pub attrs:    Option<AttrMap>,
  pub children: Vec<AstNode>,
}

impl ElementNode {
  /// A bare element with no attributes and no children.
  #[must_use]
  pub fn new(tag: impl Into<String>) -> Self {
    Self {
      tag:      tag.into(),
      attrs:    None,
      children: Vec::new(),
    }
  }
}

impl Serialize for AstNode {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match self {
      Self::Text(text) => serializer.serialize_str(text),
      Self::Element(element) => {
        let mut seq =
          serializer.serialize_seq(Some(2 + element.children.len()))?;
        seq.serialize_element(&element.tag)?;
        seq.serialize_element(&element.attrs)?;
        for child in &element.children {
          seq.serialize_element(child)?;
        }
        seq.end()
      },
    }
  }
}

impl<'de> Deserialize<'de> for AstNode {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct NodeVisitor;

    impl<'de> Visitor<'de> for NodeVisitor {
      type Value = AstNode;

      fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
          .write_str("a text node string or a [tag, attrs, ...children] sequence")
      }

      fn visit_str<E>(self, value: &str) -> Result<AstNode, E>
      where
        E: de::Error,
      {
        Ok(AstNode::Text(value.to_string()))
      }

      fn visit_string<E>(self, value: String) -> Result<AstNode, E>
      where
        E: de::Error,
      {
        Ok(AstNode::Text(value))
      }

      fn visit_seq<A>(self, mut seq: A) -> Result<AstNode, A::Error>
      where
        A: SeqAccess<'de>,
      {
        let tag: String = seq
          .next_element()?
          .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let attrs: Option<AttrMap> = seq
          .next_element()?
          .ok_or_else(|| de::Error::invalid_length(1, &self))?;

        let mut children = Vec::new();
        while let Some(child) = seq.next_element::<AstNode>()? {
          children.push(child);
        }

        Ok(AstNode::Element(ElementNode {
          tag,
          attrs,
          children,
        }))
      }
    }

    deserializer.deserialize_any(NodeVisitor)
  }
}

/// Mutable collector threaded through a reduction. Gathers the document
/// metadata that falls out of the single traversal; insertion order is
/// document order throughout.
#[derive(Debug, Default)]
pub struct MetaCollector {
  pub anchors:   Vec<AnchorData>,
  pub headings:  Vec<HeadingData>,
  pub imgs:      Vec<ImgData>,
  pub tag_names: Vec<String>,
}

impl MetaCollector {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  fn record_tag(&mut self, tag: &str) {
    if !self.tag_names.iter().any(|seen| seen == tag) {
      self.tag_names.push(tag.to_string());
    }
  }
}

/// Reduce the children of a parsed fragment root into the top-level AST.
///
/// Whitespace-only text between top-level elements is dropped. Any other
/// bare text is wrapped as `["span", null, text]` so the top level is
/// uniformly composed of elements. Order is preserved.
#[must_use]
pub fn reduce_fragment(
  root: &NodeRef,
  collector: &mut MetaCollector,
) -> Vec<AstNode> {
  let mut nodes = Vec::new();
  for child in root.children() {
    match reduce_node(&child, collector) {
      AstNode::Text(text) => {
        if !text.trim().is_empty() {
          nodes.push(AstNode::Element(ElementNode {
            tag:      "span".to_string(),
            attrs:    None,
            children: vec![AstNode::Text(text)],
          }));
        }
      },
      element @ AstNode::Element(_) => nodes.push(element),
    }
  }
  nodes
}

/// Reduce a single DOM node.
///
/// Text nodes come through unchanged, whitespace included. Element nodes
/// are lowered with their tag name folded to lowercase; anchors, headings,
/// images and tag names are recorded on the collector along the way.
/// Anything else (comments, doctypes, processing instructions) reduces to
/// an empty text node.
#[must_use]
pub fn reduce_node(node: &NodeRef, collector: &mut MetaCollector) -> AstNode {
  if let Some(text) = node.as_text() {
    return AstNode::Text(text.borrow().clone());
  }

  let Some(element) = node.as_element() else {
    return AstNode::Text(String::new());
  };

  let mut tag = element.name.local.as_ref().to_lowercase();
  if TAG_BLACKLIST.contains(&tag.as_str()) {
    tag = "template".to_string();
  }
  collector.record_tag(&tag);

  let mut attrs = AttrMap::new();
  {
    let attributes = element.attributes.borrow();
    for (name, attr) in &attributes.map {
      attrs.insert(
        name.local.as_ref().to_string(),
        AttrValue::Text(attr.value.clone()),
      );
    }
  }

  let style_text = attrs
    .get("style")
    .and_then(AttrValue::as_text)
    .map(str::to_string);
  if let Some(style_text) = style_text {
    match parse_style(&style_text) {
      // Replacing an existing key keeps its position in the map.
      Some(parsed) => {
        attrs.insert("style".to_string(), AttrValue::Style(parsed));
      },
      None => {
        attrs.shift_remove("style");
      },
    }
  }

  match tag.as_str() {
    "a" => {
      if let Some(href) = attrs.get("href").and_then(AttrValue::as_text) {
        if !href.starts_with('#') {
          collector.anchors.push(AnchorData {
            href: Some(href.to_string()),
            text: node.text_contents(),
          });
        }
      }
    },
    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
      collector.headings.push(HeadingData {
        text:  node.text_contents(),
        level: heading_level(&tag),
        id:    attrs
          .get("id")
          .and_then(AttrValue::as_text)
          .map(str::to_string),
      });
    },
    "img" => {
      collector.imgs.push(ImgData {
        text: attrs
          .get("alt")
          .and_then(AttrValue::as_text)
          .map(str::to_string),
        src:  attrs
          .get("src")
          .and_then(AttrValue::as_text)
          .map(str::to_string),
      });
    },
    _ => {},
  }

  let mut children = Vec::new();
  for child in node.children() {
    children.push(reduce_node(&child, collector));
  }

  AstNode::Element(ElementNode {
    tag,
    attrs: if attrs.is_empty() { None } else { Some(attrs) },
    children,
  })
}

pub(crate) fn heading_level(tag: &str) -> u8 {
  match tag {
    "h1" => 1,
    "h2" => 2,
    "h3" => 3,
    "h4" => 4,
    "h5" => 5,
    _ => 6,
  }
}

/// Parse an inline `style="..."` attribute into an ordered property map.
///
/// Declarations split on `;`, then on `:`. A segment is kept only when it
/// splits into exactly a property and a value and the trimmed property
/// name is non-empty; everything else is silently skipped. Returns `None`
/// for blank input or when no valid declarations remain.
#[must_use]
pub fn parse_style(style: &str) -> Option<IndexMap<String, String>> {
  if style.trim().is_empty() {
    return None;
  }

  let mut parsed = IndexMap::new();
  for declaration in style.split(';') {
    let parts: Vec<&str> = declaration.split(':').collect();
    if parts.len() != 2 {
      continue;
    }
    let property = parts[0].trim();
    let value = parts[1].trim();
    if !property.is_empty() {
      parsed.insert(property.to_string(), value.to_string());
    }
  }

  if parsed.is_empty() { None } else { Some(parsed) }
}

#[cfg(test)]
mod tests {
  use super::{AstNode, AttrValue, ElementNode, parse_style};

  #[test]
  fn test_parse_style_declarations() {
    let style = parse_style("max-height: 360px;width:240px").unwrap();
    assert_eq!(style.len(), 2);
    assert_eq!(style["max-height"], "360px");
    assert_eq!(style["width"], "240px");
  }

  #[test]
  fn test_parse_style_blank() {
    assert_eq!(parse_style(""), None);
    assert_eq!(parse_style("   "), None);
  }

  #[test]
  fn test_parse_style_skips_malformed_segments() {
    // No colon, empty property and a colon-heavy url all get dropped.
    assert_eq!(parse_style("color"), None);
    assert_eq!(parse_style(" : red"), None);
    assert_eq!(parse_style("background: url(http://a/b)"), None);

    let style = parse_style("color; width : 1px ;:x").unwrap();
    assert_eq!(style.len(), 1);
    assert_eq!(style["width"], "1px");
  }

  #[test]
  fn test_ast_serde_round_trip() {
    let ast = vec![AstNode::Element(ElementNode {
      tag:      "div".to_string(),
      attrs:    Some(
        [("id".to_string(), AttrValue::Text("foo".to_string()))]
          .into_iter()
          .collect(),
      ),
      children: vec![
        AstNode::Text("bar".to_string()),
        AstNode::Element(ElementNode::new("br")),
      ],
    })];

    let json = serde_json::to_string(&ast).unwrap();
    assert_eq!(json, r#"[["div",{"id":"foo"},"bar",["br",null]]]"#);

    let parsed: Vec<AstNode> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ast);
  }

  #[test]
  fn test_ast_deserialize_style_mapping() {
    let json = r#"["img",{"src":"a.png","style":{"width":"240px"}}]"#;
    let node: AstNode = serde_json::from_str(json).unwrap();

    let element = node.as_element().unwrap();
    assert_eq!(element.tag, "img");
    let attrs = element.attrs.as_ref().unwrap();
    assert_eq!(attrs["src"], AttrValue::Text("a.png".to_string()));
    assert!(matches!(attrs["style"], AttrValue::Style(_)));
  }
}

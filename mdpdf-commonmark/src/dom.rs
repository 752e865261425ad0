//! Small helpers around `kuchikikiki` for rewriting HTML fragments.
//!
//! Every post-processing stage parses the fragment into a tree, edits the
//! tree, and serializes the `<body>` contents back out. Tag and attribute
//! syntax is therefore never seen by the rewriting code.
use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use markup5ever::{QualName, local_name, ns};
use tendril::TendrilSink;

/// Parse an HTML fragment into a full document tree.
///
/// The fragment ends up inside `<body>`; use [`serialize_body`] to get it
/// back out. Parsing starts in body context, so leading `<style>`, `<link>`
/// or `<meta>` elements stay in place instead of moving into `<head>`.
#[must_use]
pub fn parse_fragment(html: &str) -> NodeRef {
  kuchikikiki::parse_html().one(format!("<body>{html}"))
}

/// Serialize the children of `<body>`, falling back to the whole document
/// when there is no body element.
#[must_use]
pub fn serialize_body(document: &NodeRef) -> String {
  let mut out = Vec::new();
  match document.select_first("body") {
    Ok(body) => {
      for child in body.as_node().children() {
        if let Err(e) = child.serialize(&mut out) {
          log::error!("Failed to serialize HTML node: {e}");
        }
      }
    },
    Err(()) => {
      if let Err(e) = document.serialize(&mut out) {
        log::error!("Failed to serialize HTML document: {e}");
      }
    },
  }
  String::from_utf8(out).unwrap_or_default()
}

/// Parse `html`, let `transform_fn` edit the tree, and serialize the result.
///
/// Blank input is returned unchanged without being parsed.
pub fn transform_fragment<F>(html: &str, transform_fn: F) -> String
where
  F: FnOnce(&NodeRef),
{
  if html.trim().is_empty() {
    return html.to_string();
  }

  let document = parse_fragment(html);
  transform_fn(&document);
  serialize_body(&document)
}

/// Parse an HTML fragment and detach its top-level nodes so they can be
/// moved into another tree.
///
/// The fragment is parsed inside a `<div>` so leading whitespace survives.
#[must_use]
pub fn fragment_nodes(html: &str) -> Vec<NodeRef> {
  let document = parse_fragment(&format!("<div>{html}</div>"));
  let Ok(wrapper) = document.select_first("body > div") else {
    return Vec::new();
  };

  let nodes: Vec<NodeRef> = wrapper.as_node().children().collect();
  for node in &nodes {
    node.detach();
  }
  nodes
}

/// Create a `<span>` element with the given attributes.
#[must_use]
pub fn new_span(attributes: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), local_name!("span")),
    attributes.iter().map(|(name, value)| {
      (ExpandedName::new("", *name), Attribute {
        prefix: None,
        value:  (*value).to_string(),
      })
    }),
  )
}

/// Return the local tag name if `node` is an element.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
  node
    .as_element()
    .map(|element| element.name.local.as_ref().to_string())
}

/// Whether any ancestor of `node` is an element named `name`.
#[must_use]
pub fn has_ancestor(node: &NodeRef, name: &str) -> bool {
  node
    .ancestors()
    .any(|ancestor| tag_name(&ancestor).as_deref() == Some(name))
}

/// Whether the element's `class` attribute contains `class_name`.
#[must_use]
pub fn has_class(node: &NodeRef, class_name: &str) -> bool {
  node.as_element().is_some_and(|element| {
    element
      .attributes
      .borrow()
      .get("class")
      .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
  })
}

/// Append `class_name` to the element's `class` attribute if missing.
pub fn add_class(node: &NodeRef, class_name: &str) {
  if has_class(node, class_name) {
    return;
  }
  if let Some(element) = node.as_element() {
    let mut attributes = element.attributes.borrow_mut();
    let classes = match attributes.get("class") {
      Some(existing) if !existing.trim().is_empty() => {
        format!("{} {class_name}", existing.trim())
      },
      _ => class_name.to_string(),
    };
    attributes.insert(local_name!("class"), classes);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_round_trip_keeps_body_content_only() {
    let html = transform_fragment("<p>Hello <em>there</em></p>", |_| {});
    assert_eq!(html, "<p>Hello <em>there</em></p>");
    assert!(!html.contains("<body>"));
  }

  #[test]
  fn test_head_elements_stay_in_body() {
    let input = "<style>h1 { color: red; }</style>\n<link rel=\"stylesheet\" \
                 href=\"a.css\">\n<p>x</p>";
    let html = transform_fragment(input, |_| {});
    assert!(html.starts_with("<style>h1 { color: red; }</style>"));
    assert!(html.contains("<link "));
    assert!(html.contains("href=\"a.css\""));
    assert!(html.ends_with("<p>x</p>"));
  }

  #[test]
  fn test_blank_input_is_not_parsed() {
    assert_eq!(transform_fragment("  \n", |_| {}), "  \n");
    assert_eq!(transform_fragment("", |_| {}), "");
  }

  #[test]
  fn test_add_class_appends_once() {
    let html = transform_fragment("<pre class=\"a\"></pre>", |document| {
      if let Ok(pre) = document.select_first("pre") {
        add_class(pre.as_node(), "highlight");
        add_class(pre.as_node(), "highlight");
      }
    });
    assert_eq!(html, "<pre class=\"a highlight\"></pre>");
  }

  #[test]
  fn test_has_ancestor() {
    let document = parse_fragment("<pre><code>x</code></pre><code>y</code>");
    let codes: Vec<_> = document
      .select("code")
      .map(Iterator::collect::<Vec<_>>)
      .unwrap_or_default();
    assert_eq!(codes.len(), 2);
    assert!(has_ancestor(codes[0].as_node(), "pre"));
    assert!(!has_ancestor(codes[1].as_node(), "pre"));
  }

  #[test]
  fn test_fragment_nodes_are_detached() {
    let nodes = fragment_nodes("<span>a</span>b");
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.parent().is_none()));
  }

  #[test]
  fn test_fragment_nodes_keep_leading_whitespace() {
    let nodes = fragment_nodes("\n  <span>a</span>");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].text_contents(), "\n  ");
  }
}

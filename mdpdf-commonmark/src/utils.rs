//! Small helpers shared by the processor.
use std::any::Any;

use comrak::nodes::{AstNode, NodeHeading, NodeValue};

/// Text of the first level 1 heading in the document, if any.
///
/// Inline formatting is flattened, so `# The *Real* Title` gives
/// `The Real Title`. Headings without any text are skipped.
#[must_use]
pub fn extract_title<'a>(root: &'a AstNode<'a>) -> Option<String> {
  root.descendants().find_map(|node| {
    let is_h1 = matches!(
      node.data.borrow().value,
      NodeValue::Heading(NodeHeading { level: 1, .. })
    );
    if !is_h1 {
      return None;
    }
    let text = extract_inline_text(node);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
  })
}

/// Extract all inline text below a node.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::Link(..)
      | NodeValue::Emph
      | NodeValue::Strong
      | NodeValue::Strikethrough
      | NodeValue::Superscript
      | NodeValue::Subscript => text.push_str(&extract_inline_text(child)),
      _ => {},
    }
  }
  text
}

/// Human readable message from a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
  payload
    .downcast_ref::<String>()
    .cloned()
    .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_string()))
    .unwrap_or_else(|| "unknown panic".to_string())
}

//! Ordered list of extra items appended to a document.

/// Ordered collection of Markdown snippets, rendered as a bullet list after
/// the document body.
///
/// Operations return new lists; a list never changes in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemList {
  items: Vec<String>,
}

impl ItemList {
  #[must_use]
  pub const fn new() -> Self {
    Self { items: Vec::new() }
  }

  /// List with `item` appended. Blank items are ignored and line breaks are
  /// folded into spaces so every item stays a single bullet.
  #[must_use]
  pub fn with_item(&self, item: &str) -> Self {
    let item = item.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut items = self.items.clone();
    if !item.is_empty() {
      items.push(item);
    }
    Self { items }
  }

  /// List without the item at `index`; out of range indices change nothing.
  #[must_use]
  pub fn without_item(&self, index: usize) -> Self {
    let items = self
      .items
      .iter()
      .enumerate()
      .filter(|(i, _)| *i != index)
      .map(|(_, item)| item.clone())
      .collect();
    Self { items }
  }

  #[must_use]
  pub fn items(&self) -> &[String] {
    &self.items
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.items.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// The list as a Markdown bullet list, empty for an empty list.
  #[must_use]
  pub fn to_markdown(&self) -> String {
    self
      .items
      .iter()
      .map(|item| format!("- {item}\n"))
      .collect()
  }

  /// Append the list to `markdown`, separated by a blank line.
  #[must_use]
  pub fn append_to(&self, markdown: &str) -> String {
    if self.is_empty() {
      return markdown.to_string();
    }
    format!("{}\n\n{}", markdown.trim_end(), self.to_markdown())
  }
}

impl<S: AsRef<str>> FromIterator<S> for ItemList {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    iter
      .into_iter()
      .fold(Self::new(), |list, item| list.with_item(item.as_ref()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_with_and_without_item_return_new_lists() {
    let empty = ItemList::new();
    let one = empty.with_item("first");
    let two = one.with_item("second");

    assert!(empty.is_empty());
    assert_eq!(one.items(), ["first"]);
    assert_eq!(two.items(), ["first", "second"]);

    let removed = two.without_item(0);
    assert_eq!(removed.items(), ["second"]);
    assert_eq!(two.len(), 2);
    assert_eq!(two.without_item(7), two);
  }

  #[test]
  fn test_items_are_single_lines() {
    let list = ItemList::new().with_item("  ").with_item("a\nb\n\nc");
    assert_eq!(list.items(), ["a b c"]);
  }

  #[test]
  fn test_to_markdown_and_append() {
    let list: ItemList = ["one", "two"].into_iter().collect();
    assert_eq!(list.to_markdown(), "- one\n- two\n");
    assert_eq!(list.append_to("# Doc\n\n"), "# Doc\n\n- one\n- two\n");
    assert_eq!(ItemList::new().append_to("text"), "text");
  }
}

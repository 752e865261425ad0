//! CJK script tagging.
//!
//! Finds maximal runs of Chinese, Japanese and Korean characters in the text
//! nodes of an HTML fragment and wraps each run in
//! `<span class="cjk" lang="..">`, so a stylesheet can switch to a CJK capable
//! font for exactly those runs.
//!
//! Only text nodes are visited. Attribute values, comments and the contents
//! of `<script>`, `<style>` and already tagged spans are left alone, which
//! also makes the operation idempotent.
use kuchikikiki::NodeRef;

use crate::dom;

/// Default value for the `lang` attribute of CJK spans.
pub const DEFAULT_CJK_LANG: &str = "zh";

/// Class put on every CJK span; doubles as the "already tagged" marker.
pub const CJK_CLASS: &str = "cjk";

/// Whether `c` belongs to one of the CJK blocks that need a CJK font.
#[must_use]
pub const fn is_cjk(c: char) -> bool {
  matches!(
    c as u32,
    0x1100..=0x11FF     // Hangul Jamo
      | 0x2E80..=0x2FDF // CJK radicals, Kangxi radicals
      | 0x3000..=0x303F // CJK symbols and punctuation
      | 0x3040..=0x30FF // Hiragana, Katakana
      | 0x3100..=0x312F // Bopomofo
      | 0x3130..=0x318F // Hangul compatibility Jamo
      | 0x31F0..=0x31FF // Katakana phonetic extensions
      | 0x3400..=0x4DBF // CJK unified ideographs extension A
      | 0x4E00..=0x9FFF // CJK unified ideographs
      | 0xAC00..=0xD7AF // Hangul syllables
      | 0xF900..=0xFAFF // CJK compatibility ideographs
      | 0xFF00..=0xFFEF // Half/fullwidth forms
      | 0x20000..=0x2FA1F // Extensions B onwards, compatibility supplement
  )
}

/// Split `text` into alternating runs, flagging the CJK ones.
///
/// Concatenating the returned slices yields `text` again.
#[must_use]
pub fn cjk_runs(text: &str) -> Vec<(bool, &str)> {
  let mut runs = Vec::new();
  let mut start = 0;
  let mut current: Option<bool> = None;

  for (idx, c) in text.char_indices() {
    let cjk = is_cjk(c);
    match current {
      Some(kind) if kind != cjk => {
        runs.push((kind, &text[start..idx]));
        start = idx;
        current = Some(cjk);
      },
      None => current = Some(cjk),
      Some(_) => {},
    }
  }

  if let Some(kind) = current {
    runs.push((kind, &text[start..]));
  }
  runs
}

/// Tag CJK runs in an HTML fragment.
#[must_use]
pub fn tag_script(html: &str, lang: &str) -> String {
  if !html.chars().any(is_cjk) {
    return html.to_string();
  }
  dom::transform_fragment(html, |document| tag_document(document, lang))
}

/// Tag CJK runs in an already parsed tree.
pub fn tag_document(document: &NodeRef, lang: &str) {
  let targets: Vec<NodeRef> = document
    .inclusive_descendants()
    .filter(|node| {
      node
        .as_text()
        .is_some_and(|text| text.borrow().chars().any(is_cjk))
    })
    .filter(|node| !in_skipped_context(node))
    .collect();

  for node in targets {
    wrap_runs(&node, lang);
  }
}

fn in_skipped_context(node: &NodeRef) -> bool {
  node.ancestors().any(|ancestor| {
    match dom::tag_name(&ancestor).as_deref() {
      Some("script" | "style" | "title" | "textarea") => true,
      Some("span") => dom::has_class(&ancestor, CJK_CLASS),
      _ => false,
    }
  })
}

/// Replace a text node by its runs, CJK runs wrapped in spans.
fn wrap_runs(node: &NodeRef, lang: &str) {
  let Some(text) = node.as_text() else {
    return;
  };
  let content = text.borrow().clone();

  for (cjk, segment) in cjk_runs(&content) {
    if cjk {
      let span = dom::new_span(&[("class", CJK_CLASS), ("lang", lang)]);
      span.append(NodeRef::new_text(segment));
      node.insert_before(span);
    } else {
      node.insert_before(NodeRef::new_text(segment));
    }
  }
  node.detach();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_cjk() {
    assert!(is_cjk('中'));
    assert!(is_cjk('あ'));
    assert!(is_cjk('カ'));
    assert!(is_cjk('한'));
    assert!(is_cjk('。'));
    assert!(!is_cjk('a'));
    assert!(!is_cjk(' '));
    assert!(!is_cjk('é'));
  }

  #[test]
  fn test_cjk_runs_are_maximal_and_lossless() {
    let text = "Hello 世界, こんにちは!";
    let runs = cjk_runs(text);
    assert_eq!(runs, vec![
      (false, "Hello "),
      (true, "世界"),
      (false, ", "),
      (true, "こんにちは"),
      (false, "!"),
    ]);
    assert_eq!(runs.iter().map(|(_, s)| *s).collect::<String>(), text);
    assert!(cjk_runs("").is_empty());
  }

  #[test]
  fn test_wraps_runs_in_text_nodes() {
    let html = tag_script("<p>Hello 世界!</p>", "zh");
    assert_eq!(
      html,
      "<p>Hello <span class=\"cjk\" lang=\"zh\">世界</span>!</p>"
    );
  }

  #[test]
  fn test_attributes_are_not_touched() {
    let html = tag_script("<p><a href=\"#\" title=\"中文\">中文</a></p>", "zh");
    assert!(html.contains("title=\"中文\""));
    assert!(html.contains("<span class=\"cjk\" lang=\"zh\">中文</span></a>"));
    assert_eq!(html.matches("<span").count(), 1);
  }

  #[test]
  fn test_escaped_angle_brackets_survive() {
    let html = tag_script("<p>a &lt;b&gt; 漢字 &lt;/b&gt;</p>", "ja");
    assert!(html.contains("a &lt;b&gt; "));
    assert!(html.contains("<span class=\"cjk\" lang=\"ja\">漢字</span>"));
    assert!(html.contains(" &lt;/b&gt;"));
  }

  #[test]
  fn test_idempotent() {
    let input = "<h1>标题</h1><p>mixed 中文 and <strong>한국어</strong></p>";
    let once = tag_script(input, "zh");
    let twice = tag_script(&once, "zh");
    assert_eq!(once, twice);
    assert_eq!(once.matches("class=\"cjk\"").count(), 3);
  }

  #[test]
  fn test_style_and_script_are_skipped() {
    let input = "<p>文</p><style>p::before { content: \"中\"; }</style>";
    let html = tag_script(input, "zh");
    assert!(html.contains("content: \"中\""));
    assert_eq!(html.matches("class=\"cjk\"").count(), 1);
  }

  #[test]
  fn test_no_cjk_is_passthrough() {
    let input = "<p>plain <em>text</em></p>";
    assert_eq!(tag_script(input, "zh"), input);
  }
}

//! Core implementation of the Markdown processor.
//!
//! The rendering pipeline is `normalize` (comrak) followed by a single DOM
//! post-processing pass that runs, in order, code block highlighting, inline
//! code restyling and CJK tagging.
use std::{panic::AssertUnwindSafe, sync::Arc};

use comrak::{Arena, format_html, options::Options, parse_document};
use kuchikikiki::NodeRef;
use log::{debug, error, warn};
use markup5ever::local_name;

use super::types::{MarkdownOptions, MarkdownProcessor};
use crate::{
  dom,
  error::ConversionError,
  script,
  syntax::{SyntaxManager, create_default_manager},
  types::MarkdownResult,
  utils,
};

/// Class added to `<pre>` once its code block has been highlighted.
pub const HIGHLIGHT_CLASS: &str = "highlight";

/// Class added to restyled inline `<code>` elements.
pub const INLINE_CODE_CLASS: &str = "inline-code";

/// Inline style given to inline `<code>` elements.
pub const INLINE_CODE_STYLE: &str =
  "background-color: #f4f4f4; padding: 2px 4px; border-radius: 3px;";

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let syntax_manager = if options.highlight_code {
      match create_default_manager(options.highlight_theme.as_deref()) {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          warn!("Syntax highlighting disabled: {e}");
          None
        },
      }
    } else {
      None
    };

    Self {
      options,
      syntax_manager,
    }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// The syntax manager, if highlighting is enabled and available.
  #[must_use]
  pub fn syntax_manager(&self) -> Option<&SyntaxManager> {
    self.syntax_manager.as_deref()
  }

  /// Render Markdown to post-processed HTML.
  ///
  /// # Errors
  ///
  /// Returns a [`ConversionError`] if comrak fails to produce HTML.
  pub fn render(
    &self,
    markdown: &str,
  ) -> Result<MarkdownResult, ConversionError> {
    let mut result = self.normalize(markdown)?;
    if result.is_blank() {
      return Ok(result);
    }

    result.html = dom::transform_fragment(&result.html, |document| {
      self.apply_dom_transformations(document);
    });
    Ok(result)
  }

  /// Convert Markdown to HTML with tables, fenced code blocks and hard line
  /// breaks. Blank input gives an empty result.
  ///
  /// Panics inside the parser are caught and reported as
  /// [`ConversionError::Panicked`].
  ///
  /// # Errors
  ///
  /// Returns a [`ConversionError`] if the HTML could not be produced.
  pub fn normalize(
    &self,
    markdown: &str,
  ) -> Result<MarkdownResult, ConversionError> {
    if markdown.trim().is_empty() {
      return Ok(MarkdownResult::default());
    }

    std::panic::catch_unwind(AssertUnwindSafe(|| self.convert_to_html(markdown)))
      .map_err(|payload| {
        let message = utils::panic_message(payload.as_ref());
        error!("Panic during markdown processing: {message}");
        ConversionError::Panicked(message)
      })?
  }

  /// Highlight fenced code blocks and restyle inline code.
  ///
  /// Never fails: blocks that cannot be highlighted are left as they are.
  #[must_use]
  pub fn highlight(&self, html: &str) -> String {
    if self.syntax_manager.is_none() && !self.options.style_inline_code {
      return html.to_string();
    }
    dom::transform_fragment(html, |document| self.highlight_document(document))
  }

  /// Wrap CJK runs in language-tagged spans, using the configured `lang`.
  #[must_use]
  pub fn tag_script(&self, html: &str) -> String {
    script::tag_script(html, &self.options.cjk_lang)
  }

  fn convert_to_html(
    &self,
    content: &str,
  ) -> Result<MarkdownResult, ConversionError> {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, content, &options);

    let title = utils::extract_title(root);

    let mut html = String::new();
    format_html(root, &options, &mut html)
      .map_err(|e| ConversionError::Render(e.to_string()))?;

    Ok(MarkdownResult { html, title })
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    options.extension.table = true;
    if self.options.gfm {
      options.extension.strikethrough = true;
      options.extension.autolink = true;
      options.extension.tasklist = true;
      options.extension.footnotes = true;
    }
    options.render.hardbreaks = self.options.hard_breaks;
    // Raw HTML passes through, like most Markdown-to-PDF tools allow.
    options.render.r#unsafe = true;
    options
  }

  fn apply_dom_transformations(&self, document: &NodeRef) {
    self.highlight_document(document);
    if self.options.tag_cjk {
      script::tag_document(document, &self.options.cjk_lang);
    }
  }

  /// Block pass first, then inline pass. The inline pass only considers
  /// `code` elements without a `pre` ancestor, so it never sees block
  /// output.
  fn highlight_document(&self, document: &NodeRef) {
    if let Some(manager) = self.syntax_manager.as_deref() {
      self.highlight_code_blocks(document, manager);
    }
    if self.options.style_inline_code {
      style_inline_code(document);
    }
  }

  fn highlight_code_blocks(&self, document: &NodeRef, manager: &SyntaxManager) {
    // Collect first so the tree is not modified while being traversed
    let Ok(selection) = document.select("pre > code") else {
      return;
    };
    let code_nodes: Vec<NodeRef> =
      selection.map(|code| code.as_node().clone()).collect();

    for code_node in code_nodes {
      let Some(pre_node) = code_node.parent() else {
        continue;
      };
      if dom::has_class(&pre_node, HIGHLIGHT_CLASS) {
        continue;
      }

      let language = code_language(&code_node).unwrap_or_default();
      let code_text = code_node.text_contents();

      match manager.highlight_code(
        &code_text,
        &language,
        self.options.highlight_theme.as_deref(),
      ) {
        Ok(highlighted) => {
          let old_children: Vec<NodeRef> = code_node.children().collect();
          for child in old_children {
            child.detach();
          }
          for node in dom::fragment_nodes(&highlighted) {
            code_node.append(node);
          }
          dom::add_class(&pre_node, HIGHLIGHT_CLASS);
        },
        Err(e) => debug!("Leaving code block unhighlighted: {e}"),
      }
    }
  }
}

/// Language named by a `language-<name>` class on a `code` element.
fn code_language(code_node: &NodeRef) -> Option<String> {
  let element = code_node.as_element()?;
  let attributes = element.attributes.borrow();
  attributes
    .get("class")?
    .split_whitespace()
    .find_map(|class| class.strip_prefix("language-"))
    .filter(|language| !language.is_empty())
    .map(ToString::to_string)
}

/// Give every inline `code` element a background and padding.
fn style_inline_code(document: &NodeRef) {
  let Ok(selection) = document.select("code") else {
    return;
  };
  let inline_nodes: Vec<NodeRef> = selection
    .map(|code| code.as_node().clone())
    .filter(|node| !dom::has_ancestor(node, "pre"))
    .filter(|node| !dom::has_class(node, INLINE_CODE_CLASS))
    .collect();

  for node in inline_nodes {
    dom::add_class(&node, INLINE_CODE_CLASS);
    if let Some(element) = node.as_element() {
      let mut attributes = element.attributes.borrow_mut();
      let style = match attributes.get("style") {
        Some(existing) if !existing.trim().is_empty() => {
          format!("{} {INLINE_CODE_STYLE}", existing.trim())
        },
        _ => INLINE_CODE_STYLE.to_string(),
      };
      attributes.insert(local_name!("style"), style);
    }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  fn plain_processor() -> MarkdownProcessor {
    MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..Default::default()
    })
  }

  #[test]
  fn test_normalize_blank_input() {
    let processor = plain_processor();
    assert!(processor.normalize("").expect("blank").html.is_empty());
    assert!(processor.normalize("  \n\t\n").expect("blank").is_blank());
  }

  #[test]
  fn test_single_newline_becomes_break() {
    let processor = plain_processor();
    let result = processor.normalize("first line\nsecond line").expect("ok");
    assert!(result.html.contains("first line<br"));
    assert!(result.html.contains("second line"));
  }

  #[test]
  fn test_soft_breaks_when_disabled() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      hard_breaks: false,
      ..Default::default()
    });
    let result = processor.normalize("first line\nsecond line").expect("ok");
    assert!(!result.html.contains("<br"));
  }

  #[test]
  fn test_title_is_first_h1() {
    let processor = plain_processor();
    let result = processor
      .normalize("## Intro\n\n# The *Real* Title\n\n# Second")
      .expect("ok");
    assert_eq!(result.title.as_deref(), Some("The Real Title"));
  }

  #[test]
  fn test_fenced_code_keeps_language_class() {
    let processor = plain_processor();
    let result = processor
      .normalize("```python\nprint('hi')\n```")
      .expect("ok");
    assert!(result.html.contains("<pre><code class=\"language-python\">"));
  }

  #[test]
  fn test_inline_code_is_restyled_but_blocks_are_not() {
    let processor = plain_processor();
    let result = processor
      .render("Use `cargo` here.\n\n```\nblock `tick`\n```")
      .expect("ok");

    assert!(result.html.contains(&format!(
      "<code class=\"{INLINE_CODE_CLASS}\" style=\"{INLINE_CODE_STYLE}\">cargo</code>"
    )));
    assert_eq!(result.html.matches(INLINE_CODE_CLASS).count(), 1);
    assert!(result.html.contains("<pre><code>block `tick`"));
  }

  #[test]
  fn test_inline_restyle_is_idempotent() {
    let processor = plain_processor();
    let once = processor.highlight("<p><code>x</code></p>");
    let twice = processor.highlight(&once);
    assert_eq!(once, twice);
  }

  #[test]
  fn test_code_language() {
    let document =
      dom::parse_fragment("<pre><code class=\"foo language-rust\">x</code></pre>");
    let code = document.select_first("code").expect("code element");
    assert_eq!(code_language(code.as_node()).as_deref(), Some("rust"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_block_highlighting_marks_pre_and_keeps_text() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let result = processor
      .render("```rust\nfn main() { let x = 1 < 2; }\n```\n\nand `inline`")
      .expect("ok");

    assert!(result.html.contains("<pre class=\"highlight\">"));
    assert!(result.html.contains("style=\"color:"));
    assert!(result.html.contains("&lt;"));
    // The inline pass did not touch the highlighted block
    assert_eq!(result.html.matches(INLINE_CODE_CLASS).count(), 1);
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_highlight_twice_does_not_rehighlight() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let html = processor
      .normalize("```rust\nlet a = 1;\n```")
      .expect("ok")
      .html;
    let once = processor.highlight(&html);
    let twice = processor.highlight(&once);
    assert_eq!(once, twice);
  }

  #[test]
  fn test_render_tags_cjk_when_enabled() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      tag_cjk: true,
      ..Default::default()
    });
    let result = processor.render("# 你好\n\nHello 世界").expect("ok");
    assert!(
      result
        .html
        .contains("<h1><span class=\"cjk\" lang=\"zh\">你好</span></h1>")
    );
    assert!(result.html.contains("Hello <span class=\"cjk\" lang=\"zh\">世界</span>"));
  }
}

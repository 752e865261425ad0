use std::collections::HashMap;

pub const DOCUMENT_TEMPLATE_NAME: &str = "document.html";
pub const STYLE_TEMPLATE_NAME: &str = "style.css";

pub const DOCUMENT_TEMPLATE: &str = include_str!("../templates/document.html");
pub const STYLE_TEMPLATE: &str = include_str!("../templates/style.css");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert(DOCUMENT_TEMPLATE_NAME, DOCUMENT_TEMPLATE);
  templates.insert(STYLE_TEMPLATE_NAME, STYLE_TEMPLATE);
  templates
}

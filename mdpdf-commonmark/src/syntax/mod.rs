//! Code block highlighting.
//!
//! [`SyntaxHighlighter`] is the backend seam; the only backend is syntect
//! with the two-face syntax and theme collections, behind the `syntect`
//! feature.

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Build the manager for whichever backend was compiled in.
///
/// `theme` becomes the manager's default theme; unknown names fall back to
/// the backend default at highlight time.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackend`] if the crate was built without
/// the `syntect` feature.
pub fn create_default_manager(
  theme: Option<&str>,
) -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager(theme)
  }

  #[cfg(not(feature = "syntect"))]
  {
    let _ = theme;
    Err(SyntaxError::NoBackend)
  }
}

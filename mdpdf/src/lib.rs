//! Expose mdpdf's command line layer for tests and the `xtask` helper. The
//! conversion itself lives in `mdpdf-render`.
pub mod cli;
pub mod commands;

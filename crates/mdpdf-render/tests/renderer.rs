#![cfg(unix)]
#![allow(clippy::unwrap_used, reason = "Fine in tests")]
use std::{
  fs,
  os::unix::fs::PermissionsExt,
  path::{Path, PathBuf},
  time::{Duration, Instant},
};

use mdpdf_render::{
  PdfRenderOptions,
  PdfRenderer,
  RenderError,
  WkhtmltopdfRenderer,
};
use tempfile::TempDir;

/// Write an executable shell script standing in for the engine.
fn fake_engine(dir: &Path, body: &str) -> PathBuf {
  let path = dir.join("fake-wkhtmltopdf");
  fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

fn render_with(script: &str, timeout: Duration) -> Result<Vec<u8>, RenderError> {
  let dir = TempDir::new().unwrap();
  let engine = fake_engine(dir.path(), script);
  WkhtmltopdfRenderer::new(engine, timeout)
    .render("<html><body>hi</body></html>", &PdfRenderOptions::default())
}

#[test]
fn test_pdf_on_stdout_is_returned() {
  let bytes = render_with(
    "cat > /dev/null\nprintf '%%PDF-1.4 fake'",
    Duration::from_secs(10),
  )
  .unwrap();
  assert_eq!(bytes, b"%PDF-1.4 fake");
}

#[test]
fn test_document_arrives_on_stdin() {
  let dir = TempDir::new().unwrap();
  let captured = dir.path().join("stdin.html");
  let engine = fake_engine(
    dir.path(),
    &format!("cat > '{}'\nprintf '%%PDF-1.4'", captured.display()),
  );

  WkhtmltopdfRenderer::new(engine, Duration::from_secs(10))
    .render("<p>payload</p>", &PdfRenderOptions::default())
    .unwrap();
  assert_eq!(fs::read_to_string(captured).unwrap(), "<p>payload</p>");
}

#[test]
fn test_arguments_are_passed() {
  let dir = TempDir::new().unwrap();
  let captured = dir.path().join("args.txt");
  let engine = fake_engine(
    dir.path(),
    &format!(
      "cat > /dev/null\necho \"$@\" > '{}'\nprintf '%%PDF-1.4'",
      captured.display()
    ),
  );

  let options =
    PdfRenderOptions::default().with_title(Some("Quarterly".to_string()));
  WkhtmltopdfRenderer::new(engine, Duration::from_secs(10))
    .render("<p>x</p>", &options)
    .unwrap();

  let args = fs::read_to_string(captured).unwrap();
  assert!(args.contains("--dpi 300"));
  assert!(args.contains("--page-size A4"));
  assert!(args.contains("--title Quarterly"));
  assert!(args.trim_end().ends_with("- -"));
}

#[test]
fn test_empty_output_is_rejected() {
  let err =
    render_with("cat > /dev/null", Duration::from_secs(10)).unwrap_err();
  assert!(matches!(err, RenderError::EngineRejected(_)));
  assert_eq!(
    err.to_string(),
    "Failed to generate PDF. The PDF output is empty."
  );
}

#[test]
fn test_non_pdf_output_is_rejected() {
  let err = render_with("cat > /dev/null\necho '<html>'", Duration::from_secs(10))
    .unwrap_err();
  assert!(matches!(err, RenderError::EngineRejected(_)));
}

#[test]
fn test_failure_without_output_is_rejected_with_stderr() {
  let err = render_with(
    "cat > /dev/null\necho 'bad page size' >&2\nexit 1",
    Duration::from_secs(10),
  )
  .unwrap_err();
  assert!(matches!(err, RenderError::EngineRejected(_)));
  assert!(err.to_string().contains("bad page size"));
}

#[test]
fn test_nonzero_exit_with_pdf_is_accepted() {
  let bytes = render_with(
    "cat > /dev/null\nprintf '%%PDF-1.4'\nexit 1",
    Duration::from_secs(10),
  )
  .unwrap();
  assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_timeout_kills_engine() {
  let started = Instant::now();
  let err =
    render_with("exec sleep 30", Duration::from_millis(300)).unwrap_err();

  assert!(matches!(err, RenderError::EngineUnavailable { .. }));
  assert!(err.to_string().contains("did not finish"));
  assert!(err.hint().is_some());
  assert!(started.elapsed() < Duration::from_secs(20));
}

#[test]
fn test_timeout_holds_when_a_subprocess_keeps_the_pipes() {
  // Without `exec` the shell forks `sleep`, which inherits stdout and stderr
  // and keeps them open after the shell itself is killed
  let started = Instant::now();
  let err = render_with("sleep 8", Duration::from_millis(300)).unwrap_err();

  assert!(matches!(err, RenderError::EngineUnavailable { .. }));
  assert!(err.to_string().contains("did not finish"));
  assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn test_timeout_covers_pipes_left_open_after_exit() {
  let started = Instant::now();
  let err = render_with(
    "cat > /dev/null\nprintf '%%PDF-1.4'\nsleep 8 &",
    Duration::from_millis(500),
  )
  .unwrap_err();

  assert!(matches!(err, RenderError::EngineUnavailable { .. }));
  assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn test_non_executable_engine_is_unavailable() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("not-executable");
  fs::write(&path, "#!/bin/sh\n").unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

  let err = WkhtmltopdfRenderer::new(path, Duration::from_secs(5))
    .render("<p>x</p>", &PdfRenderOptions::default())
    .unwrap_err();
  assert!(matches!(err, RenderError::EngineUnavailable { .. }));
}

#[test]
#[ignore = "needs wkhtmltopdf installed"]
fn test_real_wkhtmltopdf() {
  let bytes = WkhtmltopdfRenderer::default()
    .render(
      "<!DOCTYPE html><html><body><h1>Hello</h1></body></html>",
      &PdfRenderOptions::default(),
    )
    .unwrap();
  assert!(bytes.starts_with(b"%PDF"));
}

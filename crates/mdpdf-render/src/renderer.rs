//! PDF engines.
//!
//! [`PdfRenderer`] is the seam between the pipeline and whatever turns HTML
//! into PDF. [`WkhtmltopdfRenderer`] drives the `wkhtmltopdf` binary over
//! stdin/stdout.
use std::{
  io::{self, Read, Write},
  path::{Path, PathBuf},
  process::{Child, Command, ExitStatus, Stdio},
  sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
  thread,
  time::{Duration, Instant},
};

use log::{debug, warn};
use mdpdf_config::config::{DEFAULT_RENDERER_BINARY, DEFAULT_TIMEOUT_SECS};

use crate::{error::RenderError, options::PdfRenderOptions};

/// Every PDF starts with this.
pub const PDF_MAGIC: &[u8] = b"%PDF";

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Something that turns a complete HTML document into PDF bytes.
pub trait PdfRenderer: Send + Sync {
  /// Engine name for log messages.
  fn name(&self) -> &str;

  /// Render `document`.
  ///
  /// On success the bytes are non-empty and start with `%PDF`.
  ///
  /// # Errors
  ///
  /// Returns a [`RenderError`] describing why no PDF was produced.
  fn render(
    &self,
    document: &str,
    options: &PdfRenderOptions,
  ) -> Result<Vec<u8>, RenderError>;
}

/// Renderer backed by the `wkhtmltopdf` command line tool.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
  binary:  PathBuf,
  timeout: Duration,
}

impl Default for WkhtmltopdfRenderer {
  fn default() -> Self {
    Self::new(
      DEFAULT_RENDERER_BINARY,
      Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    )
  }
}

impl WkhtmltopdfRenderer {
  #[must_use]
  pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
    Self {
      binary: binary.into(),
      timeout,
    }
  }

  #[must_use]
  pub fn binary(&self) -> &Path {
    &self.binary
  }

  #[must_use]
  pub const fn timeout(&self) -> Duration {
    self.timeout
  }

  fn spawn(&self, args: &[String]) -> Result<Child, RenderError> {
    debug!("Running {} {}", self.binary.display(), args.join(" "));
    Command::new(&self.binary)
      .args(args)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|e| {
        match e.kind() {
          io::ErrorKind::NotFound => {
            RenderError::unavailable(format!(
              "{} was not found",
              self.binary.display()
            ))
          },
          io::ErrorKind::PermissionDenied => {
            RenderError::unavailable(format!(
              "{} is not executable",
              self.binary.display()
            ))
          },
          _ => {
            RenderError::Unexpected(format!(
              "failed to start {}: {e}",
              self.binary.display()
            ))
          },
        }
      })
  }

  /// Wait for the child until `deadline`, killing it once it has passed.
  /// Returns `None` on timeout.
  fn wait_until(
    &self,
    child: &mut Child,
    deadline: Instant,
  ) -> Result<Option<ExitStatus>, RenderError> {
    loop {
      match child.try_wait() {
        Ok(Some(status)) => return Ok(Some(status)),
        Ok(None) if Instant::now() >= deadline => {
          self.stop(child);
          return Ok(None);
        },
        Ok(None) => thread::sleep(POLL_INTERVAL),
        Err(e) => {
          self.stop(child);
          return Err(RenderError::Unexpected(format!(
            "failed to wait for {}: {e}",
            self.binary.display()
          )));
        },
      }
    }
  }

  fn stop(&self, child: &mut Child) {
    if let Err(e) = child.kill() {
      warn!("Failed to kill {}: {e}", self.binary.display());
    }
    // Reap the process so it does not linger as a zombie
    let _ = child.wait();
  }

  fn timed_out(&self) -> RenderError {
    RenderError::unavailable(format!(
      "{} did not finish within {}s and was stopped",
      self.binary.display(),
      self.timeout.as_secs_f32()
    ))
  }
}

impl PdfRenderer for WkhtmltopdfRenderer {
  fn name(&self) -> &str {
    "wkhtmltopdf"
  }

  fn render(
    &self,
    document: &str,
    options: &PdfRenderOptions,
  ) -> Result<Vec<u8>, RenderError> {
    let deadline = Instant::now() + self.timeout;
    let mut child = self.spawn(&options.to_args())?;

    // Pipes are serviced on their own threads so a full stdout buffer can
    // never block the write to stdin. Results come back over a channel so
    // a process that inherited the pipes cannot hold `render` past the
    // deadline.
    let (sender, receiver) = mpsc::channel();
    let mut pending = 0;
    if let Some(mut stdin) = child.stdin.take() {
      let input = document.as_bytes().to_vec();
      let sender = sender.clone();
      thread::spawn(move || {
        let _ = sender.send(Pipe::Stdin(stdin.write_all(&input)));
      });
      pending += 1;
    }
    if let Some(stdout) = child.stdout.take() {
      spawn_reader(stdout, sender.clone(), Pipe::Stdout);
      pending += 1;
    }
    if let Some(stderr) = child.stderr.take() {
      spawn_reader(stderr, sender.clone(), Pipe::Stderr);
      pending += 1;
    }
    drop(sender);

    let Some(status) = self.wait_until(&mut child, deadline)? else {
      return Err(self.timed_out());
    };
    let Some(pipes) = PipeOutput::collect(&receiver, pending, deadline) else {
      warn!(
        "{} exited but its output pipes stayed open past the timeout",
        self.binary.display()
      );
      return Err(self.timed_out());
    };

    let output = pipes
      .stdout
      .transpose()
      .map_err(|e| RenderError::Unexpected(format!("failed to read PDF: {e}")))?
      .unwrap_or_default();
    let errors = pipes.stderr.and_then(Result::ok).unwrap_or_default();
    let errors = String::from_utf8_lossy(&errors);

    if let Some(Err(e)) = pipes.stdin {
      // The engine may close stdin early when it gives up
      debug!("Writing the document to {} failed: {e}", self.name());
    }

    check_output(output, status, errors.trim())
  }
}

/// Result of servicing one of the child's pipes.
enum Pipe {
  Stdin(io::Result<()>),
  Stdout(io::Result<Vec<u8>>),
  Stderr(io::Result<Vec<u8>>),
}

#[derive(Default)]
struct PipeOutput {
  stdin:  Option<io::Result<()>>,
  stdout: Option<io::Result<Vec<u8>>>,
  stderr: Option<io::Result<Vec<u8>>>,
}

impl PipeOutput {
  /// Gather `pending` pipe results, giving up at `deadline`.
  fn collect(
    receiver: &Receiver<Pipe>,
    pending: usize,
    deadline: Instant,
  ) -> Option<Self> {
    let mut output = Self::default();
    for _ in 0..pending {
      let remaining = deadline.saturating_duration_since(Instant::now());
      match receiver.recv_timeout(remaining) {
        Ok(Pipe::Stdin(result)) => output.stdin = Some(result),
        Ok(Pipe::Stdout(result)) => output.stdout = Some(result),
        Ok(Pipe::Stderr(result)) => output.stderr = Some(result),
        Err(RecvTimeoutError::Timeout) => return None,
        // Every pipe thread has finished or died
        Err(RecvTimeoutError::Disconnected) => break,
      }
    }
    Some(output)
  }
}

fn spawn_reader<R>(
  mut source: R,
  sender: Sender<Pipe>,
  wrap: fn(io::Result<Vec<u8>>) -> Pipe,
) where
  R: Read + Send + 'static,
{
  thread::spawn(move || {
    let mut buffer = Vec::new();
    let result = source.read_to_end(&mut buffer).map(|_| buffer);
    let _ = sender.send(wrap(result));
  });
}

/// Decide whether what the engine produced is a usable PDF.
fn check_output(
  output: Vec<u8>,
  status: ExitStatus,
  errors: &str,
) -> Result<Vec<u8>, RenderError> {
  if output.is_empty() {
    if status.success() {
      return Err(RenderError::EngineRejected(
        "The PDF output is empty.".to_string(),
      ));
    }
    let detail = if errors.is_empty() {
      String::new()
    } else {
      format!(": {errors}")
    };
    return Err(RenderError::EngineRejected(format!(
      "The PDF engine failed ({status}){detail}"
    )));
  }

  if !output.starts_with(PDF_MAGIC) {
    return Err(RenderError::EngineRejected(
      "The engine output is not a PDF document.".to_string(),
    ));
  }

  if !status.success() {
    // wkhtmltopdf exits non-zero on recoverable problems such as a missing
    // image while still writing a complete PDF
    warn!("PDF engine exited with {status} but produced a PDF");
    if !errors.is_empty() {
      warn!("{errors}");
    }
  }
  Ok(output)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_missing_binary_is_unavailable() {
    let renderer = WkhtmltopdfRenderer::new(
      "/nonexistent/mdpdf-test/wkhtmltopdf",
      Duration::from_secs(5),
    );
    let err = renderer
      .render("<p>x</p>", &PdfRenderOptions::default())
      .unwrap_err();

    assert!(matches!(err, RenderError::EngineUnavailable { .. }));
    assert!(err.to_string().contains("was not found"));
    assert!(err.hint().is_some_and(|hint| hint.contains("wkhtmltopdf")));
  }

  #[test]
  fn test_defaults() {
    let renderer = WkhtmltopdfRenderer::default();
    assert_eq!(renderer.binary(), Path::new("wkhtmltopdf"));
    assert_eq!(renderer.timeout(), Duration::from_secs(60));
    assert_eq!(renderer.name(), "wkhtmltopdf");
  }
}

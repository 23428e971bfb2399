//! Running the compiler artifact against a single test file.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

/// How often a running case is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured streams of one artifact invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process exited normally. Informational only.
    pub code: Option<i32>,
}

/// Reasons an invocation produced no usable output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecFailure {
    #[error("{0}")]
    Stderr(String),

    #[error("timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),

    #[error("failed to start {artifact}: {reason}")]
    Spawn { artifact: String, reason: String },

    #[error("failed to collect output: {0}")]
    Io(String),
}

/// Executes the artifact for one test case.
#[cfg_attr(test, mockall::automock)]
pub trait CaseRunner {
    /// Run `artifact <case>` and capture both output streams.
    fn run(&self, artifact: &Path, case: &Path) -> Result<ProcessOutput, ExecFailure>;
}

/// [`CaseRunner`] backed by a real child process.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn wait(
        &self,
        child: &mut Child,
        deadline: Option<Instant>,
    ) -> Result<Option<i32>, ExecFailure> {
        let (Some(timeout), Some(deadline)) = (self.timeout, deadline) else {
            let status = child.wait().map_err(|e| ExecFailure::Io(e.to_string()))?;
            return Ok(status.code());
        };

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status.code()),
                Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
                Ok(None) => {
                    warn!(pid = child.id(), "case timed out, killing");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ExecFailure::TimedOut(timeout));
                }
                Err(e) => return Err(ExecFailure::Io(e.to_string())),
            }
        }
    }

    /// Wait for a drained stream, bounded by the same deadline as the child.
    ///
    /// A background process started by the artifact can hold the pipe open
    /// after the artifact exits; the reader thread is then abandoned.
    fn collect(
        &self,
        stream: Option<Receiver<io::Result<Vec<u8>>>>,
        deadline: Option<Instant>,
    ) -> Result<String, ExecFailure> {
        let Some(stream) = stream else {
            return Ok(String::new());
        };

        let received = match (self.timeout, deadline) {
            (Some(timeout), Some(deadline)) => stream
                .recv_timeout(deadline.saturating_duration_since(Instant::now()))
                .map_err(|e| match e {
                    RecvTimeoutError::Timeout => {
                        warn!("output still open after the case exited");
                        ExecFailure::TimedOut(timeout)
                    }
                    RecvTimeoutError::Disconnected => reader_lost(),
                })?,
            _ => stream.recv().map_err(|_| reader_lost())?,
        };

        let bytes = received.map_err(|e| ExecFailure::Io(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl CaseRunner for ProcessRunner {
    fn run(&self, artifact: &Path, case: &Path) -> Result<ProcessOutput, ExecFailure> {
        debug!(artifact = %artifact.display(), case = %case.display(), "spawning");

        let mut child = Command::new(artifact)
            .arg(case)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecFailure::Spawn {
                artifact: artifact.display().to_string(),
                reason: e.to_string(),
            })?;
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);

        // Drain both pipes concurrently so a chatty child cannot block on a
        // full pipe while we wait on it.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let code = self.wait(&mut child, deadline)?;

        Ok(ProcessOutput {
            stdout: self.collect(stdout, deadline)?,
            stderr: self.collect(stderr, deadline)?,
            code,
        })
    }
}

fn drain<R: Read + Send + 'static>(mut source: R) -> Receiver<io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = source.read_to_end(&mut buf).map(|_| buf);
        // The receiver is gone once the case has timed out.
        let _ = tx.send(result);
    });
    rx
}

fn reader_lost() -> ExecFailure {
    ExecFailure::Io("output reader panicked".to_string())
}

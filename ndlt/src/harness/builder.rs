//! Builds the compiler under test.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::{debug, info};

use super::artifact::Artifact;
use crate::config::BuildConfig;
use crate::error::{NdltError, Result};

/// Runs the configured build command once per suite.
#[derive(Debug, Clone)]
pub struct Builder {
    config: BuildConfig,
}

impl Builder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Where the build is expected to leave the executable.
    pub fn artifact_path(&self) -> PathBuf {
        self.config.artifact_path()
    }

    /// Human-readable form of the build command, for logs and errors.
    pub fn command_line(&self) -> String {
        std::iter::once(self.config.program.as_str())
            .chain(self.config.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the build and check that it produced `artifact`.
    ///
    /// The build's own output is captured and only surfaces in logs, or in
    /// the error when the build fails.
    pub fn build(&self, artifact: &Artifact) -> Result<()> {
        let start_time = Instant::now();
        info!(command = %self.command_line(), root = %self.config.root.display(), "building compiler");

        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .current_dir(&self.config.root)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                NdltError::Build(format!("cannot run `{}`: {}", self.command_line(), e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(stdout = %stdout.trim_end(), stderr = %stderr.trim_end(), "build output");

        if !output.status.success() {
            let detail = stderr.trim();
            return Err(NdltError::Build(if detail.is_empty() {
                format!("`{}` exited with {}", self.command_line(), output.status)
            } else {
                format!(
                    "`{}` exited with {}:\n{}",
                    self.command_line(),
                    output.status,
                    detail
                )
            }));
        }

        if !artifact.exists() {
            return Err(NdltError::Build(format!(
                "`{}` succeeded but did not produce {}",
                self.command_line(),
                artifact.path().display()
            )));
        }

        info!(
            elapsed = %format!("{:.2}s", start_time.elapsed().as_secs_f64()),
            "build finished"
        );
        Ok(())
    }
}

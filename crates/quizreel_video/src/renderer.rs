//! Render toolchain boundary.

use crate::CompositionPlan;
use quizreel_core::RenderConfig;
use quizreel_error::{QuizreelResult, RenderError, RenderErrorKind};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Contract for the encoding toolchain.
///
/// The toolchain's own errors are opaque; implementations classify them
/// into `RenderError` kinds so the assembler can tell a retryable encoder
/// crash from a missing binary.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Execute a composition plan and return the encoded payload.
    async fn render(&self, plan: &CompositionPlan) -> QuizreelResult<Vec<u8>>;
}

/// ffmpeg-backed renderer.
pub struct FfmpegRenderer {
    binary: PathBuf,
    timeout: Duration,
}

impl FfmpegRenderer {
    /// Locate ffmpeg on PATH and configure the encoder timeout.
    ///
    /// # Errors
    ///
    /// Returns `RenderError` when no ffmpeg binary can be found; this is
    /// fatal, not retryable.
    #[tracing::instrument(skip(config))]
    pub fn discover(config: &RenderConfig) -> QuizreelResult<Self> {
        let binary = which::which("ffmpeg").map_err(|e| {
            RenderError::new(RenderErrorKind::ToolchainMissing(e.to_string()))
        })?;

        tracing::debug!(binary = %binary.display(), "Located encoder");
        Ok(Self {
            binary,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }
}

#[async_trait::async_trait]
impl Renderer for FfmpegRenderer {
    #[tracing::instrument(skip(self, plan), fields(duration_secs = plan.output_duration_secs()))]
    async fn render(&self, plan: &CompositionPlan) -> QuizreelResult<Vec<u8>> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(plan.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!("Running encoder: {:?}", cmd);

        let child = cmd
            .spawn()
            .map_err(|e| RenderError::new(RenderErrorKind::Spawn(e.to_string())))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RenderError::new(RenderErrorKind::ExitStatus {
                    code: None,
                    stderr: format!("encoder timed out after {}s", self.timeout.as_secs()),
                })
            })?
            .map_err(|e| RenderError::new(RenderErrorKind::Spawn(e.to_string())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Keep the tail: ffmpeg puts the actual failure last
            let tail: String = stderr
                .lines()
                .rev()
                .take(8)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(RenderError::new(RenderErrorKind::ExitStatus {
                code: output.status.code(),
                stderr: tail,
            })
            .into());
        }

        tokio::fs::read(plan.output_path()).await.map_err(|_| {
            RenderError::new(RenderErrorKind::OutputMissing(
                plan.output_path().display().to_string(),
            ))
            .into()
        })
    }
}

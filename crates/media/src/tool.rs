//! Probing and clip extraction via the ffmpeg tool family.

use std::path::Path;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Media tool error.
#[derive(Debug, thiserror::Error)]
pub enum MediaToolError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} failed: {stderr}")]
    Failed { tool: &'static str, stderr: String },
    #[error("unreadable probe output: {0}")]
    BadProbeOutput(String),
}

/// Probing and extraction boundary.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Total duration of the media file in whole seconds (floored).
    async fn probe_duration_secs(&self, path: &Path) -> Result<u64, MediaToolError>;

    /// Extract `[start, start + len)` from `src` into `dest` using stream
    /// copy (no re-encode). The final clip of a file may come up short.
    async fn extract_clip(
        &self,
        src: &Path,
        start_secs: u64,
        len_secs: u64,
        dest: &Path,
    ) -> Result<(), MediaToolError>;
}

/// Shells out to `ffprobe`/`ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegMediaTool {
    ffprobe_bin: String,
    ffmpeg_bin: String,
}

impl Default for FfmpegMediaTool {
    fn default() -> Self {
        Self {
            ffprobe_bin: "ffprobe".to_string(),
            ffmpeg_bin: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegMediaTool {
    pub fn new(ffprobe_bin: impl Into<String>, ffmpeg_bin: impl Into<String>) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }
}

fn check_status(tool: &'static str, output: &Output) -> Result<(), MediaToolError> {
    if output.status.success() {
        return Ok(());
    }
    Err(MediaToolError::Failed {
        tool,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

#[async_trait]
impl MediaTool for FfmpegMediaTool {
    async fn probe_duration_secs(&self, path: &Path) -> Result<u64, MediaToolError> {
        let output = Command::new(&self.ffprobe_bin)
            .args(["-v", "error", "-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path)
            .output()
            .await
            .map_err(|source| MediaToolError::Spawn {
                tool: "ffprobe",
                source,
            })?;
        check_status("ffprobe", &output)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let seconds: f64 = stdout
            .trim()
            .parse()
            .map_err(|_| MediaToolError::BadProbeOutput(stdout.trim().to_string()))?;
        Ok(seconds.floor() as u64)
    }

    async fn extract_clip(
        &self,
        src: &Path,
        start_secs: u64,
        len_secs: u64,
        dest: &Path,
    ) -> Result<(), MediaToolError> {
        debug!(src = %src.display(), start_secs, len_secs, "extracting clip");

        // -ss before -i: seek on the demuxer, cheap with -c copy.
        let output = Command::new(&self.ffmpeg_bin)
            .args(["-y", "-v", "error"])
            .arg("-ss")
            .arg(start_secs.to_string())
            .arg("-t")
            .arg(len_secs.to_string())
            .arg("-i")
            .arg(src)
            .args(["-c", "copy"])
            .arg(dest)
            .output()
            .await
            .map_err(|source| MediaToolError::Spawn {
                tool: "ffmpeg",
                source,
            })?;
        check_status("ffmpeg", &output)
    }
}

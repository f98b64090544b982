//! Implements the `Extractor` trait with the `yt-dlp` command-line tool.
//! Both phases dump JSON (`-J`) and never download media.

use serenity::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{AudioSourceResult, ExtractedInfo, Extractor};
use crate::commands::music::utils::music_manager::MusicError;

/// The main struct implementing extraction via `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments for the fast lookup. Plain text is treated as a YouTube search.
    fn lookup_args(query: &str) -> Vec<&str> {
        vec![
            "-J",              // Output as a single JSON document
            "--flat-playlist", // Don't resolve every listing entry
            "--no-warnings",
            "--ignore-errors",
            "--default-search",
            "ytsearch",
            "--",
            query,
        ]
    }

    /// Arguments for the full resolution of one page URL.
    fn resolve_args(url: &str) -> Vec<&str> {
        vec![
            "-J",
            "--no-playlist",
            "--no-warnings",
            "--format",
            "bestaudio/best",
            "--",
            url,
        ]
    }

    /// Run `yt-dlp` and parse its JSON output. A failed run or empty output is
    /// reported as "nothing found" rather than an error.
    async fn run(&self, args: Vec<&str>) -> AudioSourceResult<Option<ExtractedInfo>> {
        debug!("Running {} {:?}", self.binary, args);

        let output = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MusicError::Extraction(format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            warn!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        Self::parse(&output.stdout)
    }

    fn parse(stdout: &[u8]) -> AudioSourceResult<Option<ExtractedInfo>> {
        let body = String::from_utf8_lossy(stdout);
        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(None);
        }

        serde_json::from_str(body)
            .map(Some)
            .map_err(|e| MusicError::Extraction(format!("Failed to parse video metadata: {}", e)))
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn lookup(&self, query: &str) -> AudioSourceResult<Option<ExtractedInfo>> {
        info!("Looking up: {}", query);
        self.run(Self::lookup_args(query)).await
    }

    async fn resolve_full(&self, url: &str) -> AudioSourceResult<Option<ExtractedInfo>> {
        info!("Resolving stream for: {}", url);
        self.run(Self::resolve_args(url)).await
    }
}

//! MP4/M4A writer.
//!
//! MP4 metadata is rewritten by re-muxing through an external tool (ffmpeg by
//! default) with stream copy, so no audio is re-encoded. The tool writes a
//! sibling temp file; the original is only replaced after the tool exits
//! successfully and the temp file exists.
//!
//! Install ffmpeg:
//! - Windows: `winget install Gyan.FFmpeg`
//! - macOS: `brew install ffmpeg`
//! - Linux: `apt install ffmpeg` or equivalent

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use super::{FormatWriter, discard_temp};
use crate::error::{Error, Result, ResultExt};
use crate::tags::ResolvedTags;
use crate::tags::artwork::Artwork;
use crate::tags::fields::managed_fields;

/// Re-muxes MP4 containers through `tool`.
#[derive(Debug, Clone)]
pub struct Mp4Writer {
    tool: String,
}

impl Mp4Writer {
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl FormatWriter for Mp4Writer {
    fn write(&self, path: &Path, tags: &ResolvedTags, artwork: Option<&Artwork>) -> Result<()> {
        let tmp = remux_temp_path(path);
        let result = self.remux(path, &tmp, tags, artwork);
        if result.is_err() {
            discard_temp(&tmp);
        }
        result
    }
}

impl Mp4Writer {
    fn remux(
        &self,
        path: &Path,
        tmp: &Path,
        tags: &ResolvedTags,
        artwork: Option<&Artwork>,
    ) -> Result<()> {
        let args = remux_args(path, artwork.map(|a| a.path.as_path()), tmp, tags);
        debug!(
            target: "tags::mp4",
            "Running: {} {}",
            self.tool,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = match Command::new(&self.tool).args(&args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(target: "tags::mp4", "{} not found on PATH", self.tool);
                return Err(Error::ToolUnavailable {
                    tool: self.tool.clone(),
                });
            }
            Err(e) => {
                return Err(Error::Io(e).context(format!("running {}", self.tool)));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ToolFailed {
                tool: self.tool.clone(),
                status: output.status.to_string(),
                output: last_lines(&stderr, 5),
            });
        }

        let new_size = std::fs::metadata(tmp)
            .map_err(|_| Error::metadata(path, format!("{} produced no output file", self.tool)))?
            .len();
        let old_size = std::fs::metadata(path)
            .with_context(format!("reading {}", path.display()))?
            .len();
        debug!(
            target: "tags::mp4",
            "Original {} bytes, re-muxed {} bytes",
            old_size,
            new_size
        );

        std::fs::rename(tmp, path).with_context(format!("replacing {}", path.display()))?;

        match crate::metadata::inspect(path) {
            Ok(read_back) => info!(
                target: "tags::mp4",
                "Verified {:?}: title={:?} artist={:?} album={:?}",
                path,
                read_back.title,
                read_back.artist,
                read_back.album
            ),
            Err(e) => warn!(target: "tags::mp4", "Could not read back {:?}: {}", path, e),
        }

        Ok(())
    }
}

/// `<stem>.remux.<ext>` next to the original, so the tool infers the muxer.
fn remux_temp_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let ext = path.extension().unwrap_or(OsStr::new("m4a"));

    let mut name = OsString::from(stem);
    name.push(".remux.");
    name.push(ext);
    path.with_file_name(name)
}

/// Argument list for one re-mux.
///
/// All input metadata is dropped (`-map_metadata -1`) and only the non-empty
/// managed fields are added back.
pub(crate) fn remux_args(
    input: &Path,
    artwork: Option<&Path>,
    output: &Path,
    tags: &ResolvedTags,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
    if let Some(art) = artwork {
        args.push("-i".into());
        args.push(art.into());
    }

    args.extend(["-map_metadata", "-1", "-map", "0:a"].map(OsString::from));

    if artwork.is_some() {
        args.extend(
            [
                "-map",
                "1:0",
                "-c:a",
                "copy",
                "-c:v",
                "copy",
                "-disposition:v:0",
                "attached_pic",
            ]
            .map(OsString::from),
        );
    } else {
        args.extend(["-c", "copy"].map(OsString::from));
    }

    args.extend(["-movflags", "+faststart"].map(OsString::from));

    for (field, value) in managed_fields(tags) {
        args.push("-metadata".into());
        args.push(format!("{}={}", field.mp4_key(), value).into());
    }

    args.push("-y".into());
    args.push(output.into());
    args
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim().lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

/// First line of `<tool> -version`, or `None` when the tool cannot be run.
pub fn remux_tool_version(tool: &str) -> Option<String> {
    Command::new(tool)
        .arg("-version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| {
            String::from_utf8_lossy(&o.stdout)
                .lines()
                .next()
                .map(|l| l.trim().to_string())
        })
}

//! Assembly of rendered frames into one animation artifact.
//!
//! Encoding is delegated to an external `ffmpeg` process: the interface is a
//! list of input frame paths plus a frame rate in, an output path and an
//! exit status out. Nothing about the codec is reimplemented here.

use crate::output::error::OutputError;
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const ENCODER_BIN: &str = "ffmpeg";

/// Encodes `frames` (in the given order) into an animation at `output`.
///
/// Uses the encoder's concat demuxer with a fixed per-frame duration of
/// `1 / fps` seconds. The frame list is written to a temporary file that
/// lives until the encoder exits.
pub async fn encode_animation(
    frames: &[PathBuf],
    fps: f64,
    output: &Path,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Err(OutputError::NoFrames);
    }

    let list_file = write_frame_list(frames, fps)?;
    info!(
        "Assembling {} frame(s) into {:?} at {} fps",
        frames.len(),
        output,
        fps
    );

    let result = Command::new(ENCODER_BIN)
        .arg("-y")
        .arg("-f")
        .arg("concat")
        .arg("-safe")
        .arg("0")
        .arg("-i")
        .arg(list_file.path())
        .arg("-loop")
        .arg("0")
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(OutputError::EncoderSpawn)?;

    if !result.status.success() {
        return Err(OutputError::EncoderExit {
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Writes a concat-demuxer frame list: every frame with its display
/// duration, plus the final frame repeated so the last duration is honored.
fn write_frame_list(
    frames: &[PathBuf],
    fps: f64,
) -> Result<tempfile::NamedTempFile, OutputError> {
    let mut list_file = tempfile::NamedTempFile::new()
        .map_err(|e| OutputError::FrameListWrite(PathBuf::from("frame list"), e))?;
    let contents = frame_list_contents(frames, fps);
    list_file
        .write_all(contents.as_bytes())
        .and_then(|_| list_file.flush())
        .map_err(|e| OutputError::FrameListWrite(list_file.path().to_path_buf(), e))?;
    Ok(list_file)
}

fn frame_list_contents(frames: &[PathBuf], fps: f64) -> String {
    let duration = 1.0 / fps;
    let mut contents = String::new();
    for frame in frames {
        contents.push_str(&format!("file '{}'\n", frame.display()));
        contents.push_str(&format!("duration {duration}\n"));
    }
    if let Some(last) = frames.last() {
        contents.push_str(&format!("file '{}'\n", last.display()));
    }
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_list_carries_durations_and_repeats_the_last_frame() {
        let frames = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        let contents = frame_list_contents(&frames, 2.0);
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file 'a.png'",
                "duration 0.5",
                "file 'b.png'",
                "duration 0.5",
                "file 'b.png'",
            ]
        );
    }

    #[tokio::test]
    async fn empty_frame_set_is_an_error() {
        let result = encode_animation(&[], 2.0, Path::new("out.webp")).await;
        assert!(matches!(result, Err(OutputError::NoFrames)));
    }
}

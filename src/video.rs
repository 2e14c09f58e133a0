// Frame reading — ffprobe + ffmpeg rawvideo pipe
//
// A clip id resolves to `<videos_path>/<clip_id>.mp4`. The file's first
// video stream is probed for its geometry, then every frame is decoded to
// packed RGB24 through an ffmpeg child process writing raw frames to
// stdout. Frames are read back to back and stacked into a single
// `(T, H, W, 3)` array of f32 pixel values in [0, 255].
//
// Decoding is synchronous and runs to completion; there is no seeking,
// frame skipping, or frame-rate resampling.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use log::debug;
use ndarray::Array4;
use serde::Deserialize;

use crate::error::{Error, Result};

/// A source of decoded clips, keyed by clip id.
///
/// Implementations must be `Send + Sync` so a loader can fetch samples from
/// multiple threads. The shipped implementation is [`FfmpegFrameReader`];
/// tests substitute synthetic sources.
pub trait FrameSource: Send + Sync {
    /// Decode the clip with the given id into a `(T, H, W, 3)` array of
    /// RGB pixel values in [0, 255].
    fn read(&self, clip_id: &str) -> Result<Array4<f32>>;
}

/// Properties of the first video stream of a media file.
#[derive(Debug, Clone, Copy)]
pub struct StreamInfo {
    pub width: usize,
    pub height: usize,
    /// Average frame rate as reported by the container. Recorded for
    /// callers; decoding always runs at the native rate.
    pub avg_fps: f64,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<usize>,
    height: Option<usize>,
    avg_frame_rate: Option<String>,
}

/// Parse an ffprobe rational like `"30000/1001"` into frames per second.
fn parse_rate(rate: &str) -> f64 {
    match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().unwrap_or(0.0);
            let den: f64 = den.parse().unwrap_or(0.0);
            if den > 0.0 {
                num / den
            } else {
                0.0
            }
        }
        None => rate.parse().unwrap_or(0.0),
    }
}

/// Decodes whole video files through ffprobe/ffmpeg child processes.
#[derive(Debug, Clone)]
pub struct FfmpegFrameReader {
    videos_path: PathBuf,
    extension: String,
}

impl FfmpegFrameReader {
    pub fn new(videos_path: impl AsRef<Path>) -> Self {
        Self {
            videos_path: videos_path.as_ref().to_path_buf(),
            extension: "mp4".to_string(),
        }
    }

    /// Override the media file extension (default `mp4`).
    pub fn extension(mut self, ext: &str) -> Self {
        self.extension = ext.to_string();
        self
    }

    fn clip_path(&self, clip_id: &str) -> PathBuf {
        self.videos_path.join(format!("{}.{}", clip_id, self.extension))
    }

    /// Probe the first video stream for width, height, and average rate.
    pub fn probe(&self, path: &Path) -> Result<StreamInfo> {
        let output = Command::new("ffprobe")
            .arg("-v")
            .arg("error")
            .arg("-select_streams")
            .arg("v:0")
            .arg("-show_entries")
            .arg("stream=width,height,avg_frame_rate")
            .arg("-of")
            .arg("json")
            .arg(path)
            .output()
            .map_err(|e| Error::Probe {
                path: path.to_path_buf(),
                detail: format!("spawn ffprobe: {e}"),
            })?;

        if !output.status.success() {
            return Err(Error::Probe {
                path: path.to_path_buf(),
                detail: format!(
                    "ffprobe status={} stderr={}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let parsed: FfprobeOutput =
            serde_json::from_slice(&output.stdout).map_err(|e| Error::Probe {
                path: path.to_path_buf(),
                detail: format!("unparseable ffprobe output: {e}"),
            })?;

        let stream = parsed.streams.first().ok_or_else(|| Error::Probe {
            path: path.to_path_buf(),
            detail: "no video stream".to_string(),
        })?;

        match (stream.width, stream.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => Ok(StreamInfo {
                width,
                height,
                avg_fps: stream.avg_frame_rate.as_deref().map(parse_rate).unwrap_or(0.0),
            }),
            _ => Err(Error::Probe {
                path: path.to_path_buf(),
                detail: "video stream reports no geometry".to_string(),
            }),
        }
    }

    fn decode(&self, path: &Path, info: StreamInfo) -> Result<Array4<f32>> {
        let frame_bytes = info.width * info.height * 3;

        let mut child = Command::new("ffmpeg")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(path)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("pipe:1")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Decode {
                path: path.to_path_buf(),
                detail: format!("spawn ffmpeg: {e}"),
            })?;

        let stderr_handle = child.stderr.take().map(spawn_stderr_collector);
        let mut stdout = child.stdout.take().ok_or_else(|| Error::Decode {
            path: path.to_path_buf(),
            detail: "ffmpeg stdout missing".to_string(),
        })?;

        let mut pixels: Vec<f32> = Vec::new();
        let mut frames = 0usize;
        let mut frame_buf = vec![0u8; frame_bytes];
        loop {
            let n = read_exact_or_eof(&mut stdout, &mut frame_buf).map_err(|e| Error::Decode {
                path: path.to_path_buf(),
                detail: format!("read frame {frames}: {e}"),
            })?;
            if n == 0 {
                break;
            }
            if n < frame_bytes {
                // Trailing partial frame; ignore the remainder.
                break;
            }
            pixels.extend(frame_buf.iter().map(|&b| b as f32));
            frames += 1;
        }

        let status = child.wait().map_err(|e| Error::Decode {
            path: path.to_path_buf(),
            detail: format!("wait ffmpeg: {e}"),
        })?;
        let stderr_tail = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if !status.success() {
            return Err(Error::Decode {
                path: path.to_path_buf(),
                detail: format!("ffmpeg status={} stderr_tail={}", status, stderr_tail.trim()),
            });
        }
        if frames == 0 {
            return Err(Error::Decode {
                path: path.to_path_buf(),
                detail: "decoded zero frames".to_string(),
            });
        }

        debug!(
            "decoded {} frames of {}x{} from {} (avg {:.2} fps)",
            frames,
            info.width,
            info.height,
            path.display(),
            info.avg_fps
        );

        Array4::from_shape_vec((frames, info.height, info.width, 3), pixels).map_err(|e| {
            Error::Decode {
                path: path.to_path_buf(),
                detail: format!("stack frames: {e}"),
            }
        })
    }
}

impl FrameSource for FfmpegFrameReader {
    fn read(&self, clip_id: &str) -> Result<Array4<f32>> {
        let path = self.clip_path(clip_id);
        let info = self.probe(&path)?;
        self.decode(&path, info)
    }
}

/// Read exactly `buf.len()` bytes, or return the number read before EOF.
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Drain a child's stderr on a background thread so the pipe never blocks.
fn spawn_stderr_collector(mut stderr: impl Read + Send + 'static) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut out = String::new();
        let _ = stderr.read_to_string(&mut out);
        // Keep only the last few lines; ffmpeg can be chatty on bad input.
        let tail: Vec<&str> = out.lines().rev().take(4).collect();
        tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
    })
}

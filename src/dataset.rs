// Clip dataset — index-based random access over an annotation manifest

use std::path::Path;

use log::warn;
use ndarray::Array4;

use crate::error::{Error, Result};
use crate::manifest::{self, ClipRecord};
use crate::transform::{Compose, Transform};
use crate::video::{FfmpegFrameReader, FrameSource};

/// A single decoded sample: the (optionally transformed) clip array and its
/// class label.
#[derive(Debug, Clone)]
pub struct ClipSample {
    /// Decoded clip. `(T, H, W, C)` as decoded, or whatever layout the
    /// configured transform pipeline produces.
    pub clip: Array4<f32>,
    /// Class label from the manifest.
    pub label: i64,
}

/// An indexed collection of video clips.
///
/// Implementations must be `Send + Sync` so a loader can fetch samples from
/// multiple threads.
pub trait VideoDataset: Send + Sync {
    /// Total number of clips in the dataset.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode and return the sample at position `index`.
    fn get(&self, index: usize) -> Result<ClipSample>;

    /// Optional human-readable name.
    fn name(&self) -> &str {
        "dataset"
    }
}

/// A manifest-backed video clip dataset.
///
/// The manifest is loaded fully at construction and the record list is
/// read-only afterwards. Every access decodes the referenced media file from
/// scratch — there is no caching across calls, so repeated access to the
/// same index re-reads from disk and returns a deterministic result for
/// unchanging media.
pub struct ClipDataset {
    source: Box<dyn FrameSource>,
    records: Vec<ClipRecord>,
    transform: Option<Compose>,
    /// Accepted and recorded; frame-rate resampling is not applied to
    /// decoded clips (decode runs at the file's native rate).
    target_fps: Option<f64>,
    dataset_name: String,
}

impl std::fmt::Debug for ClipDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipDataset")
            .field("records", &self.records.len())
            .field("has_transform", &self.transform.is_some())
            .field("target_fps", &self.target_fps)
            .field("dataset_name", &self.dataset_name)
            .finish()
    }
}

impl ClipDataset {
    /// Construct from a videos directory and an annotation manifest path.
    ///
    /// Fails if the manifest is unreadable or malformed; media files are
    /// only touched later, on access.
    pub fn new(videos_path: impl AsRef<Path>, annotations_path: impl AsRef<Path>) -> Result<Self> {
        let records = manifest::load_manifest(annotations_path)?;
        Ok(Self::from_parts(
            Box::new(FfmpegFrameReader::new(videos_path)),
            records,
        ))
    }

    /// Construct from an explicit frame source and record list.
    pub fn from_parts(source: Box<dyn FrameSource>, records: Vec<ClipRecord>) -> Self {
        Self {
            source,
            records,
            transform: None,
            target_fps: None,
            dataset_name: "clips".to_string(),
        }
    }

    /// Attach a transform pipeline applied to every decoded clip.
    pub fn with_transform(mut self, transform: Compose) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Record a requested frame rate. Not applied during decoding.
    pub fn with_target_fps(mut self, fps: f64) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Keep only the first `limit` records.
    pub fn with_limit(mut self, limit: usize) -> Self {
        if limit < self.records.len() {
            warn!(
                "truncating dataset from {} to {} records",
                self.records.len(),
                limit
            );
            self.records.truncate(limit);
        }
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.dataset_name = name.to_string();
        self
    }

    /// The recorded target frame rate, if any.
    pub fn target_fps(&self) -> Option<f64> {
        self.target_fps
    }

    /// The (possibly truncated) manifest records.
    pub fn records(&self) -> &[ClipRecord] {
        &self.records
    }
}

impl VideoDataset for ClipDataset {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, index: usize) -> Result<ClipSample> {
        let record = self.records.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.records.len(),
        })?;
        let mut clip = self.source.read(&record.clip_id)?;
        if let Some(transform) = &self.transform {
            clip = transform.apply(clip);
        }
        Ok(ClipSample {
            clip,
            label: record.label,
        })
    }

    fn name(&self) -> &str {
        &self.dataset_name
    }
}

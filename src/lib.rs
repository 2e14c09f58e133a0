//! # diving48-data
//!
//! Loading and batching for the Diving48 action-recognition video dataset.
//!
//! This crate provides:
//! - [`ClipDataset`] — manifest-backed, index-addressable clip access
//! - [`FrameSource`] / [`FfmpegFrameReader`] — whole-file RGB24 frame
//!   decoding through ffprobe/ffmpeg
//! - [`Transform`] / [`Compose`] — the per-clip tensor transform pipeline
//!   (permute, normalize, short-side scale, center crop, temporal subsample)
//! - [`pad_clip`] / [`collate_clips`] / [`stack_clips`] — zero-padding
//!   collation of variable-length clips into rectangular batches
//! - [`DataLoader`] — batching, shuffling, parallel clip fetching
//! - [`DatasetRegistry`] — explicit name → builder mapping so a training
//!   configuration can instantiate datasets by name

pub mod collate;
pub mod config;
pub mod dataset;
pub mod diving48;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod transform;
pub mod video;

pub use collate::{collate_clips, pad_clip, stack_clips};
pub use config::{Config, DataConfig};
pub use dataset::{ClipDataset, ClipSample, VideoDataset};
pub use error::{Error, Result};
pub use loader::{ClipBatch, DataLoader, DataLoaderConfig};
pub use manifest::{load_manifest, ClipRecord};
pub use registry::{DatasetBuilder, DatasetRegistry};
pub use transform::{
    CenterCrop, Compose, Div255, PermuteToCthw, ShortSideScale, Transform,
    UniformTemporalSubsample,
};
pub use video::{FfmpegFrameReader, FrameSource, StreamInfo};

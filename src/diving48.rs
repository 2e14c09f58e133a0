// Diving48 — the configured dataset builder
//
// Builds a plain ClipDataset wired with the standard SlowFast-style input
// pipeline: channel-first layout, [0, 1] pixel range, 256 short side,
// 224x224 center crop, 4 uniformly sampled frames. The pipeline runs over
// the full decoded clip on every access.

use crate::config::Config;
use crate::dataset::ClipDataset;
use crate::error::Result;
use crate::manifest;
use crate::transform::{
    CenterCrop, Compose, Div255, PermuteToCthw, ShortSideScale, UniformTemporalSubsample,
};
use crate::video::{FfmpegFrameReader, FrameSource};

/// Target size of the shorter spatial side after rescaling.
pub const SHORT_SIDE_SIZE: usize = 256;
/// Spatial center-crop edge length.
pub const CROP_SIZE: usize = 224;
/// Number of frames each clip is subsampled to.
pub const NUM_FRAMES: usize = 4;

/// The fixed five-stage Diving48 transform pipeline.
///
/// Output shape for any decodable clip: `(3, NUM_FRAMES, CROP_SIZE,
/// CROP_SIZE)`.
pub fn transform_pipeline() -> Compose {
    Compose::new(vec![
        Box::new(PermuteToCthw),
        Box::new(Div255),
        Box::new(ShortSideScale::new(SHORT_SIDE_SIZE)),
        Box::new(CenterCrop::new(CROP_SIZE, CROP_SIZE)),
        Box::new(UniformTemporalSubsample::new(NUM_FRAMES)),
    ])
}

/// Build the Diving48 dataset from a configuration object.
pub fn build(cfg: &Config) -> Result<ClipDataset> {
    let source = Box::new(FfmpegFrameReader::new(&cfg.data.videos_path));
    build_with_source(cfg, source)
}

/// Build with an explicit frame source. The configuration still supplies
/// the manifest path and the remaining knobs.
pub fn build_with_source(cfg: &Config, source: Box<dyn FrameSource>) -> Result<ClipDataset> {
    let records = manifest::load_manifest(&cfg.data.annotations_path)?;
    let mut dataset = ClipDataset::from_parts(source, records)
        .with_transform(transform_pipeline())
        .with_name("diving48");
    if let Some(fps) = cfg.data.target_fps {
        dataset = dataset.with_target_fps(fps);
    }
    if let Some(limit) = cfg.data.dev_limit {
        dataset = dataset.with_limit(limit);
    }
    Ok(dataset)
}

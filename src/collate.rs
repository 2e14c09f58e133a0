// Collation — right-pad variable-length clips into a rectangular batch
//
// Clips within a batch share per-frame shape but vary in frame count. The
// batch is made rectangular by padding every clip with zero frames up to
// the longest clip, then stacking. Padding is along axis 0 (time-first
// layout); frames `[0, T)` are copied verbatim.

use ndarray::{s, Array4, Array5, ArrayView4, Axis};

use crate::error::{Error, Result};

/// Right-pad a clip along axis 0 with zero frames up to `len`.
///
/// A clip already of length `len` comes back unchanged (element-wise).
///
/// # Panics
/// Panics if `len` is smaller than the clip's frame count.
pub fn pad_clip(clip: &Array4<f32>, len: usize) -> Array4<f32> {
    let (t, d1, d2, d3) = clip.dim();
    assert!(t <= len, "pad_clip: clip of length {t} longer than target {len}");
    let mut out = Array4::<f32>::zeros((len, d1, d2, d3));
    out.slice_mut(s![..t, .., .., ..]).assign(clip);
    out
}

/// Pad every clip in the batch to the maximum frame count present.
///
/// Fails with [`Error::EmptyBatch`] on an empty input.
pub fn collate_clips(batch: &[Array4<f32>]) -> Result<Vec<Array4<f32>>> {
    let t_max = batch
        .iter()
        .map(|clip| clip.len_of(Axis(0)))
        .max()
        .ok_or(Error::EmptyBatch)?;
    Ok(batch.iter().map(|clip| pad_clip(clip, t_max)).collect())
}

/// Stack equal-shaped clips into a single `(B, T, H, W, C)` batch array.
pub fn stack_clips(clips: &[Array4<f32>]) -> Result<Array5<f32>> {
    if clips.is_empty() {
        return Err(Error::EmptyBatch);
    }
    let views: Vec<ArrayView4<f32>> = clips.iter().map(|c| c.view()).collect();
    ndarray::stack(Axis(0), &views)
        .map_err(|e| Error::msg(format!("cannot stack batch: {e}")))
}

// Transform pipeline — per-clip tensor transforms
//
// A transform maps one clip array to another. The pipeline is built once at
// dataset construction and shared read-only across all accesses; every
// transform is stateless.
//
// Layout convention: a freshly decoded clip is `(T, H, W, C)`. The standard
// pipeline starts with [`PermuteToCthw`], after which all spatial/temporal
// stages operate on `(C, T, H, W)`.

use ndarray::{s, Array4, Axis};

/// A transform applied to a whole decoded clip before it is returned.
pub trait Transform: Send + Sync {
    /// Apply the transform, returning the modified clip.
    fn apply(&self, clip: Array4<f32>) -> Array4<f32>;
}

/// Chain multiple transforms.
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }
}

impl Transform for Compose {
    fn apply(&self, mut clip: Array4<f32>) -> Array4<f32> {
        for t in &self.transforms {
            clip = t.apply(clip);
        }
        clip
    }
}

// PermuteToCthw

/// Reorder a decoded `(T, H, W, C)` clip to `(C, T, H, W)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermuteToCthw;

impl Transform for PermuteToCthw {
    fn apply(&self, clip: Array4<f32>) -> Array4<f32> {
        clip.permuted_axes([3, 0, 1, 2])
            .as_standard_layout()
            .to_owned()
    }
}

// Div255

/// Scale pixel values from [0, 255] to [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct Div255;

impl Transform for Div255 {
    fn apply(&self, clip: Array4<f32>) -> Array4<f32> {
        clip.mapv_into(|v| v / 255.0)
    }
}

// ShortSideScale

/// Rescale every frame so the shorter spatial side equals `size`, keeping
/// aspect ratio, using bilinear interpolation.
///
/// Expects `(C, T, H, W)` layout.
#[derive(Debug, Clone, Copy)]
pub struct ShortSideScale {
    pub size: usize,
}

impl ShortSideScale {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

/// Per-output-pixel source indices and blend weight for one axis,
/// following the half-pixel-center convention.
fn bilinear_axis(in_len: usize, out_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = in_len as f64 / out_len as f64;
    (0..out_len)
        .map(|i| {
            let src = ((i as f64 + 0.5) * scale - 0.5).max(0.0);
            let lo = (src.floor() as usize).min(in_len - 1);
            let hi = (lo + 1).min(in_len - 1);
            (lo, hi, (src - lo as f64) as f32)
        })
        .collect()
}

impl Transform for ShortSideScale {
    fn apply(&self, clip: Array4<f32>) -> Array4<f32> {
        let (c, t, h, w) = clip.dim();
        assert!(h > 0 && w > 0, "ShortSideScale: empty frames");

        let (new_h, new_w) = if h <= w {
            (self.size, w * self.size / h)
        } else {
            (h * self.size / w, self.size)
        };

        let ys = bilinear_axis(h, new_h);
        let xs = bilinear_axis(w, new_w);

        let mut out = Array4::<f32>::zeros((c, t, new_h, new_w));
        for ci in 0..c {
            for ti in 0..t {
                let frame = clip.slice(s![ci, ti, .., ..]);
                let mut dst = out.slice_mut(s![ci, ti, .., ..]);
                for (yi, &(y0, y1, wy)) in ys.iter().enumerate() {
                    for (xi, &(x0, x1, wx)) in xs.iter().enumerate() {
                        let top = frame[[y0, x0]] * (1.0 - wx) + frame[[y0, x1]] * wx;
                        let bot = frame[[y1, x0]] * (1.0 - wx) + frame[[y1, x1]] * wx;
                        dst[[yi, xi]] = top * (1.0 - wy) + bot * wy;
                    }
                }
            }
        }
        out
    }
}

// CenterCrop

/// Crop every frame to `crop_h x crop_w` around the spatial center.
///
/// Expects `(C, T, H, W)` layout.
#[derive(Debug, Clone, Copy)]
pub struct CenterCrop {
    pub crop_h: usize,
    pub crop_w: usize,
}

impl CenterCrop {
    pub fn new(crop_h: usize, crop_w: usize) -> Self {
        Self { crop_h, crop_w }
    }
}

impl Transform for CenterCrop {
    fn apply(&self, clip: Array4<f32>) -> Array4<f32> {
        let (_, _, h, w) = clip.dim();
        assert!(
            self.crop_h <= h && self.crop_w <= w,
            "CenterCrop: crop {}x{} larger than frames {}x{}",
            self.crop_h,
            self.crop_w,
            h,
            w,
        );
        let top = (h - self.crop_h) / 2;
        let left = (w - self.crop_w) / 2;
        clip.slice(s![
            ..,
            ..,
            top..top + self.crop_h,
            left..left + self.crop_w
        ])
        .to_owned()
    }
}

// UniformTemporalSubsample

/// Sample exactly `num_samples` frames at indices spaced evenly across the
/// temporal axis. Frames repeat when the clip is shorter than the target.
///
/// Expects `(C, T, H, W)` layout.
#[derive(Debug, Clone, Copy)]
pub struct UniformTemporalSubsample {
    pub num_samples: usize,
}

impl UniformTemporalSubsample {
    pub fn new(num_samples: usize) -> Self {
        Self { num_samples }
    }

    /// Evenly spaced (truncated) indices over `[0, len)`.
    fn indices(&self, len: usize) -> Vec<usize> {
        assert!(len > 0, "UniformTemporalSubsample: empty clip");
        if self.num_samples <= 1 {
            return vec![0];
        }
        let step = (len - 1) as f64 / (self.num_samples - 1) as f64;
        (0..self.num_samples)
            .map(|i| (i as f64 * step) as usize)
            .collect()
    }
}

impl Transform for UniformTemporalSubsample {
    fn apply(&self, clip: Array4<f32>) -> Array4<f32> {
        let t = clip.len_of(Axis(1));
        clip.select(Axis(1), &self.indices(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    /// A `(T, H, W, C)` clip where each element encodes its own index.
    fn indexed_clip(t: usize, h: usize, w: usize) -> Array4<f32> {
        Array::from_shape_fn((t, h, w, 3), |(ti, hi, wi, ci)| {
            (ti * 1_000_000 + hi * 10_000 + wi * 10 + ci) as f32
        })
    }

    #[test]
    fn permute_reorders_axes() {
        let clip = indexed_clip(5, 4, 6);
        let out = PermuteToCthw.apply(clip.clone());
        assert_eq!(out.dim(), (3, 5, 4, 6));
        assert_eq!(out[[2, 4, 3, 1]], clip[[4, 3, 1, 2]]);
    }

    #[test]
    fn div255_scales_values() {
        let clip = Array4::from_elem((1, 1, 2, 2), 127.5);
        let out = Div255.apply(clip);
        assert!(out.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn short_side_scale_geometry() {
        // Landscape: short side is H.
        let clip = Array4::<f32>::zeros((3, 2, 120, 160));
        let out = ShortSideScale::new(256).apply(clip);
        assert_eq!(out.dim(), (3, 2, 256, 341));

        // Portrait: short side is W.
        let clip = Array4::<f32>::zeros((3, 1, 200, 100));
        let out = ShortSideScale::new(50).apply(clip);
        assert_eq!(out.dim(), (3, 1, 100, 50));
    }

    #[test]
    fn short_side_scale_preserves_constant_frames() {
        let clip = Array4::from_elem((3, 2, 30, 40), 7.25);
        let out = ShortSideScale::new(60).apply(clip);
        assert_eq!(out.dim(), (3, 2, 60, 80));
        assert!(out.iter().all(|&v| (v - 7.25).abs() < 1e-4));
    }

    #[test]
    fn center_crop_takes_middle() {
        // 1 channel, 1 frame, 4x6; center 2x2 of a row-major ramp.
        let clip = Array::from_shape_fn((1, 1, 4, 6), |(_, _, y, x)| (y * 6 + x) as f32);
        let out = CenterCrop::new(2, 2).apply(clip);
        assert_eq!(out.dim(), (1, 1, 2, 2));
        // top = 1, left = 2
        assert_eq!(out[[0, 0, 0, 0]], (1 * 6 + 2) as f32);
        assert_eq!(out[[0, 0, 1, 1]], (2 * 6 + 3) as f32);
    }

    #[test]
    #[should_panic]
    fn center_crop_larger_than_input_panics() {
        let clip = Array4::<f32>::zeros((3, 1, 10, 10));
        CenterCrop::new(16, 16).apply(clip);
    }

    #[test]
    fn temporal_subsample_undersamples() {
        let sub = UniformTemporalSubsample::new(4);
        assert_eq!(sub.indices(8), vec![0, 2, 4, 7]);
        assert_eq!(sub.indices(128), vec![0, 42, 84, 127]);
    }

    #[test]
    fn temporal_subsample_oversamples_short_clips() {
        let sub = UniformTemporalSubsample::new(4);
        // 2 frames stretched to 4: frames repeat.
        assert_eq!(sub.indices(2), vec![0, 0, 0, 1]);
        assert_eq!(sub.indices(1), vec![0, 0, 0, 0]);
    }

    #[test]
    fn temporal_subsample_selects_frames() {
        let clip = PermuteToCthw.apply(indexed_clip(8, 2, 2));
        let out = UniformTemporalSubsample::new(4).apply(clip.clone());
        assert_eq!(out.dim(), (3, 4, 2, 2));
        for (dst, src) in [(0usize, 0usize), (1, 2), (2, 4), (3, 7)] {
            assert_eq!(out[[0, dst, 1, 1]], clip[[0, src, 1, 1]]);
        }
    }

    #[test]
    fn compose_applies_in_order() {
        let pipeline = Compose::new(vec![
            Box::new(PermuteToCthw),
            Box::new(Div255),
            Box::new(UniformTemporalSubsample::new(2)),
        ]);
        let clip = Array4::from_elem((6, 4, 4, 3), 255.0);
        let out = pipeline.apply(clip);
        assert_eq!(out.dim(), (3, 2, 4, 4));
        assert!(out.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }
}

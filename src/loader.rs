// DataLoader — batching, shuffling, iteration

use ndarray::{Array1, Array5};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};
use rayon::prelude::*;

use crate::collate::{collate_clips, stack_clips};
use crate::dataset::{ClipSample, VideoDataset};
use crate::error::Result;

/// Configuration for the DataLoader.
#[derive(Debug, Clone)]
pub struct DataLoaderConfig {
    /// Number of clips per batch.
    pub batch_size: usize,
    /// Whether to shuffle indices each epoch.
    pub shuffle: bool,
    /// Whether to drop the last incomplete batch.
    pub drop_last: bool,
    /// Number of parallel workers for clip decoding (0 = sequential).
    pub num_workers: usize,
    /// Optional random seed for reproducible shuffling.
    pub seed: Option<u64>,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            shuffle: true,
            drop_last: false,
            num_workers: 0,
            seed: None,
        }
    }
}

impl DataLoaderConfig {
    pub fn batch_size(mut self, bs: usize) -> Self {
        self.batch_size = bs;
        self
    }

    pub fn shuffle(mut self, s: bool) -> Self {
        self.shuffle = s;
        self
    }

    pub fn drop_last(mut self, d: bool) -> Self {
        self.drop_last = d;
        self
    }

    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }
}

/// One collated batch: clips padded to a common frame count and stacked,
/// labels alongside.
#[derive(Debug, Clone)]
pub struct ClipBatch {
    /// `(B, T_max, H, W, C)` for untransformed clips; more generally the
    /// per-clip layout with a batch axis in front and axis 0 padded.
    pub clips: Array5<f32>,
    /// `(B,)` class labels.
    pub labels: Array1<i64>,
}

/// A DataLoader wraps a dataset and produces collated batches.
pub struct DataLoader<'a> {
    dataset: &'a dyn VideoDataset,
    config: DataLoaderConfig,
    indices: Vec<usize>,
}

impl<'a> DataLoader<'a> {
    /// Create a new DataLoader over a dataset.
    pub fn new(dataset: &'a dyn VideoDataset, config: DataLoaderConfig) -> Self {
        let indices: Vec<usize> = (0..dataset.len()).collect();
        Self {
            dataset,
            config,
            indices,
        }
    }

    /// The number of batches per epoch.
    pub fn num_batches(&self) -> usize {
        if self.config.drop_last {
            self.dataset.len() / self.config.batch_size
        } else {
            self.dataset.len().div_ceil(self.config.batch_size)
        }
    }

    /// Total number of clips.
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Reshuffle indices (call at the start of each epoch).
    pub fn reshuffle(&mut self) {
        if self.config.shuffle {
            match self.config.seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    self.indices.shuffle(&mut rng);
                }
                None => {
                    let mut rng = thread_rng();
                    self.indices.shuffle(&mut rng);
                }
            }
        }
    }

    /// Fetch a slice of samples, optionally in parallel via rayon.
    fn fetch_samples(&self, indices: &[usize]) -> Result<Vec<ClipSample>> {
        if self.config.num_workers > 0 && indices.len() > 1 {
            indices
                .par_iter()
                .map(|&i| self.dataset.get(i))
                .collect()
        } else {
            indices.iter().map(|&i| self.dataset.get(i)).collect()
        }
    }

    /// Assemble one collated batch from the given dataset indices.
    fn build_batch(&self, indices: &[usize]) -> Result<ClipBatch> {
        let samples = self.fetch_samples(indices)?;
        let labels = Array1::from_iter(samples.iter().map(|s| s.label));
        let clips: Vec<_> = samples.into_iter().map(|s| s.clip).collect();
        let clips = stack_clips(&collate_clips(&clips)?)?;
        Ok(ClipBatch { clips, labels })
    }

    /// Iterate over batches one at a time, reshuffling first.
    pub fn iter_batches(&mut self) -> BatchIterator<'_, 'a> {
        self.reshuffle();
        BatchIterator {
            loader: self,
            batch_idx: 0,
        }
    }
}

/// Iterator that yields one collated batch at a time.
pub struct BatchIterator<'l, 'a> {
    loader: &'l DataLoader<'a>,
    batch_idx: usize,
}

impl<'l, 'a> Iterator for BatchIterator<'l, 'a> {
    type Item = Result<ClipBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        let bs = self.loader.config.batch_size;
        let n = self.loader.dataset.len();
        let start = self.batch_idx * bs;

        if start >= n {
            return None;
        }
        if self.loader.config.drop_last && start + bs > n {
            return None;
        }

        let end = (start + bs).min(n);
        self.batch_idx += 1;

        let indices: Vec<usize> = (start..end).map(|i| self.loader.indices[i]).collect();
        Some(self.loader.build_batch(&indices))
    }
}

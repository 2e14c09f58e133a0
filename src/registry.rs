// Dataset registry — explicit name → factory mapping
//
// A training configuration names the dataset it wants; the registry maps
// that name to a builder function. The registry is an ordinary value the
// caller constructs and populates — registering a dataset never happens as
// a side effect of linking a module in.

use std::collections::HashMap;

use crate::config::Config;
use crate::dataset::ClipDataset;
use crate::diving48;
use crate::error::{Error, Result};

/// A factory building a dataset from a configuration object.
pub type DatasetBuilder = fn(&Config) -> Result<ClipDataset>;

/// Maps dataset names to their builders.
#[derive(Default)]
pub struct DatasetRegistry {
    builders: HashMap<String, DatasetBuilder>,
}

impl DatasetRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in datasets.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        reg.register("diving48", diving48::build);
        reg
    }

    /// Register a builder under a name, replacing any previous entry.
    pub fn register(&mut self, name: &str, builder: DatasetBuilder) {
        self.builders.insert(name.to_string(), builder);
    }

    /// Instantiate the named dataset from the given configuration.
    pub fn build(&self, name: &str, cfg: &Config) -> Result<ClipDataset> {
        let builder = self
            .builders
            .get(name)
            .ok_or_else(|| Error::UnknownDataset(name.to_string()))?;
        builder(cfg)
    }

    /// Registered dataset names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

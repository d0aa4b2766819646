//! Per-call population state.

use fixture_core::ObjectValue;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Options for a single populate call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateOptions {
    /// Dot-separated field paths (`"address.street"`) left untouched
    pub excluded_paths: HashSet<String>,
}

impl PopulateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave the field at `path` untouched.
    pub fn exclude_path(mut self, path: impl Into<String>) -> Self {
        self.excluded_paths.insert(path.into());
        self
    }
}

/// State of one top-level populate call.
///
/// Tracks the field path being populated (its length is the current depth)
/// and the pool of instances completed so far. Created for each call and
/// dropped when the call returns.
pub struct PopulationContext<'a> {
    rng: &'a mut StdRng,
    options: &'a PopulateOptions,
    path: Vec<String>,
    pool: HashMap<String, Vec<ObjectValue>>,
    max_pool_size: usize,
}

impl<'a> PopulationContext<'a> {
    pub fn new(rng: &'a mut StdRng, options: &'a PopulateOptions, max_pool_size: usize) -> Self {
        Self {
            rng,
            options,
            path: Vec::new(),
            pool: HashMap::new(),
            max_pool_size,
        }
    }

    /// The call's random source.
    pub fn rng(&mut self) -> &mut StdRng {
        self.rng
    }

    /// Number of field frames on the stack; top-level fields are at depth 1.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn enter_field(&mut self, name: &str) {
        self.path.push(name.to_string());
    }

    pub fn leave_field(&mut self) {
        self.path.pop();
    }

    /// Dot-separated path of the current field.
    pub fn current_path(&self) -> String {
        self.path.join(".")
    }

    /// Check if the current field was excluded by path for this call.
    pub fn is_current_path_excluded(&self) -> bool {
        !self.options.excluded_paths.is_empty()
            && self.options.excluded_paths.contains(&self.current_path())
    }

    /// Check if some excluded path lies below the current field.
    fn has_excluded_below(&self) -> bool {
        if self.options.excluded_paths.is_empty() {
            return false;
        }
        if self.path.is_empty() {
            return true;
        }
        let prefix = format!("{}.", self.current_path());
        self.options
            .excluded_paths
            .iter()
            .any(|path| path.starts_with(&prefix))
    }

    /// Instances whose subtree holds an excluded path are neither pooled nor
    /// replaced by pooled ones.
    fn pooling_enabled(&self) -> bool {
        self.max_pool_size > 0 && !self.has_excluded_below()
    }

    /// Check if the pool for `type_name` is full, so instances must be reused.
    pub fn pool_is_full(&self, type_name: &str) -> bool {
        self.pooling_enabled()
            && self
                .pool
                .get(type_name)
                .is_some_and(|instances| instances.len() >= self.max_pool_size)
    }

    /// A uniformly chosen pooled instance of `type_name`.
    pub fn reuse_pooled(&mut self, type_name: &str) -> Option<ObjectValue> {
        let instances = self.pool.get(type_name)?;
        if instances.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..instances.len());
        Some(instances[idx].clone())
    }

    /// Remember a completed instance, unless the pool for its type is full.
    pub fn add_to_pool(&mut self, instance: &ObjectValue) {
        if !self.pooling_enabled() {
            return;
        }
        let instances = self.pool.entry(instance.type_name.clone()).or_default();
        if instances.len() < self.max_pool_size {
            instances.push(instance.clone());
        }
    }

    /// Number of pooled instances of `type_name`.
    pub fn pooled_count(&self, type_name: &str) -> usize {
        self.pool.get(type_name).map_or(0, Vec::len)
    }
}

//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;

use crate::error::DescriptionError;

use super::coord::Axis;

/// Configuration options for layout computation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width given to controls that nothing else sizes
    pub default_width: i32,

    /// Height given to controls that nothing else sizes
    pub default_height: i32,

    /// Offset between successive siblings that no constraint positions
    pub placement_step: i32,

    /// Outer rounds a container may take before layout fails
    pub max_rounds: usize,

    /// Outer rounds above which a warning is logged
    pub warn_rounds: usize,

    /// Per-control starting guess for fill constraints
    pub fill_seed: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_width: 80,
            default_height: 30,
            placement_step: 10,
            max_rounds: 20,
            warn_rounds: 2,
            fill_seed: 100,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DescriptionError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string. Missing keys keep their defaults.
    pub fn from_str(content: &str) -> Result<Self, DescriptionError> {
        Ok(toml::from_str(content)?)
    }

    /// Default size on one axis
    pub fn default_size(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.default_width,
            Axis::Vertical => self.default_height,
        }
    }

    /// Set the default control size
    pub fn with_default_size(mut self, width: i32, height: i32) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    /// Set the stagger between unplaced siblings
    pub fn with_placement_step(mut self, step: i32) -> Self {
        self.placement_step = step;
        self
    }

    /// Set the outer-round cap
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the per-control fill seed
    pub fn with_fill_seed(mut self, seed: i32) -> Self {
        self.fill_seed = seed;
        self
    }
}

//! Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stk_core::volume::check_axis;
use stk_core::{InterpolationPolicy, OutputRange, Result, StkError};
use stk_model::{Standardization, REFERENCE_RESOLUTION};

/// How slices are distributed over workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// One slice after another on the calling thread.
    #[default]
    Sequential,
    /// Slices spread over a rayon pool. `threads: None` uses the global pool.
    Parallel { threads: Option<usize> },
}

/// Configuration of a [`crate::SliceDenoiser`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    /// Volume axis to slice along.
    pub axis: usize,
    /// Model input resolution `[rows, cols]`.
    pub target_resolution: [usize; 2],
    pub standardize_mean: f32,
    pub standardize_scale: f32,
    /// Display range the volume is rescaled into and clamped to.
    pub output_range: OutputRange,
    pub interpolation: InterpolationPolicy,
    pub strategy: ExecutionStrategy,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        let standardization = Standardization::default();
        Self {
            axis: 2,
            target_resolution: REFERENCE_RESOLUTION,
            standardize_mean: standardization.mean,
            standardize_scale: standardization.scale,
            output_range: OutputRange::default(),
            interpolation: InterpolationPolicy::default(),
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl DenoiseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, axis: usize) -> Self {
        self.axis = axis;
        self
    }

    /// Set the model input resolution `[rows, cols]`.
    pub fn with_target_resolution(mut self, target_resolution: [usize; 2]) -> Self {
        self.target_resolution = target_resolution;
        self
    }

    pub fn with_standardization(mut self, mean: f32, scale: f32) -> Self {
        self.standardize_mean = mean;
        self.standardize_scale = scale;
        self
    }

    pub fn with_output_range(mut self, output_range: OutputRange) -> Self {
        self.output_range = output_range;
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationPolicy) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Standardization built from the mean and scale fields.
    pub fn standardization(&self) -> Standardization {
        Standardization {
            mean: self.standardize_mean,
            scale: self.standardize_scale,
        }
    }

    /// Check every field before a run starts.
    pub fn validate(&self) -> Result<()> {
        check_axis(self.axis)?;
        if self.target_resolution.contains(&0) {
            return Err(StkError::invalid_configuration(format!(
                "target resolution must be non-zero, got {:?}",
                self.target_resolution
            )));
        }
        self.standardization().validate()?;
        self.output_range.validate()?;
        if let ExecutionStrategy::Parallel { threads: Some(0) } = self.strategy {
            return Err(StkError::invalid_configuration("parallel strategy needs at least one thread"));
        }
        Ok(())
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StkError::invalid_configuration(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StkError::io(path, e))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StkError::invalid_configuration(format!("cannot serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DenoiseConfig::default();
        assert_eq!(config.axis, 2);
        assert_eq!(config.target_resolution, [400, 160]);
        assert_eq!(config.standardize_mean, 128.0);
        assert_eq!(config.standardize_scale, 43.0);
        assert_eq!(config.output_range, OutputRange { lo: 0.0, hi: 255.0 });
        assert_eq!(config.strategy, ExecutionStrategy::Sequential);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            DenoiseConfig::new().with_axis(3).validate(),
            Err(StkError::InvalidAxis(3))
        ));
        assert!(matches!(
            DenoiseConfig::new().with_target_resolution([0, 4]).validate(),
            Err(StkError::InvalidConfiguration(_))
        ));
        assert!(DenoiseConfig::new().with_standardization(0.0, 0.0).validate().is_err());
        assert!(DenoiseConfig::new()
            .with_output_range(OutputRange { lo: 5.0, hi: 5.0 })
            .validate()
            .is_err());
        assert!(DenoiseConfig::new()
            .with_strategy(ExecutionStrategy::Parallel { threads: Some(0) })
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "axis": 0,
            "target_resolution": [64, 32],
            "interpolation": "nearest",
            "strategy": { "parallel": { "threads": 2 } }
        }"#;
        let config = DenoiseConfig::from_json(json).unwrap();
        assert_eq!(config.axis, 0);
        assert_eq!(config.target_resolution, [64, 32]);
        assert_eq!(config.interpolation, InterpolationPolicy::Nearest);
        assert_eq!(config.strategy, ExecutionStrategy::Parallel { threads: Some(2) });
        assert_eq!(config.standardize_scale, 43.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = DenoiseConfig::new()
            .with_axis(1)
            .with_standardization(0.0, 1.0)
            .with_strategy(ExecutionStrategy::Parallel { threads: None });
        let parsed = DenoiseConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("denoise.json");
        std::fs::write(&path, r#"{ "axis": 1, "output_range": { "lo": -1.0, "hi": 1.0 } }"#).unwrap();

        let config = DenoiseConfig::from_json_file(&path).unwrap();
        assert_eq!(config.axis, 1);
        assert_eq!(config.output_range, OutputRange { lo: -1.0, hi: 1.0 });

        let missing = DenoiseConfig::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(missing, Err(StkError::Io { .. })));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(matches!(
            DenoiseConfig::from_json("{ \"axis\": \"two\" }"),
            Err(StkError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            DenoiseConfig::from_json("{ \"axis\": 7 }"),
            Err(StkError::InvalidAxis(7))
        ));
    }
}

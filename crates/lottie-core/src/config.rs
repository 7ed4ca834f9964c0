use serde::Deserialize;

/// Tunable numeric constants of the evaluation engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Absolute length error (in path units) accepted when cutting a curve.
    pub trim_accuracy: f32,
    /// Refinement passes when cutting a curve at a length.
    pub trim_max_samples: u32,
    /// Polyline samples used to measure one cubic segment.
    pub curve_length_samples: u32,
    /// Samples in the arc-length table of a spatial keyframe span.
    pub spatial_samples: u32,
    /// Fail the build instead of warning on unsupported document features.
    pub strict_unsupported: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trim_accuracy: 1.0,
            trim_max_samples: 3,
            curve_length_samples: 25,
            spatial_samples: 20,
            strict_unsupported: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn curve_precision(&self) -> CurvePrecision {
        CurvePrecision {
            accuracy: self.trim_accuracy,
            max_samples: self.trim_max_samples.max(1),
            length_samples: self.curve_length_samples.max(1),
        }
    }
}

/// The subset of [`EngineConfig`] the geometry code needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePrecision {
    pub accuracy: f32,
    pub max_samples: u32,
    pub length_samples: u32,
}

impl Default for CurvePrecision {
    fn default() -> Self {
        EngineConfig::default().curve_precision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "trim_accuracy": 0.25 }"#).unwrap();
        assert_eq!(config.trim_accuracy, 0.25);
        assert_eq!(config.trim_max_samples, 3);
        assert!(!config.strict_unsupported);
    }

    #[test]
    fn precision_never_zero_samples() {
        let config = EngineConfig {
            trim_max_samples: 0,
            curve_length_samples: 0,
            ..EngineConfig::default()
        };
        let precision = config.curve_precision();
        assert_eq!(precision.max_samples, 1);
        assert_eq!(precision.length_samples, 1);
    }
}

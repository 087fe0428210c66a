use featmatch_core::CoreConfig;

use crate::detector::FastDetector;
use crate::error::{FastError, FastResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete detector configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Image dimensions
    pub width: usize,
    pub height: usize,
    /// Minimum distance between keypoints after suppression
    pub nms_radius: f32,
    /// Detect on every pyramid level instead of the base image only
    pub use_pyramid: bool,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    /// Core detection parameters
    pub core: CoreConfig,
}

impl DetectorConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            nms_radius: 3.0,
            use_pyramid: true,
            name: None,
            description: None,
            core: CoreConfig {
                threshold: 20,
                patch_size: 15,
                n_threads: 1,
            },
        }
    }

    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self
    }

    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    pub fn summary(&self) -> String {
        format!(
            "DetectorConfig: {}x{}, threshold={}, patch_size={}, nms={:.1}, pyramid={}",
            self.width,
            self.height,
            self.core.threshold,
            self.core.patch_size,
            self.nms_radius,
            self.use_pyramid
        )
    }

    pub fn validate(&self) -> FastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FastError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.core.threshold == 0 || self.core.threshold > 127 {
            return Err(FastError::ThresholdOutOfRange(self.core.threshold));
        }
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Fluent builder for detector configuration
pub struct DetectorBuilder {
    config: DetectorConfig,
}

impl DetectorBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            config: DetectorConfig::new(width, height),
        }
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.config.core.threshold = threshold;
        self
    }

    pub fn patch_size(mut self, patch_size: usize) -> Self {
        self.config.core.patch_size = patch_size;
        self
    }

    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.core.n_threads = n_threads;
        self
    }

    pub fn nms_radius(mut self, radius: f32) -> Self {
        self.config.nms_radius = radius;
        self
    }

    pub fn pyramid(mut self, enable: bool) -> Self {
        self.config.use_pyramid = enable;
        self
    }

    /// Fast preset: higher threshold, base level only
    pub fn preset_fast(mut self) -> Self {
        self.config.core.threshold = 30;
        self.config.core.patch_size = 15;
        self.config.core.n_threads = num_cpus::get();
        self.config.nms_radius = 5.0;
        self.config.use_pyramid = false;
        self
    }

    /// Quality preset: lower threshold, full pyramid
    pub fn preset_quality(mut self) -> Self {
        self.config.core.threshold = 15;
        self.config.core.patch_size = 31;
        self.config.core.n_threads = num_cpus::get();
        self.config.nms_radius = 2.0;
        self.config.use_pyramid = true;
        self
    }

    pub fn from_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn to_config(self) -> DetectorConfig {
        self.config
    }

    /// Build a validated detector for the configured dimensions
    pub fn build(self) -> FastResult<FastDetector> {
        self.config.validate()?;
        let nms = self.config.nms_radius;
        Ok(
            FastDetector::new(self.config.core, self.config.width, self.config.height)?
                .with_nms_radius(nms),
        )
    }
}

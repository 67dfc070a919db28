//! Viewer configuration, loaded from a YAML file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rasterizer::RasterOptions;
use serde::Deserialize;

/// Root viewer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub raster: RasterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where year files come from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// URL template with a `{year}` placeholder, e.g.
    /// `https://data.example.org/edgar/nh3_{year}.json`.
    pub url_template: String,

    /// Force a substance table instead of detecting it from the data.
    #[serde(default)]
    pub substance: Option<String>,
}

/// Raster output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RasterConfig {
    #[serde(default = "default_max_dimension")]
    pub max_width: usize,
    #[serde(default = "default_max_dimension")]
    pub max_height: usize,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_max_dimension() -> usize {
    1024
}

fn default_opacity() -> f64 {
    0.82
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            opacity: default_opacity(),
        }
    }
}

impl RasterConfig {
    pub fn to_options(&self) -> RasterOptions {
        RasterOptions {
            max_width: self.max_width,
            max_height: self.max_height,
            opacity: self.opacity,
        }
    }
}

/// Where rendered overlays land.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./overlays")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl ViewerConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ViewerConfig =
            serde_yaml::from_str(&content).context("Failed to parse viewer config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.source.url_template.contains("{year}") {
            bail!("source.url_template must contain a {{year}} placeholder");
        }
        if self.raster.max_width == 0 || self.raster.max_height == 0 {
            bail!("raster dimensions must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let yaml = "source:\n  url_template: \"https://example.org/{year}.json\"\n";
        let config: ViewerConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.raster.max_width, 1024);
        assert_eq!(config.raster.opacity, 0.82);
        assert_eq!(config.output.dir, PathBuf::from("./overlays"));
        assert!(config.source.substance.is_none());
    }

    #[test]
    fn test_template_must_contain_year() {
        let yaml = "source:\n  url_template: \"https://example.org/fixed.json\"\n";
        let config: ViewerConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}

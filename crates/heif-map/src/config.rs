//! Provider configuration.
//!
//! Loaded from a YAML provider definition:
//!
//! ```yaml
//! data: /data/scene.heic
//! crs: EPSG:4326          # optional
//! options:
//!   bbox: [-10, -10, 10, 10]
//! rotation_degrees: -90   # optional, multiple of 90, positive is counter-clockwise
//! resampling: nearest     # optional: nearest | bilinear | cubic
//! jpeg_quality: 90        # optional, 1-100
//! ```
//!
//! or from `HEIF_MAP_*` environment variables.

use std::path::{Path, PathBuf};

use map_common::{BoundingBox, CrsCode, MapError, MapResult};
use map_encoder::jpeg::DEFAULT_JPEG_QUALITY;
use serde::{Deserialize, Serialize};

use crate::types::{ResamplingMethod, Rotation};

/// Provider-specific options block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOptions {
    /// Native extent `[minx, miny, maxx, maxy]` in the provider CRS.
    pub bbox: BoundingBox,
}

/// Configuration for a HEIF map provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Path to the source image.
    pub data: PathBuf,

    pub options: ProviderOptions,

    /// CRS of the native extent.
    #[serde(default = "default_crs")]
    pub crs: CrsCode,

    /// Rotation applied after decoding.
    #[serde(default)]
    pub rotation_degrees: i32,

    /// Interpolation used when warping.
    #[serde(default)]
    pub resampling: ResamplingMethod,

    /// JPEG quality (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_crs() -> CrsCode {
    CrsCode::Epsg4326
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl ProviderConfig {
    /// Config with defaults for everything but the source and extent.
    pub fn new(data: impl Into<PathBuf>, bbox: BoundingBox) -> Self {
        Self {
            data: data.into(),
            options: ProviderOptions { bbox },
            crs: default_crs(),
            rotation_degrees: 0,
            resampling: ResamplingMethod::default(),
            jpeg_quality: default_jpeg_quality(),
        }
    }

    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn with_resampling(mut self, method: ResamplingMethod) -> Self {
        self.resampling = method;
        self
    }

    pub fn with_crs(mut self, crs: CrsCode) -> Self {
        self.crs = crs;
        self
    }

    /// Parse a YAML provider definition.
    pub fn from_yaml_str(yaml: &str) -> MapResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| MapError::config(e.to_string()))
    }

    /// Load a YAML provider definition. Relative `data` paths resolve against
    /// the file's directory.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MapError::config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_yaml_str(&contents)?;

        if config.data.is_relative() {
            if let Some(dir) = path.parent() {
                config.data = dir.join(&config.data);
            }
        }
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// `HEIF_MAP_DATA` and `HEIF_MAP_BBOX` (`minx,miny,maxx,maxy`) are
    /// required; `HEIF_MAP_CRS`, `HEIF_MAP_ROTATION`, `HEIF_MAP_RESAMPLING`
    /// and `JPEG_QUALITY` are optional.
    pub fn from_env() -> MapResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> MapResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data = lookup("HEIF_MAP_DATA")
            .ok_or_else(|| MapError::config("HEIF_MAP_DATA is not set"))?;
        let bbox_str = lookup("HEIF_MAP_BBOX")
            .ok_or_else(|| MapError::config("HEIF_MAP_BBOX is not set"))?;
        let bbox = BoundingBox::from_bbox_string(&bbox_str)
            .map_err(|e| MapError::config(format!("HEIF_MAP_BBOX: {}", e)))?;

        let mut config = Self::new(data, bbox);

        if let Some(val) = lookup("HEIF_MAP_CRS") {
            config.crs = CrsCode::parse(&val)
                .map_err(|e| MapError::config(format!("HEIF_MAP_CRS: {}", e)))?;
        }

        if let Some(val) = lookup("HEIF_MAP_ROTATION") {
            config.rotation_degrees = val.trim().parse().map_err(|_| {
                MapError::config(format!("HEIF_MAP_ROTATION: '{}' is not an integer", val))
            })?;
        }

        if let Some(val) = lookup("HEIF_MAP_RESAMPLING") {
            config.resampling = ResamplingMethod::from_str(&val).ok_or_else(|| {
                MapError::config(format!("HEIF_MAP_RESAMPLING: unknown method '{}'", val))
            })?;
        }

        if let Some(val) = lookup("JPEG_QUALITY") {
            config.jpeg_quality = val.trim().parse().map_err(|_| {
                MapError::config(format!("JPEG_QUALITY: '{}' is not a number in 1..=100", val))
            })?;
        }

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> MapResult<()> {
        if self.data.as_os_str().is_empty() {
            return Err(MapError::config("data path is empty"));
        }

        self.options
            .bbox
            .validate()
            .map_err(|e| MapError::georeference(format!("native extent: {}", e)))?;

        self.rotation()?;

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(MapError::config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        Ok(())
    }

    pub fn rotation(&self) -> MapResult<Rotation> {
        Rotation::from_degrees(self.rotation_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_yaml_defaults() {
        let config = ProviderConfig::from_yaml_str(
            "data: scene.heic\noptions:\n  bbox: [-10, -10, 10, 10]\n",
        )
        .unwrap();

        assert_eq!(config.data, PathBuf::from("scene.heic"));
        assert_eq!(config.options.bbox, BoundingBox::new(-10.0, -10.0, 10.0, 10.0));
        assert_eq!(config.crs, CrsCode::Epsg4326);
        assert_eq!(config.rotation_degrees, 0);
        assert_eq!(config.resampling, ResamplingMethod::Nearest);
        assert_eq!(config.jpeg_quality, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_all_fields() {
        let config = ProviderConfig::from_yaml_str(
            "data: a.heic\ncrs: EPSG:3857\noptions:\n  bbox: [0, 0, 100, 50]\nrotation_degrees: -90\nresampling: cubic\njpeg_quality: 75\n",
        )
        .unwrap();

        assert_eq!(config.crs, CrsCode::Epsg3857);
        assert_eq!(config.rotation().unwrap(), Rotation::Clockwise90);
        assert_eq!(config.resampling, ResamplingMethod::Cubic);
        assert_eq!(config.jpeg_quality, 75);
    }

    #[test]
    fn test_yaml_errors_are_config() {
        let missing_bbox = ProviderConfig::from_yaml_str("data: a.heic\n");
        assert!(matches!(missing_bbox, Err(MapError::Config(_))));

        let short_bbox = ProviderConfig::from_yaml_str("data: a.heic\noptions:\n  bbox: [1, 2, 3]\n");
        assert!(matches!(short_bbox, Err(MapError::Config(_))));

        let bad_crs = ProviderConfig::from_yaml_str(
            "data: a.heic\ncrs: EPSG:27700\noptions:\n  bbox: [0, 0, 1, 1]\n",
        );
        assert!(matches!(bad_crs, Err(MapError::Config(_))));
    }

    #[test]
    fn test_validate() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(ProviderConfig::new("a.heic", bbox).validate().is_ok());

        let config = ProviderConfig::new("a.heic", bbox).with_rotation(45);
        assert!(matches!(config.validate(), Err(MapError::Config(_))));

        let mut config = ProviderConfig::new("a.heic", bbox);
        config.jpeg_quality = 0;
        assert!(matches!(config.validate(), Err(MapError::Config(_))));

        let degenerate = ProviderConfig::new("a.heic", BoundingBox::new(1.0, 0.0, 1.0, 1.0));
        assert!(matches!(degenerate.validate(), Err(MapError::Georeference(_))));
    }

    #[test]
    fn test_from_lookup() {
        let config = ProviderConfig::from_lookup(lookup(&[
            ("HEIF_MAP_DATA", "/data/a.heic"),
            ("HEIF_MAP_BBOX", "-10,-10,10,10"),
            ("HEIF_MAP_CRS", "CRS84"),
            ("HEIF_MAP_ROTATION", "180"),
            ("HEIF_MAP_RESAMPLING", "bilinear"),
            ("JPEG_QUALITY", "60"),
        ]))
        .unwrap();

        assert_eq!(config.data, PathBuf::from("/data/a.heic"));
        assert_eq!(config.crs, CrsCode::Crs84);
        assert_eq!(config.rotation().unwrap(), Rotation::Half);
        assert_eq!(config.resampling, ResamplingMethod::Bilinear);
        assert_eq!(config.jpeg_quality, 60);
    }

    #[test]
    fn test_from_lookup_requires_data_and_bbox() {
        assert!(ProviderConfig::from_lookup(lookup(&[("HEIF_MAP_BBOX", "0,0,1,1")])).is_err());
        assert!(ProviderConfig::from_lookup(lookup(&[("HEIF_MAP_DATA", "a.heic")])).is_err());
        assert!(ProviderConfig::from_lookup(lookup(&[
            ("HEIF_MAP_DATA", "a.heic"),
            ("HEIF_MAP_BBOX", "0,0,1,1"),
            ("HEIF_MAP_RESAMPLING", "lanczos"),
        ]))
        .is_err());
    }

    #[test]
    fn test_from_lookup_rejects_bad_jpeg_quality() {
        let base = [("HEIF_MAP_DATA", "a.heic"), ("HEIF_MAP_BBOX", "0,0,1,1")];
        for bad in ["high", "", "300", "-5"] {
            let mut vars = base.to_vec();
            vars.push(("JPEG_QUALITY", bad));
            let err = ProviderConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(matches!(err, MapError::Config(_)), "{}", bad);
        }

        let mut vars = base.to_vec();
        vars.push(("JPEG_QUALITY", " 75 "));
        assert_eq!(ProviderConfig::from_lookup(lookup(&vars)).unwrap().jpeg_quality, 75);
    }
}

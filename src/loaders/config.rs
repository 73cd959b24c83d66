use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};
use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

use crate::grid::OccupancyGrid;
use crate::types::{MapError, MapInfo};

/// Mapping configuration as stored in YAML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapConfig {
    pub map: MapSection,
    pub depth_camera: DepthCameraConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapSection {
    #[serde(deserialize_with = "deserialize_positive")]
    pub resolution: f32,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DepthCameraConfig {
    /// Returns farther than this only clear space.
    #[serde(deserialize_with = "deserialize_positive")]
    pub trimmed_range_max: f32,
    #[serde(
        default = "default_range_max",
        deserialize_with = "deserialize_positive"
    )]
    pub range_max: f32,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
    #[serde(
        default = "default_horizontal_fov",
        deserialize_with = "deserialize_positive"
    )]
    pub horizontal_fov: f32,
    #[serde(
        default = "default_vertical_fov",
        deserialize_with = "deserialize_positive"
    )]
    pub vertical_fov: f32,
    /// Camera position in the body frame.
    #[serde(default)]
    pub offset: [f32; 3],
}

fn default_range_max() -> f32 {
    30.0
}

fn default_rows() -> u32 {
    24
}

fn default_cols() -> u32 {
    32
}

fn default_horizontal_fov() -> f32 {
    FRAC_PI_2
}

fn default_vertical_fov() -> f32 {
    FRAC_PI_3
}

fn deserialize_positive<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a positive finite value, got {value}"
        )))
    }
}

impl MapConfig {
    /// Validated map geometry.
    pub fn map_info(&self) -> Result<MapInfo, MapError> {
        MapInfo::new(
            Vec3::from_array(self.map.min),
            Vec3::from_array(self.map.max),
            self.map.resolution,
        )
    }

    /// Allocate an empty occupancy grid for this configuration.
    pub fn build_grid(&self) -> Result<OccupancyGrid, MapError> {
        Ok(OccupancyGrid::new(self.map_info()?))
    }

    fn validate(&self) -> Result<(), MapError> {
        self.map_info()?;
        let camera = &self.depth_camera;
        if camera.rows == 0 || camera.cols == 0 {
            return Err(MapError::InvalidConfig(format!(
                "depth camera needs at least one ray, got {}x{}",
                camera.rows, camera.cols
            )));
        }
        if !Vec3::from_array(camera.offset).is_finite() {
            return Err(MapError::InvalidConfig(
                "depth camera offset must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse and validate a configuration from YAML text.
pub fn parse_config(yaml: &str) -> Result<MapConfig, MapError> {
    let config: MapConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(yaml_path: impl AsRef<Path>) -> Result<MapConfig, MapError> {
    let yaml_str = std::fs::read_to_string(yaml_path.as_ref())?;
    parse_config(&yaml_str)
}

/// Load a configuration and allocate the empty grid it describes.
pub fn load_occupancy_grid(yaml_path: impl AsRef<Path>) -> Result<OccupancyGrid, MapError> {
    load_config(yaml_path)?.build_grid()
}

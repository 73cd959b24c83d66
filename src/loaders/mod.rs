pub mod config;

pub use config::{
    DepthCameraConfig, MapConfig, MapSection, load_config, load_occupancy_grid, parse_config,
};

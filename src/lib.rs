pub mod grid;
pub mod loaders;
pub mod query;
pub mod raycast;
pub mod sensor;
pub mod types;

pub use grid::{OccupancyGrid, VoxelStore};
pub use loaders::{MapConfig, load_config, load_occupancy_grid};
pub use query::PointCloud;
pub use raycast::{RayHit, RayOutcome, ScanSummary};
pub use sensor::{Pose3, RaySource, Scan};
pub use types::{Cell, Index, MapError, MapInfo, Point, VoxelState};

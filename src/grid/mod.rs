pub mod merge;
pub mod occupancy;
pub mod store;
pub mod voxel;

pub use merge::merge_occupied_dominant;
pub use occupancy::OccupancyGrid;
pub use store::{Evidence, StateCounts, VoxelStore};
pub use voxel::VoxelGrid;

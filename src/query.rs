//! Read-only extraction of classified voxels for export and evaluation.

use crate::grid::OccupancyGrid;
use crate::types::{Index, MapError, Point, VoxelState};

/// Voxel centers and their indices, in ascending index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Point>,
    pub indices: Vec<Index>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl OccupancyGrid {
    /// Centers and indices of every voxel in `state`.
    pub fn get_pointcloud(&self, state: VoxelState) -> Result<PointCloud, MapError> {
        let mut cloud = PointCloud::default();
        for index in self.store().indices_in_state(state) {
            cloud.points.push(self.index2point(index)?);
            cloud.indices.push(index);
        }
        Ok(cloud)
    }

    pub fn get_occupied_pointcloud(&self) -> Result<PointCloud, MapError> {
        self.get_pointcloud(VoxelState::Occupied)
    }

    pub fn get_free_pointcloud(&self) -> Result<PointCloud, MapError> {
        self.get_pointcloud(VoxelState::Free)
    }

    pub fn occupied_indices(&self) -> Vec<Index> {
        self.store().indices_in_state(VoxelState::Occupied).collect()
    }
}

//! The occupancy map: immutable geometry plus mutable voxel evidence.

use crate::grid::{StateCounts, VoxelStore, merge_occupied_dominant};
use crate::types::{Cell, Index, MapError, MapInfo, Point, VoxelState};

#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    store: VoxelStore,
}

impl OccupancyGrid {
    /// Allocate an empty map, every voxel unknown.
    pub fn new(info: MapInfo) -> Self {
        log::debug!(
            "allocating occupancy grid: dims {} ({} voxels) at {} m",
            info.dims(),
            info.voxel_count(),
            info.resolution()
        );
        Self {
            store: VoxelStore::new(info),
        }
    }

    pub fn info(&self) -> &MapInfo {
        self.store.info()
    }

    pub fn resolution(&self) -> f32 {
        self.info().resolution()
    }

    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut VoxelStore {
        &mut self.store
    }

    pub fn point2cell(&self, point: &Point) -> Result<Cell, MapError> {
        self.info().point2cell(point)
    }

    pub fn cell2point(&self, cell: &Cell) -> Result<Point, MapError> {
        self.info().cell2point(cell)
    }

    pub fn cell2index(&self, cell: &Cell) -> Result<Index, MapError> {
        self.info().cell2index(cell)
    }

    pub fn index2cell(&self, index: Index) -> Result<Cell, MapError> {
        self.info().index2cell(index)
    }

    pub fn index2point(&self, index: Index) -> Result<Point, MapError> {
        self.info().index2point(index)
    }

    pub fn point2index(&self, point: &Point) -> Result<Index, MapError> {
        self.info().point2index(point)
    }

    pub fn state(&self, index: Index) -> Result<VoxelState, MapError> {
        self.store.state(index)
    }

    pub fn state_at(&self, point: &Point) -> Result<VoxelState, MapError> {
        self.state(self.point2index(point)?)
    }

    pub fn counts(&self) -> StateCounts {
        self.store.counts()
    }

    /// Fold another map's evidence into this one, occupied evidence winning.
    pub fn merge(&mut self, other: &OccupancyGrid) -> Result<(), MapError> {
        merge_occupied_dominant(&mut self.store, &other.store)
    }

    /// Drop all evidence and start a new mapping session.
    pub fn clear(&mut self) {
        self.store.clear();
    }
}

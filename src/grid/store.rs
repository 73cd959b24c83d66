//! Per-voxel occupancy evidence.
//!
//! Each voxel carries a tri-state classification plus saturating hit and
//! pass-through counters. Occupied evidence dominates: once a voxel has been
//! marked occupied, free traversals only bump its pass counter until the
//! store is cleared.

use crate::grid::VoxelGrid;
use crate::types::{FREE, Index, MapError, MapInfo, OCCUPIED, UNKNOWN, VoxelState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evidence {
    pub state: i8,
    /// Rays that terminated in this voxel.
    pub hits: u16,
    /// Rays that passed through this voxel.
    pub passes: u16,
}

impl Default for Evidence {
    fn default() -> Self {
        Self {
            state: UNKNOWN,
            hits: 0,
            passes: 0,
        }
    }
}

impl Evidence {
    pub fn voxel_state(&self) -> VoxelState {
        VoxelState::from_raw(self.state)
    }
}

/// Totals of each voxel classification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StateCounts {
    pub unknown: usize,
    pub free: usize,
    pub occupied: usize,
}

#[derive(Debug, Clone)]
pub struct VoxelStore {
    voxels: VoxelGrid<Evidence>,
}

impl VoxelStore {
    /// Allocate a store with every voxel unknown.
    pub fn new(info: MapInfo) -> Self {
        Self {
            voxels: VoxelGrid::filled(info, Evidence::default()),
        }
    }

    pub fn info(&self) -> &MapInfo {
        self.voxels.info()
    }

    pub fn state(&self, index: Index) -> Result<VoxelState, MapError> {
        self.slot(index).map(|e| e.voxel_state())
    }

    pub fn hits(&self, index: Index) -> Result<u16, MapError> {
        self.slot(index).map(|e| e.hits)
    }

    pub fn passes(&self, index: Index) -> Result<u16, MapError> {
        self.slot(index).map(|e| e.passes)
    }

    /// Record a ray passing through the voxel. Occupied voxels stay occupied.
    pub fn mark_free(&mut self, index: Index) -> Result<VoxelState, MapError> {
        let voxel = self.slot_mut(index)?;
        voxel.passes = voxel.passes.saturating_add(1);
        if voxel.state != OCCUPIED {
            voxel.state = FREE;
        }
        Ok(voxel.voxel_state())
    }

    /// Record a ray terminating in the voxel.
    pub fn mark_occupied(&mut self, index: Index) -> Result<VoxelState, MapError> {
        let voxel = self.slot_mut(index)?;
        voxel.hits = voxel.hits.saturating_add(1);
        voxel.state = OCCUPIED;
        Ok(VoxelState::Occupied)
    }

    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for voxel in self.voxels.data() {
            match voxel.voxel_state() {
                VoxelState::Unknown => counts.unknown += 1,
                VoxelState::Free => counts.free += 1,
                VoxelState::Occupied => counts.occupied += 1,
            }
        }
        counts
    }

    /// Forget all evidence, starting a new mapping session.
    pub fn clear(&mut self) {
        self.voxels.fill(Evidence::default());
    }

    /// Indices of all voxels in `state`, ascending.
    pub fn indices_in_state(&self, state: VoxelState) -> impl Iterator<Item = Index> + '_ {
        self.voxels
            .data()
            .iter()
            .enumerate()
            .filter(move |(_, voxel)| voxel.voxel_state() == state)
            .map(|(idx, _)| Index(idx))
    }

    pub(crate) fn voxels(&self) -> &VoxelGrid<Evidence> {
        &self.voxels
    }

    pub(crate) fn voxels_mut(&mut self) -> &mut VoxelGrid<Evidence> {
        &mut self.voxels
    }

    fn slot(&self, index: Index) -> Result<&Evidence, MapError> {
        self.voxels
            .get(index)
            .ok_or_else(|| out_of_bounds(index, self.voxels.info().voxel_count()))
    }

    fn slot_mut(&mut self, index: Index) -> Result<&mut Evidence, MapError> {
        let count = self.voxels.info().voxel_count();
        self.voxels
            .get_mut(index)
            .ok_or_else(|| out_of_bounds(index, count))
    }
}

fn out_of_bounds(index: Index, count: usize) -> MapError {
    MapError::OutOfBounds(format!("index {} outside map of {count} voxels", index.0))
}

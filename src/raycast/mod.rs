//! Integrating sensor rays into the occupancy map.
//!
//! A ray from the sensor origin to a return marks every voxel it crosses as
//! free and the voxel containing the return as occupied. Returns beyond the
//! trusted range are shortened to that range and only clear space.

use glam::Vec3;

use crate::grid::OccupancyGrid;
use crate::sensor::Scan;
use crate::types::{Cell, Index, MapError, Point};

pub mod dda;
pub mod traversal;
mod utils;

pub use traversal::VoxelTraversal;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayHit {
    /// Grid cell that contains the first hit.
    pub cell: Cell,
    pub index: Index,
    /// Distance from the ray origin to the cell boundary hit (world units).
    pub hit_distance: f32,
}

impl RayHit {
    /// Extract hit distance, or return `default` if miss.
    pub fn distance_or(hit: Option<Self>, default: f32) -> f32 {
        hit.map(|h| h.hit_distance).unwrap_or(default)
    }
}

/// What a single [`OccupancyGrid::add_ray`] call recorded.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RayOutcome {
    /// Voxels marked free.
    pub free_cells: usize,
    /// Voxel marked occupied, if the return was trusted and inside the map.
    pub occupied: Option<Index>,
    /// The return lay beyond the trusted range and was shortened.
    pub trimmed: bool,
}

/// Totals for one sensor frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub rays: usize,
    pub trimmed: usize,
    pub occupied_marks: usize,
    pub free_marks: usize,
}

impl ScanSummary {
    fn record(&mut self, outcome: &RayOutcome) {
        self.rays += 1;
        self.trimmed += usize::from(outcome.trimmed);
        self.occupied_marks += usize::from(outcome.occupied.is_some());
        self.free_marks += outcome.free_cells;
    }
}

impl OccupancyGrid {
    /// Integrate one ray from `origin` to the sensor return `hit`.
    ///
    /// If `|hit - origin| > trimmed_range_max` the ray is shortened to
    /// `trimmed_range_max` and only marks free space. Voxels outside the map
    /// are skipped; a ray that never enters the map records nothing.
    pub fn add_ray(
        &mut self,
        origin: Point,
        hit: Point,
        trimmed_range_max: f32,
    ) -> Result<RayOutcome, MapError> {
        if !origin.is_finite() || !hit.is_finite() {
            return Err(MapError::OutOfBounds(format!(
                "ray endpoints must be finite, got {} -> {}",
                origin.0, hit.0
            )));
        }
        if !trimmed_range_max.is_finite() || trimmed_range_max <= 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "trimmed_range_max must be positive, got {trimmed_range_max}"
            )));
        }

        let length = origin.distance(&hit);
        if length == 0.0 {
            return Ok(RayOutcome::default());
        }

        let trimmed = length > trimmed_range_max;
        let end = if trimmed {
            log::trace!("ray of {length} m trimmed to {trimmed_range_max} m");
            origin.0 + (hit.0 - origin.0) * (trimmed_range_max / length)
        } else {
            hit.0
        };

        let mut outcome = RayOutcome {
            trimmed,
            ..Default::default()
        };

        let Some(traversal) = VoxelTraversal::new(self.info(), origin.0, end) else {
            log::trace!("ray {} -> {} does not enter the map", origin.0, end);
            return Ok(outcome);
        };
        let terminal_is_hit = !trimmed && traversal.reaches_end();

        let mut last: Option<Index> = None;
        for cell in traversal {
            let index = self.info().cell2index(&cell?)?;
            if let Some(prev) = last.replace(index) {
                self.store_mut().mark_free(prev)?;
                outcome.free_cells += 1;
            }
        }

        if let Some(index) = last {
            if terminal_is_hit {
                self.store_mut().mark_occupied(index)?;
                outcome.occupied = Some(index);
            } else {
                self.store_mut().mark_free(index)?;
                outcome.free_cells += 1;
            }
        }

        Ok(outcome)
    }

    /// Ordered in-map cells crossed by the segment `start -> end`, without
    /// touching the evidence.
    pub fn traverse(&self, start: Point, end: Point) -> Result<Vec<Cell>, MapError> {
        match VoxelTraversal::new(self.info(), start.0, end.0) {
            Some(traversal) => traversal.collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Integrate every return of one sensor frame.
    pub fn integrate_scan(
        &mut self,
        scan: &Scan,
        trimmed_range_max: f32,
    ) -> Result<ScanSummary, MapError> {
        let mut summary = ScanSummary::default();
        for hit in &scan.endpoints {
            let outcome = self.add_ray(scan.origin, *hit, trimmed_range_max)?;
            summary.record(&outcome);
        }
        log::debug!(
            "scan from {}: {} rays ({} trimmed), {} occupied marks, {} free marks",
            scan.origin.0,
            summary.rays,
            summary.trimmed,
            summary.occupied_marks,
            summary.free_marks
        );
        Ok(summary)
    }

    /// Unit direction and length of the segment `origin -> hit`.
    pub(crate) fn ray_direction(origin: Point, hit: Point) -> Option<(Vec3, f32)> {
        let delta = hit.0 - origin.0;
        let length = delta.length();
        (length > 0.0).then(|| (delta / length, length))
    }
}

//! Map metadata and the coordinate transform between world points, voxel
//! cells and flat storage indices.

use glam::{IVec3, UVec3, Vec3};

use crate::types::{Aabb, Cell, DIM_RELATIVE_TOLERANCE, Index, MapError, Point};

/// Immutable geometry of a voxel map.
///
/// Cells are laid out row-major with `k` fastest:
/// `index = i * dim_y * dim_z + j * dim_z + k`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    min: Vec3,
    max: Vec3,
    resolution: f32,
    dims: UVec3,
}

impl MapInfo {
    /// Build map geometry from world bounds and a voxel edge length.
    pub fn new(min: Vec3, max: Vec3, resolution: f32) -> Result<Self, MapError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "resolution must be positive, got {resolution}"
            )));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "map bounds must be finite, got min {min} max {max}"
            )));
        }
        if max.cmple(min).any() {
            return Err(MapError::InvalidConfig(format!(
                "map max {max} must exceed min {min} on every axis"
            )));
        }

        let cells = cell_counts((max - min) / resolution);
        if cells.cmpgt(Vec3::splat(u32::MAX as f32)).any() {
            return Err(MapError::InvalidConfig(format!(
                "map of {cells} cells is too large"
            )));
        }
        let dims = cells.max(Vec3::ONE).as_uvec3();

        let info = Self {
            min,
            max,
            resolution,
            dims,
        };
        if info.checked_voxel_count().is_none() {
            return Err(MapError::InvalidConfig(format!(
                "voxel count of {dims} overflows"
            )));
        }
        Ok(info)
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Number of cells along each axis.
    #[inline]
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    #[inline]
    pub fn max_dim(&self) -> u32 {
        self.dims.max_element()
    }

    /// Total number of voxels in the map.
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.dims.x as usize * self.dims.y as usize * self.dims.z as usize
    }

    fn checked_voxel_count(&self) -> Option<usize> {
        (self.dims.x as usize)
            .checked_mul(self.dims.y as usize)?
            .checked_mul(self.dims.z as usize)
    }

    /// Extent covered by the grid cells. This can reach slightly past `max`
    /// when the extent is not a multiple of the resolution.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.min, self.min + self.dims.as_vec3() * self.resolution)
    }

    #[inline]
    pub fn contains_cell(&self, cell: &Cell) -> bool {
        cell.0.cmplt(self.dims).all()
    }

    #[inline]
    pub fn contains_ivec(&self, cell: IVec3) -> bool {
        cell.cmpge(IVec3::ZERO).all() && cell.as_uvec3().cmplt(self.dims).all()
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        self.point2cell(point).is_ok()
    }

    /// Continuous grid coordinates, in cells, of a world position.
    #[inline]
    pub fn world_to_grid(&self, pos: Vec3) -> Vec3 {
        (pos - self.min) / self.resolution
    }

    /// Quantize a world point into the cell whose half-open extent contains it.
    pub fn point2cell(&self, point: &Point) -> Result<Cell, MapError> {
        let grid = self.world_to_grid(point.0).floor();
        if !grid.is_finite()
            || grid.cmplt(Vec3::ZERO).any()
            || grid.cmpge(self.dims.as_vec3()).any()
        {
            return Err(MapError::OutOfBounds(format!(
                "point {} outside map [{}, {})",
                point.0,
                self.min,
                self.bounds().max
            )));
        }
        Ok(Cell(grid.as_uvec3()))
    }

    /// Center of a cell in world coordinates.
    pub fn cell2point(&self, cell: &Cell) -> Result<Point, MapError> {
        self.check_cell(cell)?;
        Ok(Point(self.cell_center(cell.0)))
    }

    pub fn cell2index(&self, cell: &Cell) -> Result<Index, MapError> {
        self.check_cell(cell)?;
        Ok(Index(self.linearize(cell.0)))
    }

    pub fn index2cell(&self, index: Index) -> Result<Cell, MapError> {
        if index.0 >= self.voxel_count() {
            return Err(MapError::OutOfBounds(format!(
                "index {} outside map of {} voxels",
                index.0,
                self.voxel_count()
            )));
        }
        let plane = self.dims.y as usize * self.dims.z as usize;
        let dz = self.dims.z as usize;
        let i = index.0 / plane;
        let rem = index.0 % plane;
        Ok(Cell::new(i as u32, (rem / dz) as u32, (rem % dz) as u32))
    }

    pub fn index2point(&self, index: Index) -> Result<Point, MapError> {
        let cell = self.index2cell(index)?;
        self.cell2point(&cell)
    }

    pub fn point2index(&self, point: &Point) -> Result<Index, MapError> {
        let cell = self.point2cell(point)?;
        self.cell2index(&cell)
    }

    /// Linear offset of an in-bounds cell. Callers must check bounds first.
    #[inline]
    pub(crate) fn linearize(&self, cell: UVec3) -> usize {
        (cell.x as usize * self.dims.y as usize + cell.y as usize) * self.dims.z as usize
            + cell.z as usize
    }

    #[inline]
    pub(crate) fn cell_center(&self, cell: UVec3) -> Vec3 {
        self.min + (cell.as_vec3() + Vec3::splat(0.5)) * self.resolution
    }

    fn check_cell(&self, cell: &Cell) -> Result<(), MapError> {
        if self.contains_cell(cell) {
            Ok(())
        } else {
            Err(MapError::OutOfBounds(format!(
                "cell {} outside map dims {}",
                cell.0, self.dims
            )))
        }
    }
}

/// `ceil` per axis, except that values within float noise of a whole number
/// snap to it.
fn cell_counts(extent: Vec3) -> Vec3 {
    let nearest = extent.round();
    let noise = (extent - nearest).abs().cmple(nearest * DIM_RELATIVE_TOLERANCE);
    Vec3::select(noise, nearest, extent.ceil())
}

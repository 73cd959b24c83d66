use glam::{UVec3, Vec3};

use crate::grid::OccupancyGrid;
use crate::raycast::{RayHit, VoxelTraversal};
use crate::types::{Aabb, MapError, Point, VoxelState};

impl OccupancyGrid {
    /// Walk the mapped evidence from `origin` along `dir` and return the first
    /// occupied voxel within `max_range` meters.
    pub fn raycast_dda(
        &self,
        origin: Point,
        dir: Vec3,
        max_range: f32,
    ) -> Result<Option<RayHit>, MapError> {
        if dir.length_squared() == 0.0 || max_range <= 0.0 {
            return Ok(None);
        }

        let dir = dir.normalize();
        let end = Point(origin.0 + dir * max_range);
        let Some(traversal) = VoxelTraversal::new(self.info(), origin.0, end.0) else {
            return Ok(None);
        };

        for cell in traversal {
            let cell = cell?;
            let index = self.info().cell2index(&cell)?;
            if self.state(index)? != VoxelState::Occupied {
                continue;
            }

            let hit_distance = self.entry_distance(origin, end, &cell.0);
            return Ok(Some(RayHit {
                cell,
                index,
                hit_distance,
            }));
        }

        Ok(None)
    }

    /// Distance from `origin` to where the segment enters the given cell.
    fn entry_distance(&self, origin: Point, end: Point, cell: &UVec3) -> f32 {
        let Some((dir, length)) = Self::ray_direction(origin, end) else {
            return 0.0;
        };
        let info = self.info();
        let lo = info.min() + cell.as_vec3() * info.resolution();
        let voxel = Aabb::new(lo, lo + Vec3::splat(info.resolution()));
        voxel
            .clip_ray(origin.0, dir, length)
            .map(|(t_enter, _)| t_enter)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::types::{Cell, MapInfo};

    fn test_grid(occupied: Option<Cell>, resolution: f32, origin: Vec3) -> OccupancyGrid {
        let info = MapInfo::new(origin, origin + Vec3::splat(5.0 * resolution), resolution)
            .expect("grid should build");
        let mut grid = OccupancyGrid::new(info);
        if let Some(cell) = occupied {
            let index = grid.cell2index(&cell).unwrap();
            grid.store_mut().mark_occupied(index).unwrap();
        }
        grid
    }

    #[test]
    fn hit_positive() {
        let goal = Cell::new(4, 1, 0);
        let grid = test_grid(Some(goal), 1.0, Vec3::ZERO);
        let dir = Vec3::new(4.0, 1.0, 0.0);

        let hit = grid
            .raycast_dda(Point::new(0.0, 0.0, 0.5), dir, 30.0)
            .unwrap()
            .expect("hit expected");
        assert_eq!(hit.cell, goal);
        assert_relative_eq!(hit.hit_distance, 4.1231055, epsilon = 1e-4);
    }

    #[test]
    fn miss() {
        let grid = test_grid(None, 1.0, Vec3::ZERO);
        let dir = Vec3::new(6.0, 1.0, 0.0);
        let hit = grid.raycast_dda(Point::new(0.0, 0.0, 0.5), dir, 30.0).unwrap();
        assert!(hit.is_none());
        assert_eq!(RayHit::distance_or(hit, 30.0), 30.0);
    }

    #[test]
    fn hit_negative_x() {
        let goal = Cell::new(0, 1, 2);
        let grid = test_grid(Some(goal), 1.0, Vec3::ZERO);
        let dir = Vec3::new(-3.9, 1.0, 0.0);
        let hit = grid
            .raycast_dda(Point::new(4.0, 0.0, 2.5), dir, 30.0)
            .unwrap()
            .expect("hit expected");
        assert_eq!(hit.cell, goal);
        assert_relative_eq!(hit.hit_distance, 4.026176, epsilon = 1e-4);
    }

    #[test]
    fn resolution_with_offset() {
        let goal = Cell::new(2, 4, 0);
        let grid = test_grid(Some(goal), 0.05, Vec3::new(-0.18, 0.0, 0.0));
        let dir = Vec3::new(-1.0, 2.0, 0.0);
        let hit = grid
            .raycast_dda(Point::new(0.04, 0.0, 0.01), dir, 30.0)
            .unwrap()
            .expect("hit expected");
        assert_eq!(hit.cell, goal);
        assert_relative_eq!(hit.hit_distance, 0.2236068, epsilon = 1e-4);
    }

    #[test]
    fn out_of_range_is_miss() {
        let grid = test_grid(Some(Cell::new(4, 0, 0)), 1.0, Vec3::ZERO);
        let hit = grid
            .raycast_dda(Point::new(0.5, 0.5, 0.5), Vec3::X, 2.0)
            .unwrap();
        assert!(hit.is_none());
    }
}

use glam::{IVec3, Vec3};

use crate::raycast::utils::axis_params;
use crate::types::{Aabb, Cell, MIN_TRAVERSAL_LIMIT, MapError, MapInfo};

/// Fast voxel traversal (Amanatides & Woo) over the part of a segment that
/// lies inside the map.
///
/// The segment is first clipped against the map volume, so every yielded cell
/// is in bounds. Each step advances exactly one axis and never moves an axis
/// past the end cell, which makes the walk finish in exactly
/// `|di| + |dj| + |dk|` steps. A step counter still guards against geometry
/// bugs: exceeding `3 * max(dims)` yields [`MapError::TraversalLimit`].
#[derive(Debug, Clone)]
pub struct VoxelTraversal {
    /// Current cell being processed.
    cell: IVec3,
    end: IVec3,
    /// Unit step direction along each axis.
    step: IVec3,
    /// Segment parameter at which each axis crosses its next cell boundary.
    t_max: Vec3,
    /// Segment parameter between two boundaries along each axis.
    t_delta: Vec3,
    steps: usize,
    limit: usize,
    emit_start: bool,
    done: bool,
    reaches_end: bool,
}

impl VoxelTraversal {
    /// Traverse from `start` to `end` (world coordinates).
    ///
    /// Returns `None` for a zero-length segment or one that never enters the
    /// map volume.
    pub fn new(info: &MapInfo, start: Vec3, end: Vec3) -> Option<Self> {
        let limit = (3 * info.max_dim() as usize).max(MIN_TRAVERSAL_LIMIT);
        Self::with_limit(info, start, end, limit)
    }

    pub(crate) fn with_limit(
        info: &MapInfo,
        start: Vec3,
        end: Vec3,
        limit: usize,
    ) -> Option<Self> {
        let g_start = info.world_to_grid(start);
        let g_end = info.world_to_grid(end);
        let dir = g_end - g_start;
        if dir.length_squared() == 0.0 || !dir.is_finite() {
            return None;
        }

        let dims = info.dims();
        let extent = dims.as_vec3();
        // The slab test accepts a parallel segment lying on an upper face,
        // which is outside the half-open volume.
        for axis in 0..3 {
            if dir[axis] == 0.0 && (g_start[axis] < 0.0 || g_start[axis] >= extent[axis]) {
                return None;
            }
        }

        let volume = Aabb::new(Vec3::ZERO, extent);
        let (t_enter, t_exit) = volume.clip_ray(g_start, dir, 1.0)?;
        if t_exit <= t_enter {
            // A start on a lower face heading outward still crosses its own
            // cell; anything else only grazes a corner or face.
            let start_cell = g_start.floor().as_ivec3();
            if !info.contains_ivec(start_cell) {
                return None;
            }
            return Some(Self::single_cell(start_cell, limit));
        }

        let a = if t_enter > 0.0 {
            g_start + dir * t_enter
        } else {
            g_start
        };
        let reaches_end = t_exit >= 1.0;
        let b = if reaches_end {
            g_end
        } else {
            g_start + dir * t_exit
        };

        // Points on the upper faces floor to `dims`; pull them back inside.
        let max_cell = dims.as_ivec3() - IVec3::ONE;
        let cell = a.floor().as_ivec3().clamp(IVec3::ZERO, max_cell);
        let end_cell = b.floor().as_ivec3().clamp(IVec3::ZERO, max_cell);
        // A hit on an upper face lies outside the map even though the clipped
        // segment touches it.
        let reaches_end = reaches_end && info.contains_ivec(g_end.floor().as_ivec3());

        let step = (end_cell - cell).signum();
        let seg = b - a;
        let (t_delta_x, t_max_x) = axis_params(a.x, seg.x, cell.x, step.x);
        let (t_delta_y, t_max_y) = axis_params(a.y, seg.y, cell.y, step.y);
        let (t_delta_z, t_max_z) = axis_params(a.z, seg.z, cell.z, step.z);

        Some(Self {
            cell,
            end: end_cell,
            step,
            t_max: Vec3::new(t_max_x, t_max_y, t_max_z),
            t_delta: Vec3::new(t_delta_x, t_delta_y, t_delta_z),
            steps: 0,
            limit,
            emit_start: true,
            done: false,
            reaches_end,
        })
    }

    /// Walk that yields only `cell` and never reaches the end point.
    fn single_cell(cell: IVec3, limit: usize) -> Self {
        Self {
            cell,
            end: cell,
            step: IVec3::ZERO,
            t_max: Vec3::INFINITY,
            t_delta: Vec3::INFINITY,
            steps: 0,
            limit,
            emit_start: true,
            done: false,
            reaches_end: false,
        }
    }

    /// Whether the segment's end point lies inside the map, i.e. the last
    /// yielded cell is the end point's own cell.
    pub fn reaches_end(&self) -> bool {
        self.reaches_end
    }

    /// Number of cells the traversal will yield in total.
    pub fn cell_count(&self) -> usize {
        (self.end - self.cell).abs().element_sum() as usize + 1
    }

    fn advance(&mut self) -> Option<usize> {
        let mut axis = None;
        let mut best = f32::INFINITY;
        for a in 0..3 {
            if self.cell[a] == self.end[a] {
                continue;
            }
            if axis.is_none() || self.t_max[a] < best {
                axis = Some(a);
                best = self.t_max[a];
            }
        }
        let a = axis?;
        self.cell[a] += self.step[a];
        self.t_max[a] += self.t_delta[a];
        Some(a)
    }
}

impl Iterator for VoxelTraversal {
    type Item = Result<Cell, MapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.emit_start {
            self.emit_start = false;
            return Some(Ok(Cell(self.cell.as_uvec3())));
        }

        if self.cell == self.end {
            self.done = true;
            return None;
        }

        self.steps += 1;
        if self.steps > self.limit {
            self.done = true;
            log::error!(
                "voxel traversal exceeded {} steps at cell {} (end {})",
                self.limit,
                self.cell,
                self.end
            );
            return Some(Err(MapError::TraversalLimit {
                steps: self.steps,
                limit: self.limit,
            }));
        }

        self.advance()?;
        Some(Ok(Cell(self.cell.as_uvec3())))
    }
}

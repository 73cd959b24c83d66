//! Strongly typed coordinate spaces and simple volumes used across the map APIs.
//!
//! World positions, grid cells and flat storage offsets are distinct types so
//! they cannot be mixed up by accident. Conversions between them live on
//! [`MapInfo`](crate::types::MapInfo) because they depend on the map geometry.

use glam::{UVec3, Vec3};

use crate::types::{FREE, OCCUPIED, UNKNOWN};

/// Continuous position in world coordinates (meters).
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Point(pub Vec3);

impl Point {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.0.z
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        self.0.distance(other.0)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl From<Vec3> for Point {
    fn from(value: Vec3) -> Self {
        Self(value)
    }
}

/// Discrete voxel coordinate `(i, j, k)`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(pub UVec3);

impl Cell {
    pub const fn new(i: u32, j: u32, k: u32) -> Self {
        Self(UVec3::new(i, j, k))
    }
}

impl From<UVec3> for Cell {
    fn from(value: UVec3) -> Self {
        Self(value)
    }
}

/// Flat storage offset of a voxel.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(pub usize);

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Classification of a single voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoxelState {
    Unknown,
    Free,
    Occupied,
}

impl VoxelState {
    /// Raw storage value of this state.
    pub fn raw(self) -> i8 {
        match self {
            Self::Unknown => UNKNOWN,
            Self::Free => FREE,
            Self::Occupied => OCCUPIED,
        }
    }

    /// Interpret a raw storage value. Anything at or above [`OCCUPIED`] is
    /// occupied, other non-negative values are free.
    pub fn from_raw(value: i8) -> Self {
        if value >= OCCUPIED {
            Self::Occupied
        } else if value >= FREE {
            Self::Free
        } else {
            Self::Unknown
        }
    }
}

/// World-axis-aligned box in meters.
/// Convention: [min, max) on every axis for containment tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmplt(self.max).all()
    }

    /// Slab test of the ray `origin + t * dir` against the box.
    ///
    /// Returns the parametric interval `[t_enter, t_exit]` clamped to
    /// `[0, t_end]`, or `None` when that part of the ray misses the box.
    /// `dir` does not need to be normalized; `t` is measured in units of `dir`.
    pub fn clip_ray(&self, origin: Vec3, dir: Vec3, t_end: f32) -> Option<(f32, f32)> {
        let mut t_enter = 0.0f32;
        let mut t_exit = t_end;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            if d == 0.0 {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t_a = (self.min[axis] - o) * inv;
            let mut t_b = (self.max[axis] - o) * inv;
            if t_a > t_b {
                std::mem::swap(&mut t_a, &mut t_b);
            }

            t_enter = t_enter.max(t_a);
            t_exit = t_exit.min(t_b);
            if t_enter > t_exit {
                return None;
            }
        }

        Some((t_enter, t_exit))
    }
}

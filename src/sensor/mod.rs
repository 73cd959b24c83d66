//! Sensor-side interface of the mapper.
//!
//! The mapper does not simulate sensors itself. Anything that can turn a
//! platform pose into world-frame returns implements [`RaySource`]; the
//! circular sweep driver then feeds those returns into an [`OccupancyGrid`].

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Quat, Vec3};

use crate::grid::OccupancyGrid;
use crate::raycast::ScanSummary;
use crate::types::{MapError, Point};

pub mod synthetic;

pub use synthetic::{DepthCamera, SyntheticScene, SyntheticSensor};

/// Platform pose in world coordinates (meters, radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose3 {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose3 {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose3 {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Build a pose from ZYX Euler angles (yaw about Z, then pitch, then roll).
    pub fn from_euler_zyx(position: Vec3, yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::new(position, Quat::from_euler(EulerRot::ZYX, yaw, pitch, roll))
    }

    /// Map a point from the body frame into the world frame.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * p + self.position
    }

    /// Rotate a body-frame direction into the world frame.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }
}

/// One sensor frame: the sensor origin and every world-frame return.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scan {
    pub origin: Point,
    pub endpoints: Vec<Point>,
}

/// Given a pose, produce a set of world-frame intersection points.
pub trait RaySource {
    fn scan(&self, pose: &Pose3) -> Scan;
}

/// Poses evenly spaced on a circle in the XY plane at `height`, each yawed to
/// face the circle's center.
pub fn circle_inward_poses(radius: f32, count: usize, height: f32) -> Vec<Pose3> {
    (0..count)
        .map(|i| {
            let theta = TAU * i as f32 / count as f32;
            let position = Vec3::new(radius * theta.cos(), radius * theta.sin(), height);
            Pose3::from_euler_zyx(position, theta + PI, 0.0, 0.0)
        })
        .collect()
}

/// Scan from every pose in order and integrate the returns.
pub fn map_sweep<S: RaySource + ?Sized>(
    grid: &mut OccupancyGrid,
    source: &S,
    poses: &[Pose3],
    trimmed_range_max: f32,
) -> Result<ScanSummary, MapError> {
    let mut total = ScanSummary::default();
    for pose in poses {
        let scan = source.scan(pose);
        let summary = grid.integrate_scan(&scan, trimmed_range_max)?;
        total.rays += summary.rays;
        total.trimmed += summary.trimmed;
        total.occupied_marks += summary.occupied_marks;
        total.free_marks += summary.free_marks;
    }

    let counts = grid.counts();
    log::info!(
        "sweep of {} poses: {} rays ({} trimmed), {} occupied / {} free voxels",
        poses.len(),
        total.rays,
        total.trimmed,
        counts.occupied,
        counts.free
    );
    Ok(total)
}

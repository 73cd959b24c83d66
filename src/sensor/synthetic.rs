//! Analytic stand-in for a mesh-based depth sensor.
//!
//! The scene is a set of axis-aligned boxes plus an optional horizontal floor.
//! The camera casts a regular grid of rays over its field of view, looking
//! along the body +X axis, and reports the nearest intersection of each ray
//! that lands within range. Rays that hit nothing produce no return.

use glam::Vec3;

use crate::loaders::DepthCameraConfig;
use crate::sensor::{Pose3, RaySource, Scan};
use crate::types::{Aabb, Point};

#[derive(Debug, Clone, Default)]
pub struct SyntheticScene {
    pub boxes: Vec<Aabb>,
    /// Height of an infinite floor plane, if any.
    pub floor: Option<f32>,
}

impl SyntheticScene {
    pub fn new(boxes: Vec<Aabb>, floor: Option<f32>) -> Self {
        Self { boxes, floor }
    }

    /// A floor with a central block, two pillars and a low wall, sized for a
    /// sweep of radius 14 m.
    pub fn demo() -> Self {
        Self::new(
            vec![
                Aabb::new(Vec3::new(-3.0, -3.0, 0.0), Vec3::new(3.0, 3.0, 6.0)),
                Aabb::new(Vec3::new(5.0, -6.0, 0.0), Vec3::new(6.0, -5.0, 8.0)),
                Aabb::new(Vec3::new(-7.0, 4.0, 0.0), Vec3::new(-6.0, 5.0, 8.0)),
                Aabb::new(Vec3::new(-2.0, -9.0, 0.0), Vec3::new(4.0, -8.5, 2.5)),
            ],
            Some(0.0),
        )
    }

    /// Distance along the unit direction `dir` to the nearest surface within
    /// `max_range`.
    pub fn intersect(&self, origin: Vec3, dir: Vec3, max_range: f32) -> Option<f32> {
        let mut nearest: Option<f32> = None;
        let mut consider = |t: f32| {
            if t > 0.0 && t <= max_range && nearest.is_none_or(|n| t < n) {
                nearest = Some(t);
            }
        };

        for b in &self.boxes {
            if b.contains(origin) {
                continue;
            }
            if let Some((t_enter, _)) = b.clip_ray(origin, dir, max_range) {
                consider(t_enter);
            }
        }

        if let Some(height) = self.floor {
            if dir.z < 0.0 && origin.z > height {
                consider((height - origin.z) / dir.z);
            }
        }

        nearest
    }
}

/// Pinhole-style ray fan of a depth camera mounted on the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthCamera {
    pub rows: u32,
    pub cols: u32,
    pub horizontal_fov: f32,
    pub vertical_fov: f32,
    pub range_max: f32,
    /// Camera position in the body frame.
    pub offset: Vec3,
}

impl DepthCamera {
    /// Unit ray directions in the body frame, row by row from the top.
    pub fn directions(&self) -> Vec<Vec3> {
        let mut dirs = Vec::with_capacity((self.rows * self.cols) as usize);
        for r in 0..self.rows {
            let elevation = self.vertical_fov * (0.5 - (r as f32 + 0.5) / self.rows as f32);
            for c in 0..self.cols {
                let azimuth = self.horizontal_fov * (0.5 - (c as f32 + 0.5) / self.cols as f32);
                dirs.push(Vec3::new(
                    elevation.cos() * azimuth.cos(),
                    elevation.cos() * azimuth.sin(),
                    elevation.sin(),
                ));
            }
        }
        dirs
    }
}

impl From<&DepthCameraConfig> for DepthCamera {
    fn from(config: &DepthCameraConfig) -> Self {
        Self {
            rows: config.rows,
            cols: config.cols,
            horizontal_fov: config.horizontal_fov,
            vertical_fov: config.vertical_fov,
            range_max: config.range_max,
            offset: Vec3::from_array(config.offset),
        }
    }
}

/// A depth camera observing a [`SyntheticScene`].
#[derive(Debug, Clone)]
pub struct SyntheticSensor {
    scene: SyntheticScene,
    camera: DepthCamera,
    directions: Vec<Vec3>,
}

impl SyntheticSensor {
    pub fn new(scene: SyntheticScene, camera: DepthCamera) -> Self {
        let directions = camera.directions();
        Self {
            scene,
            camera,
            directions,
        }
    }

    pub fn camera(&self) -> &DepthCamera {
        &self.camera
    }

    pub fn scene(&self) -> &SyntheticScene {
        &self.scene
    }
}

impl RaySource for SyntheticSensor {
    fn scan(&self, pose: &Pose3) -> Scan {
        let origin = pose.transform_point(self.camera.offset);
        let endpoints = self
            .directions
            .iter()
            .filter_map(|d| {
                let dir = pose.transform_vector(*d);
                self.scene
                    .intersect(origin, dir, self.camera.range_max)
                    .map(|t| Point(origin + dir * t))
            })
            .collect();

        Scan {
            origin: Point(origin),
            endpoints,
        }
    }
}

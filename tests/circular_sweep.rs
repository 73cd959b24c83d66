use std::collections::HashSet;
use std::path::Path;

use glam::Vec3;

use voxel_occupancy::sensor::{
    DepthCamera, SyntheticScene, SyntheticSensor, circle_inward_poses, map_sweep,
};
use voxel_occupancy::{
    Index, MapConfig, OccupancyGrid, Point, Pose3, RaySource, VoxelState, load_config,
};

const CIRCLE_RADIUS_M: f32 = 14.0;
const NUM_WAYPOINTS: usize = 20;
const HEIGHT_OFFSET_M: f32 = 5.0;

fn config() -> MapConfig {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    load_config(manifest_dir.join("tests/fixtures/sweep.yaml")).expect("config should load")
}

fn sensor(config: &MapConfig) -> SyntheticSensor {
    SyntheticSensor::new(
        SyntheticScene::demo(),
        DepthCamera::from(&config.depth_camera),
    )
}

fn poses() -> Vec<Pose3> {
    circle_inward_poses(CIRCLE_RADIUS_M, NUM_WAYPOINTS, HEIGHT_OFFSET_M)
}

/// Occupied and free voxels found by sampling every ray densely instead of
/// walking voxel boundaries.
struct Reference {
    occupied: HashSet<Index>,
    free: HashSet<Index>,
}

fn sampled_reference(
    grid: &OccupancyGrid,
    source: &impl RaySource,
    poses: &[Pose3],
    trimmed_range_max: f32,
) -> Reference {
    let step = grid.resolution() / 50.0;
    let mut occupied = HashSet::new();
    let mut seen_free = HashSet::new();

    for pose in poses {
        let scan = source.scan(pose);
        let origin = scan.origin.0;
        for hit in &scan.endpoints {
            let length = origin.distance(hit.0);
            if length == 0.0 {
                continue;
            }
            let trimmed = length > trimmed_range_max;
            let end = if trimmed {
                origin + (hit.0 - origin) * (trimmed_range_max / length)
            } else {
                hit.0
            };

            let samples = ((origin.distance(end) / step).ceil() as usize).max(1);
            let mut last = None;
            for s in 0..=samples {
                let p = origin.lerp(end, s as f32 / samples as f32);
                if let Ok(index) = grid.point2index(&Point(p)) {
                    if last.replace(index) != Some(index) {
                        seen_free.insert(index);
                    }
                }
            }
            if !trimmed {
                if let Ok(index) = grid.point2index(hit) {
                    occupied.insert(index);
                }
            }
        }
    }

    let free = seen_free.difference(&occupied).copied().collect();
    Reference { occupied, free }
}

fn jaccard(a: &HashSet<Index>, b: &HashSet<Index>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn state_set(grid: &OccupancyGrid, state: VoxelState) -> HashSet<Index> {
    grid.get_pointcloud(state)
        .expect("cloud should build")
        .indices
        .into_iter()
        .collect()
}

/// Distance from `p` to the nearest surface of the demo scene.
fn surface_distance(scene: &SyntheticScene, p: Vec3) -> f32 {
    let mut best = scene.floor.map_or(f32::INFINITY, |h| (p.z - h).abs());
    for b in &scene.boxes {
        let d = if b.contains(p) {
            (p - b.min).min(b.max - p).min_element()
        } else {
            (b.min - p).max(p - b.max).max(Vec3::ZERO).length()
        };
        best = best.min(d);
    }
    best
}

#[test]
fn sweep_matches_sampled_reference() {
    let config = config();
    let trimmed_range_max = config.depth_camera.trimmed_range_max;
    let sensor = sensor(&config);
    let poses = poses();
    let mut grid = config.build_grid().unwrap();

    let summary = map_sweep(&mut grid, &sensor, &poses, trimmed_range_max).unwrap();
    assert!(summary.rays > 0);
    assert!(summary.trimmed > 0);
    assert!(summary.occupied_marks > 0);

    let reference = sampled_reference(&grid, &sensor, &poses, trimmed_range_max);
    let occupied = state_set(&grid, VoxelState::Occupied);
    let free = state_set(&grid, VoxelState::Free);

    let occupied_score = jaccard(&occupied, &reference.occupied);
    let free_score = jaccard(&free, &reference.free);
    let score = 0.5 * occupied_score + 0.5 * free_score;
    assert!(
        score >= 0.9,
        "score {score:.3} (occupied {occupied_score:.3}, free {free_score:.3})"
    );
}

#[test]
fn occupied_voxels_sit_on_surfaces() {
    let config = config();
    let sensor = sensor(&config);
    let mut grid = config.build_grid().unwrap();
    map_sweep(
        &mut grid,
        &sensor,
        &poses(),
        config.depth_camera.trimmed_range_max,
    )
    .unwrap();

    let cloud = grid.get_occupied_pointcloud().unwrap();
    assert!(!cloud.is_empty());
    let tolerance = grid.resolution() * 3.0f32.sqrt() / 2.0 + 1e-3;
    for point in &cloud.points {
        let d = surface_distance(sensor.scene(), point.0);
        assert!(d <= tolerance, "occupied voxel at {:?} is {d} m off", point.0);
    }

    // Interior of the central block is never observed.
    let inside = grid.state_at(&Point::new(0.25, 0.25, 3.25)).unwrap();
    assert_eq!(inside, VoxelState::Unknown);

    // Every sensor position lies in cleared space.
    for pose in poses() {
        let state = grid.state_at(&Point(pose.position)).unwrap();
        assert_eq!(state, VoxelState::Free);
    }
}

#[test]
fn merged_halves_equal_single_sweep() {
    let config = config();
    let trimmed_range_max = config.depth_camera.trimmed_range_max;
    let sensor = sensor(&config);
    let poses = poses();
    let (first, second) = poses.split_at(poses.len() / 2);

    let mut whole = config.build_grid().unwrap();
    map_sweep(&mut whole, &sensor, &poses, trimmed_range_max).unwrap();

    let mut merged = config.build_grid().unwrap();
    map_sweep(&mut merged, &sensor, first, trimmed_range_max).unwrap();
    let mut other = config.build_grid().unwrap();
    map_sweep(&mut other, &sensor, second, trimmed_range_max).unwrap();
    merged.merge(&other).unwrap();

    assert_eq!(merged.counts(), whole.counts());
    assert_eq!(merged.occupied_indices(), whole.occupied_indices());
    assert_eq!(
        state_set(&merged, VoxelState::Free),
        state_set(&whole, VoxelState::Free)
    );
}

#[test]
fn repeated_sweep_keeps_occupied_voxels() {
    let config = config();
    let trimmed_range_max = config.depth_camera.trimmed_range_max;
    let sensor = sensor(&config);
    let mut grid = config.build_grid().unwrap();

    map_sweep(&mut grid, &sensor, &poses(), trimmed_range_max).unwrap();
    let before = grid.occupied_indices();

    // A second lap at a different height crosses many earlier hits.
    let lower = circle_inward_poses(CIRCLE_RADIUS_M, NUM_WAYPOINTS, 1.5);
    map_sweep(&mut grid, &sensor, &lower, trimmed_range_max).unwrap();
    let after: HashSet<Index> = grid.occupied_indices().into_iter().collect();

    assert!(before.iter().all(|index| after.contains(index)));
}

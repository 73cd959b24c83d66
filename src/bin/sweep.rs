use std::error::Error;

use voxel_occupancy::load_config;
use voxel_occupancy::sensor::{DepthCamera, SyntheticScene, SyntheticSensor};
use voxel_occupancy::sensor::{circle_inward_poses, map_sweep};

const CIRCLE_RADIUS_M: f32 = 14.0;
const NUM_WAYPOINTS: usize = 20;
const HEIGHT_OFFSET_M: f32 = 5.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args();
    let _binary = args.next();
    let yaml_path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: sweep <config.yaml>");
            return Ok(());
        }
    };

    let config = load_config(&yaml_path)?;
    let mut grid = config.build_grid()?;
    let sensor = SyntheticSensor::new(
        SyntheticScene::demo(),
        DepthCamera::from(&config.depth_camera),
    );
    let poses = circle_inward_poses(CIRCLE_RADIUS_M, NUM_WAYPOINTS, HEIGHT_OFFSET_M);

    let summary = map_sweep(
        &mut grid,
        &sensor,
        &poses,
        config.depth_camera.trimmed_range_max,
    )?;

    let occupied = grid.get_occupied_pointcloud()?;
    let free = grid.get_free_pointcloud()?;
    println!(
        "rays: {} ({} trimmed), occupied voxels: {}, free voxels: {}",
        summary.rays,
        summary.trimmed,
        occupied.len(),
        free.len()
    );

    Ok(())
}

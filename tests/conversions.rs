use std::path::Path;

use glam::UVec3;

use voxel_occupancy::{Cell, Index, MapError, OccupancyGrid, Point, load_occupancy_grid};

fn fixture_grid() -> OccupancyGrid {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let yaml_path = manifest_dir.join("tests/fixtures/map.yaml");
    load_occupancy_grid(&yaml_path).expect("grid should load")
}

#[test]
fn fixture_dimensions() {
    let grid = fixture_grid();
    assert_eq!(grid.info().dims(), UVec3::new(200, 200, 100));
    assert_eq!(grid.info().voxel_count(), 4_000_000);
}

#[test]
fn first_reference_voxel() {
    let grid = fixture_grid();
    let cell = Cell::new(0, 14, 44);
    let index = Index(1444);

    assert_eq!(grid.cell2index(&cell).unwrap(), index);
    assert_eq!(grid.index2cell(index).unwrap(), cell);
    assert_eq!(grid.index2point(index).unwrap(), Point::new(-28.0, -35.0, 20.0));
    assert_eq!(grid.point2index(&Point::new(-28.0, -35.0, 20.0)).unwrap(), index);
}

#[test]
fn second_reference_voxel() {
    let grid = fixture_grid();
    let cell = Cell::new(75, 123, 45);
    let index = Index(1512345);

    assert_eq!(grid.cell2index(&cell).unwrap(), index);
    assert_eq!(grid.index2cell(index).unwrap(), cell);

    let center = grid.index2point(index).unwrap();
    assert_eq!(center, Point::new(9.5, 19.5, 20.5));
    assert_eq!(grid.point2index(&center).unwrap(), index);
    // Any point inside the voxel quantizes to the same index.
    assert_eq!(grid.point2index(&Point::new(9.3, 19.7, 20.26)).unwrap(), index);
}

#[test]
fn corner_voxels() {
    let grid = fixture_grid();
    let last = Index(grid.info().voxel_count() - 1);
    assert_eq!(grid.index2cell(last).unwrap(), Cell::new(199, 199, 99));
    assert_eq!(grid.index2point(last).unwrap(), Point::new(71.5, 57.5, 47.5));
    assert_eq!(grid.index2point(Index(0)).unwrap(), Point::new(-28.0, -42.0, -2.0));
}

#[test]
fn sampled_round_trips() {
    let grid = fixture_grid();
    let count = grid.info().voxel_count();
    for raw in (0..count).step_by(7919) {
        let index = Index(raw);
        let cell = grid.index2cell(index).unwrap();
        assert_eq!(grid.cell2index(&cell).unwrap(), index);
        let center = grid.cell2point(&cell).unwrap();
        assert_eq!(grid.point2cell(&center).unwrap(), cell);
    }
}

#[test]
fn out_of_range_values_are_errors() {
    let grid = fixture_grid();
    assert!(matches!(
        grid.index2cell(Index(4_000_000)),
        Err(MapError::OutOfBounds(_))
    ));
    assert!(matches!(
        grid.cell2index(&Cell::new(0, 200, 0)),
        Err(MapError::OutOfBounds(_))
    ));
    assert!(matches!(
        grid.point2cell(&Point::new(-28.3, 0.0, 0.0)),
        Err(MapError::OutOfBounds(_))
    ));
    assert!(matches!(
        grid.point2index(&Point::new(0.0, 57.75, 0.0)),
        Err(MapError::OutOfBounds(_))
    ));
}

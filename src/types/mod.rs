pub mod constants;
pub mod error;
pub mod geometry;
pub mod info;

pub use constants::*;
pub use error::MapError;
pub use geometry::{Aabb, Cell, Index, Point, VoxelState};
pub use info::MapInfo;

use crate::types::{Index, MapInfo};

/// Dense row-major 3D storage, one `T` per voxel.
#[derive(Debug, Clone)]
pub struct VoxelGrid<T> {
    info: MapInfo,
    data: Vec<T>,
}

impl<T: Clone> VoxelGrid<T> {
    pub fn filled(info: MapInfo, value: T) -> Self {
        let data = vec![value; info.voxel_count()];
        Self { info, data }
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> VoxelGrid<T> {
    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn get(&self, index: Index) -> Option<&T> {
        self.data.get(index.0)
    }

    pub fn get_mut(&mut self, index: Index) -> Option<&mut T> {
        self.data.get_mut(index.0)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

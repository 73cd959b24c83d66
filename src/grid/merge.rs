//! Merge policy for folding one evidence store into another.
//!
//! **Assumption:** `master` and `source` share the same [`MapInfo`](crate::types::MapInfo)
//! so that index `i` names the same voxel in both stores.

use crate::grid::VoxelStore;
use crate::types::MapError;

/// Merges source into master with occupied-wins semantics.
///
/// The raw states are ordered `UNKNOWN < FREE < OCCUPIED`, so taking the
/// maximum keeps any occupied voxel occupied and never lets unknown overwrite
/// known evidence. Counters are summed (saturating). The result does not depend
/// on which store is the master.
pub fn merge_occupied_dominant(
    master: &mut VoxelStore,
    source: &VoxelStore,
) -> Result<(), MapError> {
    if master.info() != source.info() {
        return Err(MapError::InvalidConfig(format!(
            "cannot merge stores with different geometry ({} vs {})",
            master.info().dims(),
            source.info().dims()
        )));
    }

    let source = source.voxels().data();
    for (dst, src) in master.voxels_mut().data_mut().iter_mut().zip(source) {
        dst.state = dst.state.max(src.state);
        dst.hits = dst.hits.saturating_add(src.hits);
        dst.passes = dst.passes.saturating_add(src.passes);
    }
    Ok(())
}

//! Shared tile caches of a scheduling unit.
//!
//! Each scheduling unit owns two padded tile caches, `AA` and `BB`. Within a
//! reduction step they go through a fixed protocol:
//!
//! ```text
//! load()      all threads write AA / BB          (exclusive)
//! barrier()   ------------------------------------
//!             all threads read AA / BB           (shared, read-only)
//! barrier()   ------------------------------------
//! load()      next step overwrites the caches
//! ```
//!
//! The protocol is encoded in types: [`SharedTiles::load`] hands out a
//! [`LoadPhase`] with write access, its `barrier` turns it into a
//! [`ComputePhase`] with read access only, and the borrow of the caches is
//! not released until the compute phase passes its own barrier. Reading
//! before the load barrier or reloading while another thread may still read
//! is rejected by the borrow checker.

use super::geometry::{PADDED_TILE_LEN, TILE_DIM, TILE_STRIDE};

/// One padded `TILE_DIM x TILE_DIM` tile, column-major with stride
/// [`TILE_STRIDE`].
pub struct TileCache {
    data: Box<[f32]>,
}

impl TileCache {
    fn new() -> Self {
        Self {
            data: vec![0.0; PADDED_TILE_LEN].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(row: usize, col: usize) -> usize {
        debug_assert!(row < TILE_DIM && col < TILE_DIM);
        col * TILE_STRIDE + row
    }

    /// Element `(row, col)` of the staged tile.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[Self::index(row, col)]
    }

    /// Store element `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[Self::index(row, col)] = value;
    }
}

/// The `AA` / `BB` pair owned by one scheduling unit.
pub struct SharedTiles {
    aa: TileCache,
    bb: TileCache,
    steps: u64,
}

impl SharedTiles {
    pub fn new() -> Self {
        Self {
            aa: TileCache::new(),
            bb: TileCache::new(),
            steps: 0,
        }
    }

    /// Begin the cooperative load of a reduction step.
    pub fn load(&mut self) -> LoadPhase<'_> {
        LoadPhase { tiles: self }
    }

    /// Number of completed reduction steps (load and compute both passed).
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Default for SharedTiles {
    fn default() -> Self {
        Self::new()
    }
}

/// Write access to both caches while threads stage a step.
pub struct LoadPhase<'a> {
    tiles: &'a mut SharedTiles,
}

impl<'a> LoadPhase<'a> {
    pub fn aa_mut(&mut self) -> &mut TileCache {
        &mut self.tiles.aa
    }

    pub fn bb_mut(&mut self) -> &mut TileCache {
        &mut self.tiles.bb
    }

    /// Both caches at once, for loops that fill AA and BB together.
    pub fn caches_mut(&mut self) -> (&mut TileCache, &mut TileCache) {
        (&mut self.tiles.aa, &mut self.tiles.bb)
    }

    /// Wait until every thread finished loading.
    pub fn barrier(self) -> ComputePhase<'a> {
        ComputePhase { tiles: self.tiles }
    }
}

/// Read-only access to both caches while threads consume a step.
pub struct ComputePhase<'a> {
    tiles: &'a mut SharedTiles,
}

impl<'a> ComputePhase<'a> {
    pub fn aa(&self) -> &TileCache {
        &self.tiles.aa
    }

    pub fn bb(&self) -> &TileCache {
        &self.tiles.bb
    }

    /// Wait until every thread finished reading; the caches may be reloaded.
    pub fn barrier(self) {
        self.tiles.steps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_layout() {
        assert_eq!(TileCache::index(0, 1), TILE_DIM + 1);
        assert_eq!(TileCache::index(TILE_DIM - 1, TILE_DIM - 1), PADDED_TILE_LEN - 2);
    }

    #[test]
    fn test_load_then_compute() {
        let mut tiles = SharedTiles::new();

        let mut load = tiles.load();
        load.aa_mut().set(3, 4, 1.5);
        load.bb_mut().set(4, 3, -2.0);
        let compute = load.barrier();
        assert_eq!(compute.aa().get(3, 4), 1.5);
        assert_eq!(compute.bb().get(4, 3), -2.0);
        compute.barrier();

        assert_eq!(tiles.steps(), 1);
    }

    #[test]
    fn test_reload_overwrites() {
        let mut tiles = SharedTiles::new();
        for step in 0..3 {
            let mut load = tiles.load();
            let (aa, bb) = load.caches_mut();
            aa.set(0, 0, step as f32);
            bb.set(0, 0, -(step as f32));
            let compute = load.barrier();
            assert_eq!(compute.aa().get(0, 0), step as f32);
            assert_eq!(compute.bb().get(0, 0), -(step as f32));
            compute.barrier();
        }
        assert_eq!(tiles.steps(), 3);
    }
}

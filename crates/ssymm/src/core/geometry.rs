//! Tile geometry.
//!
//! Tiles are square `TILE_DIM x TILE_DIM` blocks. A scheduling unit runs
//! `THREAD_COUNT` threads; when a tile has more elements than the unit has
//! threads, each thread walks the tile by staying in one tile row and stepping
//! through columns `COL_INCR` apart:
//!
//! ```text
//! tid      -> row = tid % TILE_DIM, first col = tid / TILE_DIM
//! element e -> col = tid / TILE_DIM + e * COL_INCR
//! ```
//!
//! For that walk to have no remainder, `THREAD_COUNT` must divide
//! `TILE_SIZE` and be a multiple of `TILE_DIM`. Those conditions, and the
//! square super-tile, are checked when a geometry is used: a violating
//! geometry does not compile.
//!
//! ```compile_fail
//! use ssymm::core::{TileGeometry, TILE_DIM};
//!
//! struct Lopsided;
//! impl TileGeometry for Lopsided {
//!     const THREAD_COUNT: usize = 96;
//!     const GRID_W: usize = 2;
//!     const GRID_H: usize = 2;
//! }
//!
//! fn main() {
//!     let incr = Lopsided::COL_INCR;
//!     println!("{incr} {}", TILE_DIM);
//! }
//! ```
//!
//! A super-tile that is not square:
//!
//! ```compile_fail
//! use ssymm::core::TileGeometry;
//!
//! struct Oblong;
//! impl TileGeometry for Oblong {
//!     const THREAD_COUNT: usize = 128;
//!     const GRID_W: usize = 2;
//!     const GRID_H: usize = 4;
//! }
//!
//! fn main() {
//!     println!("{}", Oblong::SUP_TILE_DIM);
//! }
//! ```
//!
//! Fewer threads than a tile row, so a thread cannot own a fixed row:
//!
//! ```compile_fail
//! use ssymm::core::TileGeometry;
//!
//! struct Sliver;
//! impl TileGeometry for Sliver {
//!     const THREAD_COUNT: usize = 16;
//!     const GRID_W: usize = 2;
//!     const GRID_H: usize = 2;
//! }
//!
//! fn main() {
//!     println!("{}", Sliver::C_ELEMS_PER_THREAD);
//! }
//! ```

pub const TILE_DIM_LOG: u32 = 5;
pub const TILE_DIM: usize = 1 << TILE_DIM_LOG;
pub const TILE_SIZE: usize = TILE_DIM * TILE_DIM;

/// Column stride of a staged tile; the extra element per column keeps
/// strided accesses on distinct memory banks.
pub const TILE_STRIDE: usize = TILE_DIM + 1;

/// Elements in one padded tile cache.
pub const PADDED_TILE_LEN: usize = TILE_STRIDE * TILE_DIM;

/// Thread count and super-tile shape of a scheduling unit.
///
/// Implementors provide the three base constants; everything else is derived.
pub trait TileGeometry: Send + Sync + 'static {
    /// Threads per scheduling unit.
    const THREAD_COUNT: usize;
    /// Tiles per super-tile along the column axis.
    const GRID_W: usize;
    /// Tiles per super-tile along the row axis.
    const GRID_H: usize;

    /// Structural preconditions of the tile walk.
    const CHECKED: () = {
        assert!(Self::GRID_W == Self::GRID_H, "super tile is not square!");
        assert!(Self::GRID_W > 0, "super tile is empty!");
        assert!(Self::THREAD_COUNT > 0, "THREAD_COUNT is zero!");
        assert!(
            TILE_SIZE % Self::THREAD_COUNT == 0,
            "TILE_SIZE and THREAD_COUNT do not divide evenly!"
        );
        assert!(
            Self::THREAD_COUNT % TILE_DIM == 0,
            "THREAD_COUNT and TILE_DIM do not divide evenly!"
        );
    };

    /// Side length of the region covered by one full grid of scheduling units.
    const SUP_TILE_DIM: usize = {
        let () = Self::CHECKED;
        TILE_DIM * Self::GRID_H
    };

    /// Column distance between consecutive elements owned by one thread.
    const COL_INCR: usize = {
        let () = Self::CHECKED;
        Self::THREAD_COUNT / TILE_DIM
    };

    const C_ELEMS_PER_THREAD: usize = {
        let () = Self::CHECKED;
        TILE_SIZE / Self::THREAD_COUNT
    };
    const A_ELEMS_PER_THREAD: usize = Self::C_ELEMS_PER_THREAD;
    const B_ELEMS_PER_THREAD: usize = Self::C_ELEMS_PER_THREAD;

    /// Tile coordinates of element `e` owned by thread `tid`.
    #[inline]
    fn element(tid: usize, e: usize) -> (usize, usize) {
        (tid % TILE_DIM, tid / TILE_DIM + e * Self::COL_INCR)
    }
}

/// 512 threads per unit, 4x4 tiles per super-tile.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGeometry;

impl TileGeometry for DefaultGeometry {
    const THREAD_COUNT: usize = 512;
    const GRID_W: usize = 4;
    const GRID_H: usize = 4;
}

/// Number of tiles needed to cover `len` elements.
#[inline]
pub fn tiles_for(len: usize) -> usize {
    (len + TILE_DIM - 1) >> TILE_DIM_LOG
}

/// Whether `len` is a whole number of tiles.
#[inline]
pub fn is_tile_aligned(len: usize) -> bool {
    len & (TILE_DIM - 1) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Narrow;
    impl TileGeometry for Narrow {
        const THREAD_COUNT: usize = 128;
        const GRID_W: usize = 2;
        const GRID_H: usize = 2;
    }

    #[test]
    fn test_tile_constants() {
        assert_eq!(TILE_DIM, 32);
        assert_eq!(TILE_SIZE, 1024);
        assert_eq!(PADDED_TILE_LEN, 33 * 32);
    }

    #[test]
    fn test_default_geometry() {
        assert_eq!(DefaultGeometry::COL_INCR, 16);
        assert_eq!(DefaultGeometry::C_ELEMS_PER_THREAD, 2);
        assert_eq!(DefaultGeometry::A_ELEMS_PER_THREAD, 2);
        assert_eq!(DefaultGeometry::SUP_TILE_DIM, 128);
    }

    #[test]
    fn test_narrow_geometry() {
        assert_eq!(Narrow::COL_INCR, 4);
        assert_eq!(Narrow::B_ELEMS_PER_THREAD, 8);
        assert_eq!(Narrow::SUP_TILE_DIM, 64);
    }

    #[test]
    fn test_thread_walk_covers_tile_once() {
        fn covered<G: TileGeometry>() -> HashSet<(usize, usize)> {
            let mut seen = HashSet::new();
            for tid in 0..G::THREAD_COUNT {
                for e in 0..G::C_ELEMS_PER_THREAD {
                    assert!(seen.insert(G::element(tid, e)), "element owned twice");
                }
            }
            seen
        }

        for set in [covered::<DefaultGeometry>(), covered::<Narrow>()] {
            assert_eq!(set.len(), TILE_SIZE);
            assert!(set.iter().all(|&(r, c)| r < TILE_DIM && c < TILE_DIM));
        }
    }

    #[test]
    fn test_tiles_for() {
        assert_eq!(tiles_for(0), 0);
        assert_eq!(tiles_for(1), 1);
        assert_eq!(tiles_for(32), 1);
        assert_eq!(tiles_for(33), 2);
        assert!(is_tile_aligned(64));
        assert!(!is_tile_aligned(65));
    }
}

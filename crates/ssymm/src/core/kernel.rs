//! The tiled SSYMM kernel body shared by every entry point.
//!
//! For one output tile of C at `(row0, col0)`:
//!
//! ```text
//! acc = 0
//! for l0 in 0..ka step TILE_DIM:
//!     load:     AA <- A_sym tile at SidePolicy::a_origin(row0, col0, l0)
//!               BB <- B tile     at SidePolicy::b_origin(row0, col0, l0)
//!     barrier
//!     compute:  acc[tid][e] += SidePolicy::dot(AA, BB, row, col)
//!     barrier
//! C_tile = alpha * acc + beta * C_tile      (C not read when beta == 0)
//! ```
//!
//! Emulated threads run phase by phase; everything one thread does between
//! two barriers completes before any thread enters the next phase, which is
//! exactly the ordering the barriers guarantee on a device.

use super::geometry::{TileGeometry, TILE_DIM, TILE_SIZE};
use super::policy::{BoundsPolicy, IndexPolicy, SidePolicy, TileRegion, TrianglePolicy};
use super::staging::SharedTiles;
use crate::types::{MatRef, SsymmParams};

/// Operands of one launch. C is only read here; stores go through
/// [`OutputTile`]s once every scheduling unit has finished.
#[derive(Debug, Clone, Copy)]
pub struct KernelArgs<'a> {
    pub params: SsymmParams,
    pub a: MatRef<'a>,
    pub b: MatRef<'a>,
    pub c: MatRef<'a>,
}

/// Origin of an output tile in C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub row0: usize,
    pub col0: usize,
}

/// Final values of one output tile, restricted to its valid extent.
#[derive(Debug, Clone)]
pub struct OutputTile {
    pub coord: TileCoord,
    rows: usize,
    cols: usize,
    values: Box<[f32]>,
}

impl OutputTile {
    fn new(coord: TileCoord, rows: usize, cols: usize) -> Self {
        Self {
            coord,
            rows,
            cols,
            values: vec![0.0; TILE_SIZE].into_boxed_slice(),
        }
    }

    /// Valid rows in this tile.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Valid columns in this tile.
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[col * TILE_DIM + row]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: f32) {
        self.values[col * TILE_DIM + row] = value;
    }
}

/// Element of the symmetric matrix at logical `(row, col)`.
#[inline]
fn load_a<T: TrianglePolicy, B: BoundsPolicy, I: IndexPolicy>(
    a: &MatRef<'_>,
    ka: usize,
    region: TileRegion,
    row: usize,
    col: usize,
) -> f32 {
    if B::CLAMPED && (row >= ka || col >= ka) {
        return 0.0;
    }
    let (r, c) = match region {
        TileRegion::Stored => (row, col),
        TileRegion::Mirrored => (col, row),
        TileRegion::Diagonal => T::stored_location(row, col),
    };
    a.as_slice()[I::offset(r, c, a.ld())]
}

#[inline]
fn load_b<B: BoundsPolicy, I: IndexPolicy>(b: &MatRef<'_>, row: usize, col: usize) -> f32 {
    if B::CLAMPED && (row >= b.rows() || col >= b.cols()) {
        return 0.0;
    }
    b.as_slice()[I::offset(row, col, b.ld())]
}

/// Compute one output tile.
///
/// `tiles` are the scheduling unit's shared caches and `regs` its per-thread
/// accumulators (`THREAD_COUNT * C_ELEMS_PER_THREAD` values); both are reused
/// across the tiles a unit owns.
pub fn ssymm_tile<G, T, S, B, I>(
    args: &KernelArgs<'_>,
    tiles: &mut SharedTiles,
    regs: &mut [f32],
    coord: TileCoord,
) -> OutputTile
where
    G: TileGeometry,
    T: TrianglePolicy,
    S: SidePolicy,
    B: BoundsPolicy,
    I: IndexPolicy,
{
    let params = &args.params;
    let ka = params.ka();
    let elems = G::C_ELEMS_PER_THREAD;
    debug_assert_eq!(regs.len(), G::THREAD_COUNT * elems);

    regs.fill(0.0);

    for l0 in (0..ka).step_by(TILE_DIM) {
        let (ar0, ac0) = S::a_origin(coord.row0, coord.col0, l0);
        let (br0, bc0) = S::b_origin(coord.row0, coord.col0, l0);
        let region = T::classify(ar0, ac0);

        let mut load = tiles.load();
        {
            let (aa, bb) = load.caches_mut();
            for tid in 0..G::THREAD_COUNT {
                for e in 0..G::A_ELEMS_PER_THREAD {
                    let (r, c) = G::element(tid, e);
                    aa.set(r, c, load_a::<T, B, I>(&args.a, ka, region, ar0 + r, ac0 + c));
                }
                for e in 0..G::B_ELEMS_PER_THREAD {
                    let (r, c) = G::element(tid, e);
                    bb.set(r, c, load_b::<B, I>(&args.b, br0 + r, bc0 + c));
                }
            }
        }

        let stage = load.barrier();
        for tid in 0..G::THREAD_COUNT {
            for e in 0..elems {
                let (r, c) = G::element(tid, e);
                regs[tid * elems + e] += S::dot(&stage, r, c);
            }
        }
        stage.barrier();
    }

    let (rows, cols) = if B::CLAMPED {
        (
            TILE_DIM.min(params.m - coord.row0),
            TILE_DIM.min(params.n - coord.col0),
        )
    } else {
        (TILE_DIM, TILE_DIM)
    };

    let mut out = OutputTile::new(coord, rows, cols);
    let (alpha, beta) = (params.alpha, params.beta);
    let c = &args.c;
    for tid in 0..G::THREAD_COUNT {
        for e in 0..elems {
            let (r, col) = G::element(tid, e);
            if B::CLAMPED && (r >= rows || col >= cols) {
                continue;
            }
            let product = alpha * regs[tid * elems + e];
            let value = if beta == 0.0 {
                product
            } else {
                let old = c.as_slice()[I::offset(coord.row0 + r, coord.col0 + col, c.ld())];
                product + beta * old
            };
            out.set(r, col, value);
        }
    }
    out
}

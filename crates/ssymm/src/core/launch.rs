//! Launch grids, scheduling units and write-back.

use super::geometry::{tiles_for, TileGeometry, TILE_DIM, TILE_SIZE};
use super::kernel::{ssymm_tile, KernelArgs, OutputTile, TileCoord};
use super::policy::{BoundsPolicy, IndexPolicy, SidePolicy, TrianglePolicy};
use super::staging::SharedTiles;
use crate::types::{MatMut, MatRef, Schedule, SsymmParams};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Identity of a scheduling unit in the launch grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    /// Position along the row-tile axis.
    pub x: usize,
    /// Position along the column-tile axis.
    pub y: usize,
}

/// Shape of a launch: how many scheduling units, and how many output tiles
/// they have to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchGrid {
    pub schedule: Schedule,
    pub blocks_x: usize,
    pub blocks_y: usize,
    /// Output tiles along the rows of C.
    pub tiles_x: usize,
    /// Output tiles along the columns of C.
    pub tiles_y: usize,
}

impl LaunchGrid {
    /// Grid for an `m x n` output.
    ///
    /// Hardware scheduling launches one unit per output tile. Software
    /// scheduling launches at most `GRID_W x GRID_H` units; each then walks
    /// the output in steps of `SUP_TILE_DIM`.
    pub fn new<G: TileGeometry>(schedule: Schedule, m: usize, n: usize) -> Self {
        let tiles_x = tiles_for(m);
        let tiles_y = tiles_for(n);
        let (blocks_x, blocks_y) = match schedule {
            Schedule::Hardware => (tiles_x, tiles_y),
            Schedule::Software => (tiles_x.min(G::GRID_W), tiles_y.min(G::GRID_H)),
        };
        Self {
            schedule,
            blocks_x,
            blocks_y,
            tiles_x,
            tiles_y,
        }
    }

    pub fn block_count(&self) -> usize {
        self.blocks_x * self.blocks_y
    }

    /// Scheduling unit with linear index `index`.
    pub fn block(&self, index: usize) -> BlockId {
        BlockId {
            x: index % self.blocks_x,
            y: index / self.blocks_x,
        }
    }

    /// Output tiles owned by `block`, in the order the unit processes them.
    pub fn tiles_of<G: TileGeometry>(&self, block: BlockId) -> Vec<TileCoord> {
        let row0 = block.x * TILE_DIM;
        let col0 = block.y * TILE_DIM;
        match self.schedule {
            Schedule::Hardware => vec![TileCoord { row0, col0 }],
            Schedule::Software => {
                let row_extent = self.tiles_x * TILE_DIM;
                let col_extent = self.tiles_y * TILE_DIM;
                let mut coords = Vec::new();
                for sup_col in (0..col_extent).step_by(G::SUP_TILE_DIM) {
                    for sup_row in (0..row_extent).step_by(G::SUP_TILE_DIM) {
                        let coord = TileCoord {
                            row0: sup_row + row0,
                            col0: sup_col + col0,
                        };
                        if coord.row0 < row_extent && coord.col0 < col_extent {
                            coords.push(coord);
                        }
                    }
                }
                coords
            }
        }
    }
}

/// Run every tile owned by one scheduling unit.
///
/// The unit allocates its shared caches and accumulators once and reuses
/// them for all of its tiles.
fn run_block<G, T, S, B, I>(
    grid: &LaunchGrid,
    args: &KernelArgs<'_>,
    block: BlockId,
) -> Vec<OutputTile>
where
    G: TileGeometry,
    T: TrianglePolicy,
    S: SidePolicy,
    B: BoundsPolicy,
    I: IndexPolicy,
{
    let coords = grid.tiles_of::<G>(block);
    tracing::trace!(x = block.x, y = block.y, tiles = coords.len(), "scheduling unit");

    let mut tiles = SharedTiles::new();
    let mut regs = vec![0.0f32; G::THREAD_COUNT * G::C_ELEMS_PER_THREAD];
    debug_assert_eq!(regs.len(), TILE_SIZE);

    coords
        .into_iter()
        .map(|coord| ssymm_tile::<G, T, S, B, I>(args, &mut tiles, &mut regs, coord))
        .collect()
}

/// Store an output tile into C. Only the tile's valid extent is written.
fn write_tile<I: IndexPolicy>(c: &mut MatMut<'_>, tile: &OutputTile) {
    let ld = c.ld();
    let data = c.as_mut_slice();
    for col in 0..tile.cols() {
        for row in 0..tile.rows() {
            data[I::offset(tile.coord.row0 + row, tile.coord.col0 + col, ld)] = tile.get(row, col);
        }
    }
}

/// Launch one kernel variant over the whole output.
///
/// Scheduling units run concurrently and share nothing; each produces the
/// final values of the tiles it owns. Those disjoint tiles are stored into C
/// after the grid completes.
pub fn launch<G, T, S, B, I>(
    schedule: Schedule,
    params: &SsymmParams,
    a: MatRef<'_>,
    b: MatRef<'_>,
    c: &mut MatMut<'_>,
) -> LaunchGrid
where
    G: TileGeometry,
    T: TrianglePolicy,
    S: SidePolicy,
    B: BoundsPolicy,
    I: IndexPolicy,
{
    let grid = LaunchGrid::new::<G>(schedule, params.m, params.n);

    let outputs: Vec<OutputTile> = {
        let args = KernelArgs {
            params: *params,
            a,
            b,
            c: c.as_ref(),
        };

        #[cfg(feature = "parallel")]
        {
            (0..grid.block_count())
                .into_par_iter()
                .flat_map_iter(|index| run_block::<G, T, S, B, I>(&grid, &args, grid.block(index)))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            (0..grid.block_count())
                .flat_map(|index| run_block::<G, T, S, B, I>(&grid, &args, grid.block(index)))
                .collect()
        }
    };

    for tile in &outputs {
        write_tile::<I>(c, tile);
    }
    grid
}

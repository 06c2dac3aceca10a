//! Tiled SSYMM kernel family.
//!
//! # Algorithm
//!
//! Every scheduling unit computes whole `TILE_DIM x TILE_DIM` tiles of C:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ for each output tile (row0, col0) owned by this unit:            │
//! │   acc = 0                                                        │
//! │   for l0 in 0..ka step TILE_DIM:            (reduction)          │
//! │     AA <- A_sym tile    BB <- B tile        (cooperative load)   │
//! │     ── barrier ──                                                │
//! │     acc += AA · BB   or   BB · AA           (per thread)         │
//! │     ── barrier ──                                                │
//! │   C_tile = alpha * acc + beta * C_tile      (clamped at edges)   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only one triangle of A is stored. A tile lying entirely in the missing
//! half is read transposed; a tile straddling the diagonal mixes stored and
//! mirrored elements.
//!
//! # Variants
//!
//! The 32 entry points of the family collapse into one generic body
//! parameterized by policies (see [`policy`]) plus a runtime [`Schedule`]
//! (see [`launch`]). [`dispatch::resolve`] turns a
//! [`KernelVariant`](crate::types::KernelVariant) into the matching
//! instantiation.
//!
//! # Module Contents
//!
//! - [`geometry`]: tile constants and the thread-to-element walk
//! - [`staging`]: padded shared tile caches and their barrier protocol
//! - [`policy`]: triangle, side, bounds and index policies
//! - [`kernel`]: the kernel body for one output tile
//! - [`launch`]: launch grids, scheduling units and write-back
//! - [`dispatch`]: variant resolution and eligibility checks
//!
//! [`Schedule`]: crate::types::Schedule

pub mod dispatch;
pub mod geometry;
pub mod kernel;
pub mod launch;
pub mod policy;
pub mod staging;

pub use dispatch::{fast_index_eligible, fulltile_eligible, launch_variant, resolve, KernelFn};
pub use geometry::{
    is_tile_aligned, tiles_for, DefaultGeometry, TileGeometry, PADDED_TILE_LEN, TILE_DIM,
    TILE_DIM_LOG, TILE_SIZE, TILE_STRIDE,
};
pub use kernel::{ssymm_tile, KernelArgs, OutputTile, TileCoord};
pub use launch::{launch, BlockId, LaunchGrid};
pub use policy::{
    umul24, BoundsPolicy, Clamped, Fast24Index, FullTile, IndexPolicy, LeftSide, LowerTriangle,
    RightSide, SidePolicy, TileRegion, TrianglePolicy, UpperTriangle, WideIndex, FAST24_LIMIT,
};
pub use staging::{ComputePhase, LoadPhase, SharedTiles, TileCache};

//! Compile-time policies that specialize the single kernel body.
//!
//! Every entry point of the family is the same tiled reduction; the axes it
//! varies along are expressed as zero-sized policy types:
//!
//! - [`TrianglePolicy`]: which half of A is authoritative and how to read the
//!   other half by symmetry.
//! - [`SidePolicy`]: whether A is the left or the right factor.
//! - [`BoundsPolicy`]: whether partial tiles have to be clamped.
//! - [`IndexPolicy`]: full-width or 24-bit address arithmetic.

use super::geometry::TILE_DIM;
use super::staging::ComputePhase;
use crate::types::{Alignment, IndexMath, Side, Uplo};

/// Position of an A tile relative to the stored triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileRegion {
    /// Every element lies in the stored triangle.
    Stored,
    /// Every element lies in the implicit triangle; read the transposed tile.
    Mirrored,
    /// The tile straddles the diagonal; decide per element.
    Diagonal,
}

pub trait TrianglePolicy: Send + Sync + 'static {
    const UPLO: Uplo;

    /// Whether logical element `(row, col)` is physically stored.
    fn is_stored(row: usize, col: usize) -> bool;

    /// Classify the `TILE_DIM x TILE_DIM` tile starting at `(row0, col0)`.
    fn classify(row0: usize, col0: usize) -> TileRegion;

    /// Physical location holding logical element `(row, col)`.
    #[inline]
    fn stored_location(row: usize, col: usize) -> (usize, usize) {
        if Self::is_stored(row, col) {
            (row, col)
        } else {
            (col, row)
        }
    }
}

/// Upper triangle stored (`row <= col`).
pub struct UpperTriangle;

impl TrianglePolicy for UpperTriangle {
    const UPLO: Uplo = Uplo::Upper;

    #[inline]
    fn is_stored(row: usize, col: usize) -> bool {
        row <= col
    }

    fn classify(row0: usize, col0: usize) -> TileRegion {
        if row0 + TILE_DIM - 1 <= col0 {
            TileRegion::Stored
        } else if row0 >= col0 + TILE_DIM {
            TileRegion::Mirrored
        } else {
            TileRegion::Diagonal
        }
    }
}

/// Lower triangle stored (`row >= col`).
pub struct LowerTriangle;

impl TrianglePolicy for LowerTriangle {
    const UPLO: Uplo = Uplo::Lower;

    #[inline]
    fn is_stored(row: usize, col: usize) -> bool {
        row >= col
    }

    fn classify(row0: usize, col0: usize) -> TileRegion {
        if row0 >= col0 + TILE_DIM - 1 {
            TileRegion::Stored
        } else if row0 + TILE_DIM <= col0 {
            TileRegion::Mirrored
        } else {
            TileRegion::Diagonal
        }
    }
}

/// Placement of the symmetric operand in the product.
///
/// For an output tile at `(row0, col0)` and a reduction step starting at
/// `l0`, the policy tells where the A and B tiles start and how a staged
/// pair contributes to output element `(row, col)` of the tile.
pub trait SidePolicy: Send + Sync + 'static {
    const SIDE: Side;

    fn a_origin(row0: usize, col0: usize, l0: usize) -> (usize, usize);
    fn b_origin(row0: usize, col0: usize, l0: usize) -> (usize, usize);

    /// Tile-local partial dot product for output element `(row, col)`.
    fn dot(stage: &ComputePhase<'_>, row: usize, col: usize) -> f32;
}

/// `C = alpha * A * B + beta * C`.
pub struct LeftSide;

impl SidePolicy for LeftSide {
    const SIDE: Side = Side::Left;

    #[inline]
    fn a_origin(row0: usize, _col0: usize, l0: usize) -> (usize, usize) {
        (row0, l0)
    }

    #[inline]
    fn b_origin(_row0: usize, col0: usize, l0: usize) -> (usize, usize) {
        (l0, col0)
    }

    #[inline]
    fn dot(stage: &ComputePhase<'_>, row: usize, col: usize) -> f32 {
        let (aa, bb) = (stage.aa(), stage.bb());
        let mut sum = 0.0f32;
        for l in 0..TILE_DIM {
            sum += aa.get(row, l) * bb.get(l, col);
        }
        sum
    }
}

/// `C = alpha * B * A + beta * C`.
pub struct RightSide;

impl SidePolicy for RightSide {
    const SIDE: Side = Side::Right;

    #[inline]
    fn a_origin(_row0: usize, col0: usize, l0: usize) -> (usize, usize) {
        (l0, col0)
    }

    #[inline]
    fn b_origin(row0: usize, _col0: usize, l0: usize) -> (usize, usize) {
        (row0, l0)
    }

    #[inline]
    fn dot(stage: &ComputePhase<'_>, row: usize, col: usize) -> f32 {
        let (aa, bb) = (stage.aa(), stage.bb());
        let mut sum = 0.0f32;
        for l in 0..TILE_DIM {
            sum += bb.get(row, l) * aa.get(l, col);
        }
        sum
    }
}

pub trait BoundsPolicy: Send + Sync + 'static {
    const ALIGNMENT: Alignment;
    /// Whether loads and stores must be checked against the matrix extents.
    const CLAMPED: bool;
}

/// Partial tiles at the edges: out-of-range loads read zero, stores are skipped.
pub struct Clamped;

impl BoundsPolicy for Clamped {
    const ALIGNMENT: Alignment = Alignment::Generic;
    const CLAMPED: bool = true;
}

/// Every tile is complete; no checks at all.
pub struct FullTile;

impl BoundsPolicy for FullTile {
    const ALIGNMENT: Alignment = Alignment::FullTile;
    const CLAMPED: bool = false;
}

pub trait IndexPolicy: Send + Sync + 'static {
    const INDEX: IndexMath;

    /// Offset of element `(row, col)` in a column-major matrix.
    fn offset(row: usize, col: usize, ld: usize) -> usize;
}

pub struct WideIndex;

impl IndexPolicy for WideIndex {
    const INDEX: IndexMath = IndexMath::Wide;

    #[inline]
    fn offset(row: usize, col: usize, ld: usize) -> usize {
        col * ld + row
    }
}

/// Offsets computed with a 24-bit unsigned multiply.
pub struct Fast24Index;

impl IndexPolicy for Fast24Index {
    const INDEX: IndexMath = IndexMath::Fast24;

    #[inline]
    fn offset(row: usize, col: usize, ld: usize) -> usize {
        umul24(col as u32, ld as u32).wrapping_add(row as u32) as usize
    }
}

/// Largest offset representable by [`Fast24Index`].
pub const FAST24_LIMIT: usize = 1 << 24;

/// Low 32 bits of the product of the low 24 bits of `a` and `b`.
#[inline]
pub fn umul24(a: u32, b: u32) -> u32 {
    (a & 0x00FF_FFFF).wrapping_mul(b & 0x00FF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_classify() {
        assert_eq!(UpperTriangle::classify(0, 32), TileRegion::Stored);
        assert_eq!(UpperTriangle::classify(32, 0), TileRegion::Mirrored);
        assert_eq!(UpperTriangle::classify(32, 32), TileRegion::Diagonal);
        // Unaligned origin touching the diagonal in one corner
        assert_eq!(UpperTriangle::classify(1, 32), TileRegion::Stored);
        assert_eq!(UpperTriangle::classify(2, 32), TileRegion::Diagonal);
    }

    #[test]
    fn test_lower_classify() {
        assert_eq!(LowerTriangle::classify(32, 0), TileRegion::Stored);
        assert_eq!(LowerTriangle::classify(0, 32), TileRegion::Mirrored);
        assert_eq!(LowerTriangle::classify(64, 64), TileRegion::Diagonal);
        assert_eq!(LowerTriangle::classify(32, 1), TileRegion::Stored);
        assert_eq!(LowerTriangle::classify(32, 2), TileRegion::Diagonal);
    }

    #[test]
    fn test_classify_agrees_with_elements() {
        fn check<T: TrianglePolicy>(row0: usize, col0: usize) {
            let stored = (0..TILE_DIM)
                .flat_map(|r| (0..TILE_DIM).map(move |c| (r, c)))
                .filter(|&(r, c)| T::is_stored(row0 + r, col0 + c))
                .count();
            match T::classify(row0, col0) {
                TileRegion::Stored => assert_eq!(stored, TILE_DIM * TILE_DIM),
                TileRegion::Mirrored => assert_eq!(stored, 0),
                TileRegion::Diagonal => {
                    assert!(stored > 0 && stored < TILE_DIM * TILE_DIM)
                }
            }
        }

        for row0 in [0, 5, 31, 32, 40, 64] {
            for col0 in [0, 7, 31, 32, 33, 96] {
                check::<UpperTriangle>(row0, col0);
                check::<LowerTriangle>(row0, col0);
            }
        }
    }

    #[test]
    fn test_stored_location() {
        assert_eq!(UpperTriangle::stored_location(1, 4), (1, 4));
        assert_eq!(UpperTriangle::stored_location(4, 1), (1, 4));
        assert_eq!(LowerTriangle::stored_location(1, 4), (4, 1));
        assert_eq!(LowerTriangle::stored_location(3, 3), (3, 3));
    }

    #[test]
    fn test_umul24() {
        assert_eq!(umul24(1000, 1000), 1_000_000);
        // Bits above 24 are ignored
        assert_eq!(umul24((1 << 24) + 3, 5), 15);
        // Result wraps to the low 32 bits
        assert_eq!(umul24(0x00FF_FFFF, 0x00FF_FFFF), 0x00FF_FFFFu32.wrapping_mul(0x00FF_FFFF));
    }

    #[test]
    fn test_fast_index_matches_wide_in_range() {
        for &(row, col, ld) in &[(0, 0, 1), (5, 7, 40), (31, 4000, 4096), (100, 4095, 4096)] {
            assert_eq!(
                Fast24Index::offset(row, col, ld),
                WideIndex::offset(row, col, ld)
            );
        }
    }
}

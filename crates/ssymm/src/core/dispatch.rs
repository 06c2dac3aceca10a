//! Resolution of kernel variants to monomorphized entry points.
//!
//! Triangle, side, alignment and index math are type parameters of the
//! kernel body, so each of their 16 combinations is a separate
//! instantiation. The schedule only changes which tiles a scheduling unit
//! owns and is passed at launch time, completing the 32 entry points.

use super::geometry::{is_tile_aligned, TileGeometry, TILE_DIM};
use super::launch::{launch, LaunchGrid};
use super::policy::{
    Clamped, Fast24Index, FullTile, LeftSide, LowerTriangle, RightSide, UpperTriangle, WideIndex,
    FAST24_LIMIT,
};
use crate::error::{Result, SsymmError};
use crate::types::{
    required_len, Alignment, IndexMath, KernelVariant, MatMut, MatRef, Schedule, Side,
    SsymmParams, Uplo,
};

/// A resolved entry point.
pub type KernelFn =
    fn(Schedule, &SsymmParams, MatRef<'_>, MatRef<'_>, &mut MatMut<'_>) -> LaunchGrid;

macro_rules! resolve_bounds_index {
    ($g:ty, $t:ty, $s:ty, $variant:expr) => {
        match ($variant.alignment, $variant.index) {
            (Alignment::Generic, IndexMath::Wide) => {
                launch::<$g, $t, $s, Clamped, WideIndex> as KernelFn
            }
            (Alignment::Generic, IndexMath::Fast24) => {
                launch::<$g, $t, $s, Clamped, Fast24Index> as KernelFn
            }
            (Alignment::FullTile, IndexMath::Wide) => {
                launch::<$g, $t, $s, FullTile, WideIndex> as KernelFn
            }
            (Alignment::FullTile, IndexMath::Fast24) => {
                launch::<$g, $t, $s, FullTile, Fast24Index> as KernelFn
            }
        }
    };
}

/// Entry point implementing `variant`.
pub fn resolve<G: TileGeometry>(variant: KernelVariant) -> KernelFn {
    match (variant.uplo, variant.side) {
        (Uplo::Upper, Side::Left) => resolve_bounds_index!(G, UpperTriangle, LeftSide, variant),
        (Uplo::Upper, Side::Right) => resolve_bounds_index!(G, UpperTriangle, RightSide, variant),
        (Uplo::Lower, Side::Left) => resolve_bounds_index!(G, LowerTriangle, LeftSide, variant),
        (Uplo::Lower, Side::Right) => resolve_bounds_index!(G, LowerTriangle, RightSide, variant),
    }
}

/// Whether the full-tile specialization may run: every dimension of A, B
/// and C is a whole number of tiles.
pub fn fulltile_eligible(params: &SsymmParams) -> bool {
    is_tile_aligned(params.m) && is_tile_aligned(params.n)
}

/// Whether 24-bit address arithmetic reaches every element of A, B and C.
pub fn fast_index_eligible(params: &SsymmParams) -> bool {
    let ka = params.ka();
    [
        required_len(ka, ka, params.lda),
        required_len(params.m, params.n, params.ldb),
        required_len(params.m, params.n, params.ldc),
    ]
    .iter()
    .all(|&len| len <= FAST24_LIMIT)
}

/// Check that `variant` implements `params` and is eligible for its shape.
pub fn check_variant(variant: &KernelVariant, params: &SsymmParams) -> Result<()> {
    let ineligible = |reason: String| SsymmError::IneligibleVariant {
        variant: variant.name(),
        reason,
    };

    if variant.side != params.side || variant.uplo != params.uplo {
        return Err(ineligible(format!(
            "parameters request side={:?}, uplo={:?}",
            params.side, params.uplo
        )));
    }
    if variant.alignment == Alignment::FullTile && !fulltile_eligible(params) {
        return Err(ineligible(format!(
            "m={} and n={} must be multiples of {}",
            params.m, params.n, TILE_DIM
        )));
    }
    if variant.index == IndexMath::Fast24 && !fast_index_eligible(params) {
        return Err(ineligible(format!(
            "element offsets exceed {} (lda={}, ldb={}, ldc={})",
            FAST24_LIMIT, params.lda, params.ldb, params.ldc
        )));
    }
    Ok(())
}

fn check_operands(params: &SsymmParams, a: &MatRef<'_>, b: &MatRef<'_>, c: &MatMut<'_>) -> Result<()> {
    let ka = params.ka();
    if (a.rows(), a.cols(), a.ld()) != (ka, ka, params.lda) {
        return Err(SsymmError::DimensionMismatch(format!(
            "A is {}x{} (ld {}), expected {}x{} (ld {})",
            a.rows(),
            a.cols(),
            a.ld(),
            ka,
            ka,
            params.lda
        )));
    }
    if (b.rows(), b.cols(), b.ld()) != (params.m, params.n, params.ldb) {
        return Err(SsymmError::DimensionMismatch(format!(
            "B is {}x{} (ld {}), expected {}x{} (ld {})",
            b.rows(),
            b.cols(),
            b.ld(),
            params.m,
            params.n,
            params.ldb
        )));
    }
    if (c.rows(), c.cols(), c.ld()) != (params.m, params.n, params.ldc) {
        return Err(SsymmError::DimensionMismatch(format!(
            "C is {}x{} (ld {}), expected {}x{} (ld {})",
            c.rows(),
            c.cols(),
            c.ld(),
            params.m,
            params.n,
            params.ldc
        )));
    }
    Ok(())
}

/// Run an explicitly chosen variant.
///
/// The variant must agree with `params` and be eligible for the problem
/// shape; the descriptors must match the parameters.
pub fn launch_variant<G: TileGeometry>(
    variant: KernelVariant,
    params: &SsymmParams,
    a: MatRef<'_>,
    b: MatRef<'_>,
    c: &mut MatMut<'_>,
) -> Result<LaunchGrid> {
    check_variant(&variant, params)?;
    check_operands(params, &a, &b, c)?;

    let kernel = resolve::<G>(variant);
    let grid = kernel(variant.schedule, params, a, b, c);
    tracing::debug!(
        kernel = %variant,
        m = params.m,
        n = params.n,
        blocks_x = grid.blocks_x,
        blocks_y = grid.blocks_y,
        "ssymm launch complete"
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::DefaultGeometry;

    fn variant(alignment: Alignment, index: IndexMath) -> KernelVariant {
        KernelVariant {
            schedule: Schedule::Hardware,
            uplo: Uplo::Upper,
            side: Side::Left,
            alignment,
            index,
        }
    }

    #[test]
    fn test_fulltile_eligibility() {
        assert!(fulltile_eligible(&SsymmParams::new(Side::Left, Uplo::Upper, 64, 32)));
        assert!(!fulltile_eligible(&SsymmParams::new(Side::Left, Uplo::Upper, 64, 33)));
        assert!(fulltile_eligible(&SsymmParams::new(Side::Right, Uplo::Lower, 0, 0)));
    }

    #[test]
    fn test_fast_index_eligibility() {
        let params = SsymmParams::new(Side::Left, Uplo::Upper, 4096, 4096);
        assert!(fast_index_eligible(&params));

        let params = SsymmParams::new(Side::Left, Uplo::Upper, 4097, 4096);
        assert!(!fast_index_eligible(&params));

        let mut params = SsymmParams::new(Side::Right, Uplo::Upper, 8, 8);
        params.ldc = 1 << 22;
        assert!(!fast_index_eligible(&params));
    }

    #[test]
    fn test_rejects_ineligible_fulltile() {
        let params = SsymmParams::new(Side::Left, Uplo::Upper, 33, 33);
        let a = vec![0.0; 33 * 33];
        let b = vec![0.0; 33 * 33];
        let mut c = vec![0.0; 33 * 33];
        let err = launch_variant::<DefaultGeometry>(
            variant(Alignment::FullTile, IndexMath::Wide),
            &params,
            MatRef::new(&a, 33, 33, 33),
            MatRef::new(&b, 33, 33, 33),
            &mut MatMut::new(&mut c, 33, 33, 33),
        )
        .unwrap_err();
        assert!(matches!(err, SsymmError::IneligibleVariant { .. }));
    }

    #[test]
    fn test_rejects_mismatched_side() {
        let params = SsymmParams::new(Side::Right, Uplo::Upper, 2, 2);
        let a = vec![0.0; 4];
        let b = vec![0.0; 4];
        let mut c = vec![0.0; 4];
        let err = launch_variant::<DefaultGeometry>(
            variant(Alignment::Generic, IndexMath::Wide),
            &params,
            MatRef::new(&a, 2, 2, 2),
            MatRef::new(&b, 2, 2, 2),
            &mut MatMut::new(&mut c, 2, 2, 2),
        )
        .unwrap_err();
        assert!(err.to_string().contains("ssymm_main_hw_up_left"));
    }

    #[test]
    fn test_rejects_mismatched_descriptor() {
        let params = SsymmParams::new(Side::Left, Uplo::Upper, 3, 2);
        let a = vec![0.0; 9];
        let b = vec![0.0; 6];
        let mut c = vec![0.0; 6];
        let err = launch_variant::<DefaultGeometry>(
            variant(Alignment::Generic, IndexMath::Wide),
            &params,
            MatRef::new(&a, 3, 3, 3),
            MatRef::new(&b, 2, 3, 2),
            &mut MatMut::new(&mut c, 3, 2, 3),
        )
        .unwrap_err();
        assert!(matches!(err, SsymmError::DimensionMismatch(_)));
    }

    #[test]
    fn test_every_variant_resolves_and_runs() {
        // 64 x 64 is eligible for every variant
        let n = 64;
        let a: Vec<f32> = (0..n * n).map(|i| (i % 7) as f32).collect();
        let b: Vec<f32> = (0..n * n).map(|i| (i % 5) as f32 - 2.0).collect();

        let mut results = Vec::new();
        for v in KernelVariant::all() {
            let mut params = SsymmParams::new(v.side, v.uplo, n, n);
            params.alpha = 1.0;
            let mut c = vec![0.0; n * n];
            launch_variant::<DefaultGeometry>(
                v,
                &params,
                MatRef::new(&a, n, n, n),
                MatRef::new(&b, n, n, n),
                &mut MatMut::new(&mut c, n, n, n),
            )
            .unwrap();
            results.push((v, c));
        }

        // Variants that only differ in schedule, alignment or index math agree exactly
        for (v, c) in &results {
            let (_, base) = results
                .iter()
                .find(|(w, _)| w.side == v.side && w.uplo == v.uplo)
                .unwrap();
            assert_eq!(c, base, "{} disagrees", v);
        }
    }
}

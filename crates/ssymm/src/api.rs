use crate::core::{
    fast_index_eligible, fulltile_eligible, launch_variant, tiles_for, DefaultGeometry,
    TileGeometry,
};
use crate::error::{Result, SsymmError};
use crate::types::{
    required_len, Alignment, IndexMath, KernelVariant, MatMut, MatRef, Schedule, Side,
    SsymmParams, Uplo,
};

/// Largest launch grid dimension addressable by hardware scheduling.
pub const MAX_GRID_DIM: usize = 65_535;

/// Runtime knobs for variant selection.
///
/// # Example
///
/// ```
/// use ssymm::{SsymmOptions, Schedule};
///
/// let options = SsymmOptions {
///     schedule: Some(Schedule::Software),
///     allow_fulltile: false,
///     ..SsymmOptions::default()
/// };
/// assert!(options.allow_fast_index);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SsymmOptions {
    /// Force a schedule instead of choosing from the grid size.
    pub schedule: Option<Schedule>,
    /// Use the full-tile specialization when the shape allows it.
    pub allow_fulltile: bool,
    /// Use 24-bit address arithmetic when every offset fits.
    pub allow_fast_index: bool,
    /// Tile count per grid axis above which hardware scheduling is not used.
    pub max_grid_dim: usize,
}

impl Default for SsymmOptions {
    fn default() -> Self {
        Self {
            schedule: None,
            allow_fulltile: true,
            allow_fast_index: true,
            max_grid_dim: MAX_GRID_DIM,
        }
    }
}

/// Pick the entry point for a problem.
///
/// # Example
///
/// ```
/// use ssymm::{select_variant, Side, SsymmOptions, SsymmParams, Uplo};
///
/// let params = SsymmParams::new(Side::Left, Uplo::Lower, 64, 96);
/// let variant = select_variant(&params, &SsymmOptions::default());
/// assert_eq!(variant.name(), "fast_ssymm_main_hw_lo_left_fulltile");
/// ```
pub fn select_variant(params: &SsymmParams, options: &SsymmOptions) -> KernelVariant {
    let schedule = options.schedule.unwrap_or_else(|| {
        if tiles_for(params.m) > options.max_grid_dim || tiles_for(params.n) > options.max_grid_dim
        {
            Schedule::Software
        } else {
            Schedule::Hardware
        }
    });
    let alignment = if options.allow_fulltile && fulltile_eligible(params) {
        Alignment::FullTile
    } else {
        Alignment::Generic
    };
    let index = if options.allow_fast_index && fast_index_eligible(params) {
        IndexMath::Fast24
    } else {
        IndexMath::Wide
    };
    KernelVariant {
        schedule,
        uplo: params.uplo,
        side: params.side,
        alignment,
        index,
    }
}

fn check_ld(matrix: &'static str, ld: usize, rows: usize) -> Result<()> {
    let required = rows.max(1);
    if ld < required {
        return Err(SsymmError::InvalidLeadingDimension {
            matrix,
            ld,
            required,
        });
    }
    Ok(())
}

fn check_len(matrix: &'static str, actual: usize, rows: usize, cols: usize, ld: usize) -> Result<()> {
    let required = required_len(rows, cols, ld);
    if actual < required {
        return Err(SsymmError::BufferTooSmall {
            matrix,
            required,
            actual,
        });
    }
    Ok(())
}

/// Validate parameters against the operand buffers.
pub fn validate(params: &SsymmParams, a_len: usize, b_len: usize, c_len: usize) -> Result<()> {
    let ka = params.ka();
    check_ld("A", params.lda, ka)?;
    check_ld("B", params.ldb, params.m)?;
    check_ld("C", params.ldc, params.m)?;
    check_len("A", a_len, ka, ka, params.lda)?;
    check_len("B", b_len, params.m, params.n, params.ldb)?;
    check_len("C", c_len, params.m, params.n, params.ldc)?;
    Ok(())
}

/// `C = beta * C` over the `m x n` extent; `beta == 0` writes zeros without reading.
pub fn scale_c(c: &mut [f32], m: usize, n: usize, ldc: usize, beta: f32) {
    for col in c.chunks_mut(ldc).take(n) {
        for value in &mut col[..m] {
            *value = if beta == 0.0 { 0.0 } else { *value * beta };
        }
    }
}

/// Builder for SSYMM calls.
///
/// # Example
///
/// ```
/// use ssymm::{Ssymm, Side, Uplo};
///
/// // A = [[2, 1], [1, 3]] (upper triangle stored), B = I, C = 1
/// let a = vec![2.0f32, 0.0, 1.0, 3.0];
/// let b = vec![1.0f32, 0.0, 0.0, 1.0];
/// let mut c = vec![1.0f32; 4];
///
/// Ssymm::new(Side::Left, Uplo::Upper, 2, 2)
///     .alpha(1.0)
///     .beta(1.0)
///     .execute(&a, 2, &b, 2, &mut c, 2)
///     .unwrap();
///
/// assert_eq!(c, vec![3.0, 2.0, 2.0, 4.0]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Ssymm {
    params: SsymmParams,
    options: SsymmOptions,
}

impl Ssymm {
    /// `C = A * B` (left) or `C = B * A` (right) for an `m x n` C.
    pub fn new(side: Side, uplo: Uplo, m: usize, n: usize) -> Self {
        Self {
            params: SsymmParams::new(side, uplo, m, n),
            options: SsymmOptions::default(),
        }
    }

    pub fn alpha(mut self, alpha: f32) -> Self {
        self.params.alpha = alpha;
        self
    }

    pub fn beta(mut self, beta: f32) -> Self {
        self.params.beta = beta;
        self
    }

    pub fn options(mut self, options: SsymmOptions) -> Self {
        self.options = options;
        self
    }

    pub fn params(&self) -> &SsymmParams {
        &self.params
    }

    /// Run with the default geometry.
    ///
    /// Returns the variant that ran, or `None` when the call needed no
    /// kernel (empty output, or `alpha == 0`).
    pub fn execute(
        self,
        a: &[f32],
        lda: usize,
        b: &[f32],
        ldb: usize,
        c: &mut [f32],
        ldc: usize,
    ) -> Result<Option<KernelVariant>> {
        self.execute_with::<DefaultGeometry>(a, lda, b, ldb, c, ldc)
    }

    /// Run with a custom tile geometry.
    pub fn execute_with<G: TileGeometry>(
        mut self,
        a: &[f32],
        lda: usize,
        b: &[f32],
        ldb: usize,
        c: &mut [f32],
        ldc: usize,
    ) -> Result<Option<KernelVariant>> {
        self.params.lda = lda;
        self.params.ldb = ldb;
        self.params.ldc = ldc;
        let p = self.params;

        validate(&p, a.len(), b.len(), c.len())?;

        if p.m == 0 || p.n == 0 || (p.alpha == 0.0 && p.beta == 1.0) {
            return Ok(None);
        }
        if p.alpha == 0.0 {
            scale_c(c, p.m, p.n, p.ldc, p.beta);
            return Ok(None);
        }

        let variant = select_variant(&p, &self.options);
        tracing::debug!(kernel = %variant, m = p.m, n = p.n, "selected ssymm variant");

        let ka = p.ka();
        launch_variant::<G>(
            variant,
            &p,
            MatRef::new(a, ka, ka, p.lda),
            MatRef::new(b, p.m, p.n, p.ldb),
            &mut MatMut::new(c, p.m, p.n, p.ldc),
        )?;
        Ok(Some(variant))
    }
}

/// BLAS-style SSYMM, column-major.
///
/// Computes `C = alpha * A * B + beta * C` for [`Side::Left`] (A is `m x m`)
/// or `C = alpha * B * A + beta * C` for [`Side::Right`] (A is `n x n`),
/// reading only the `uplo` triangle of A.
#[allow(clippy::too_many_arguments)]
pub fn ssymm(
    side: Side,
    uplo: Uplo,
    m: usize,
    n: usize,
    alpha: f32,
    a: &[f32],
    lda: usize,
    b: &[f32],
    ldb: usize,
    beta: f32,
    c: &mut [f32],
    ldc: usize,
) -> Result<Option<KernelVariant>> {
    Ssymm::new(side, uplo, m, n)
        .alpha(alpha)
        .beta(beta)
        .execute(a, lda, b, ldb, c, ldc)
}

/// Symmetric product of tightly packed column-major matrices.
///
/// `a` is the symmetric factor (`m x m` for left, `n x n` for right), `b`
/// is `m x n`. Returns the `m x n` product.
///
/// # Example
///
/// ```
/// use ssymm::{symm_matmul, Side, Uplo};
///
/// // B = [[1, 2]] (1x2), A = [[2, 1], [1, 3]] stored lower
/// let a = vec![2.0f32, 1.0, 0.0, 3.0];
/// let b = vec![1.0f32, 2.0];
/// let c = symm_matmul(Side::Right, Uplo::Lower, &a, &b, 1, 2).unwrap();
/// assert_eq!(c, vec![4.0, 7.0]);
/// ```
pub fn symm_matmul(
    side: Side,
    uplo: Uplo,
    a: &[f32],
    b: &[f32],
    m: usize,
    n: usize,
) -> Result<Vec<f32>> {
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    if a.len() != ka * ka {
        return Err(SsymmError::DimensionMismatch(format!(
            "A: expected {} elements, got {}",
            ka * ka,
            a.len()
        )));
    }
    if b.len() != m * n {
        return Err(SsymmError::DimensionMismatch(format!(
            "B: expected {} elements, got {}",
            m * n,
            b.len()
        )));
    }

    let mut c = vec![0.0f32; m * n];
    let ld = m.max(1);
    Ssymm::new(side, uplo, m, n).execute(a, ka.max(1), b, ld, &mut c, ld)?;
    Ok(c)
}

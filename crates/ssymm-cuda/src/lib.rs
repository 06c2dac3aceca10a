//! CUDA backend for the tiled SSYMM kernel family.
//!
//! The kernels are compiled at runtime with NVRTC from `kernels/ssymm.cu`,
//! with the tile geometry of [`ssymm::DefaultGeometry`] injected as defines,
//! and exposed under their declared entry point names.
//!
//! # Quick Start
//!
//! ```ignore
//! use ssymm::{Side, Uplo};
//! use ssymm_cuda::ssymm_gpu;
//!
//! // Same calling convention as `ssymm::ssymm` (column-major)
//! let ran = ssymm_gpu(Side::Left, Uplo::Upper, m, n, 1.0, &a, lda, &b, ldb, 0.0, &mut c, ldc)?;
//! ```
//!
//! # Persistent Context
//!
//! ```ignore
//! use ssymm::{select_variant, SsymmOptions, SsymmParams, Side, Uplo};
//! use ssymm_cuda::{launch_ssymm, CudaContext, GpuMatrix};
//!
//! let ctx = CudaContext::new()?;
//! let a_gpu = GpuMatrix::from_host(&ctx, &a, m, m)?;
//! let b_gpu = GpuMatrix::from_host(&ctx, &b, m, n)?;
//! let mut c_gpu = GpuMatrix::alloc(&ctx, m, n)?;
//!
//! let params = SsymmParams::new(Side::Left, Uplo::Lower, m, n);
//! let variant = select_variant(&params, &SsymmOptions::default());
//! launch_ssymm(&ctx, variant, &params, &a_gpu, &b_gpu, &mut c_gpu)?;
//!
//! let c = c_gpu.to_host(&ctx)?;
//! ```
//!
//! # Performance
//!
//! The one-shot function uses a lazily-initialized global context that
//! persists across calls, so the NVRTC compile happens once per process.

mod context;
mod error;
mod kernels;
mod memory;

use once_cell::sync::OnceCell;
use ssymm::{select_variant, validate, KernelVariant, Side, SsymmOptions, SsymmParams, Uplo};

/// Global CUDA context for the one-shot API.
static GLOBAL_CONTEXT: OnceCell<CudaContext> = OnceCell::new();

/// Get or initialize the global CUDA context.
///
/// # Errors
///
/// Returns an error if CUDA initialization or kernel compilation fails.
pub fn get_global_context() -> Result<&'static CudaContext> {
    GLOBAL_CONTEXT.get_or_try_init(CudaContext::new)
}

pub use context::{CudaContext, ENTRY_POINTS};
pub use error::{CudaError, Result};
pub use kernels::{launch_config, launch_ssymm};
pub use memory::GpuMatrix;

/// One-shot SSYMM on the GPU.
///
/// Same semantics and return value as [`ssymm::ssymm`]: validation and the
/// BLAS quick returns happen on the host, everything else on the device.
#[allow(clippy::too_many_arguments)]
pub fn ssymm_gpu(
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
    let mut params = SsymmParams::new(side, uplo, m, n);
    params.alpha = alpha;
    params.beta = beta;
    params.lda = lda;
    params.ldb = ldb;
    params.ldc = ldc;
    validate(&params, a.len(), b.len(), c.len())?;

    if m == 0 || n == 0 || (alpha == 0.0 && beta == 1.0) {
        return Ok(None);
    }
    if alpha == 0.0 {
        ssymm::api::scale_c(c, m, n, ldc, beta);
        return Ok(None);
    }

    let ctx = get_global_context()?;
    let ka = params.ka();
    let a_gpu = GpuMatrix::from_host_with_ld(ctx, a, ka, ka, lda)?;
    let b_gpu = GpuMatrix::from_host_with_ld(ctx, b, m, n, ldb)?;
    let mut c_gpu = GpuMatrix::from_host_with_ld(ctx, c, m, n, ldc)?;

    let variant = select_variant(&params, &SsymmOptions::default());
    launch_ssymm(ctx, variant, &params, &a_gpu, &b_gpu, &mut c_gpu)?;

    let result = c_gpu.to_host(ctx)?;
    c.copy_from_slice(&result);
    Ok(Some(variant))
}

//! Launching the SSYMM entry points.

use crate::context::CudaContext;
use crate::error::{CudaError, Result};
use crate::memory::GpuMatrix;
use cudarc::driver::sys::CUdeviceptr;
use cudarc::driver::{DeviceRepr, LaunchAsync, LaunchConfig};
use ssymm::{DefaultGeometry, KernelVariant, LaunchGrid, SsymmParams};

/// Parameter block passed by value to every entry point.
///
/// Field order and widths match `struct SsymmParams` in `kernels/ssymm.cu`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct DeviceParams {
    a: CUdeviceptr,
    b: CUdeviceptr,
    c: CUdeviceptr,
    m: i32,
    n: i32,
    lda: i32,
    ldb: i32,
    ldc: i32,
    alpha: f32,
    beta: f32,
}

unsafe impl DeviceRepr for DeviceParams {}

fn to_i32(name: &str, value: usize) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| CudaError::DimensionMismatch(format!("{} = {} exceeds i32", name, value)))
}

fn check_operand(name: &str, mat: &GpuMatrix, rows: usize, cols: usize) -> Result<()> {
    if (mat.rows(), mat.cols()) != (rows, cols) {
        return Err(CudaError::DimensionMismatch(format!(
            "{} is {}x{}, expected {}x{}",
            name,
            mat.rows(),
            mat.cols(),
            rows,
            cols
        )));
    }
    Ok(())
}

/// Launch configuration for `variant` over an `m x n` output.
pub fn launch_config(variant: &KernelVariant, m: usize, n: usize) -> LaunchConfig {
    let grid = LaunchGrid::new::<DefaultGeometry>(variant.schedule, m, n);
    LaunchConfig {
        grid_dim: (grid.blocks_x as u32, grid.blocks_y as u32, 1),
        block_dim: CudaContext::block_dims(),
        shared_mem_bytes: 0,
    }
}

/// Run one entry point on device operands.
///
/// `params.lda/ldb/ldc` are taken from the matrices; the variant is checked
/// for eligibility the same way the CPU path checks it.
pub fn launch_ssymm(
    ctx: &CudaContext,
    variant: KernelVariant,
    params: &SsymmParams,
    a: &GpuMatrix,
    b: &GpuMatrix,
    c: &mut GpuMatrix,
) -> Result<()> {
    let ka = params.ka();
    check_operand("A", a, ka, ka)?;
    check_operand("B", b, params.m, params.n)?;
    check_operand("C", c, params.m, params.n)?;

    let mut params = *params;
    params.lda = a.ld();
    params.ldb = b.ld();
    params.ldc = c.ld();
    ssymm::core::dispatch::check_variant(&variant, &params)?;

    if params.m == 0 || params.n == 0 {
        return Ok(());
    }

    let device_params = DeviceParams {
        a: a.device_ptr(),
        b: b.device_ptr(),
        c: c.device_ptr(),
        m: to_i32("m", params.m)?,
        n: to_i32("n", params.n)?,
        lda: to_i32("lda", params.lda)?,
        ldb: to_i32("ldb", params.ldb)?,
        ldc: to_i32("ldc", params.ldc)?,
        alpha: params.alpha,
        beta: params.beta,
    };

    let cfg = launch_config(&variant, params.m, params.n);
    tracing::debug!(
        kernel = %variant,
        grid_x = cfg.grid_dim.0,
        grid_y = cfg.grid_dim.1,
        "launching ssymm kernel"
    );

    let kernel = ctx.kernel_for(&variant)?;
    unsafe {
        kernel.launch(cfg, (device_params,))?;
    }

    ctx.device().synchronize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssymm::{Alignment, IndexMath, Schedule, Side, Uplo};

    #[test]
    fn test_device_params_layout() {
        assert_eq!(std::mem::size_of::<DeviceParams>(), 56);
        assert_eq!(std::mem::align_of::<DeviceParams>(), 8);
    }

    #[test]
    fn test_launch_config() {
        let mut v = KernelVariant {
            schedule: Schedule::Hardware,
            uplo: Uplo::Upper,
            side: Side::Left,
            alignment: Alignment::Generic,
            index: IndexMath::Wide,
        };
        let cfg = launch_config(&v, 1000, 100);
        assert_eq!(cfg.grid_dim, (32, 4, 1));
        assert_eq!(cfg.block_dim, (512, 1, 1));

        v.schedule = Schedule::Software;
        let cfg = launch_config(&v, 1000, 100);
        assert_eq!(cfg.grid_dim, (4, 4, 1));
    }
}

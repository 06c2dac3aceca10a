//! GPU memory management for matrices.

use crate::context::CudaContext;
use crate::error::{CudaError, Result};
use cudarc::driver::sys::CUdeviceptr;
use cudarc::driver::CudaSlice;
use ssymm::required_len;

fn validate_dims(len: usize, rows: usize, cols: usize, ld: usize) -> Result<()> {
    if ld < rows.max(1) {
        return Err(CudaError::DimensionMismatch(format!(
            "Leading dimension {} is smaller than {} rows",
            ld, rows
        )));
    }
    let required = required_len(rows, cols, ld);
    if len < required {
        return Err(CudaError::DimensionMismatch(format!(
            "Expected at least {} elements, got {}",
            required, len
        )));
    }
    Ok(())
}

/// A single-precision matrix stored in GPU memory.
///
/// Data is stored in column-major order with an explicit leading dimension,
/// matching the host-side `MatRef` descriptors.
pub struct GpuMatrix {
    data: CudaSlice<f32>,
    rows: usize,
    cols: usize,
    ld: usize,
}

impl GpuMatrix {
    /// Upload a tightly packed column-major matrix.
    pub fn from_host(ctx: &CudaContext, data: &[f32], rows: usize, cols: usize) -> Result<Self> {
        Self::from_host_with_ld(ctx, data, rows, cols, rows.max(1))
    }

    /// Upload a column-major matrix with leading dimension `ld`.
    ///
    /// The whole buffer is copied, padding rows included.
    pub fn from_host_with_ld(
        ctx: &CudaContext,
        data: &[f32],
        rows: usize,
        cols: usize,
        ld: usize,
    ) -> Result<Self> {
        validate_dims(data.len(), rows, cols, ld)?;
        let gpu_data = ctx.device().htod_sync_copy(data)?;
        Ok(Self {
            data: gpu_data,
            rows,
            cols,
            ld,
        })
    }

    /// Allocate a zeroed, tightly packed GPU matrix.
    pub fn alloc(ctx: &CudaContext, rows: usize, cols: usize) -> Result<Self> {
        let ld = rows.max(1);
        let gpu_data = ctx.device().alloc_zeros::<f32>(ld * cols.max(1))?;
        Ok(Self {
            data: gpu_data,
            rows,
            cols,
            ld,
        })
    }

    /// Copy the whole buffer back to host, padding included.
    pub fn to_host(&self, ctx: &CudaContext) -> Result<Vec<f32>> {
        Ok(ctx.device().dtoh_sync_copy(&self.data)?)
    }

    /// Get the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the leading dimension.
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Get the raw device pointer.
    pub fn device_ptr(&self) -> CUdeviceptr {
        use cudarc::driver::DevicePtr;
        *self.data.device_ptr()
    }
}

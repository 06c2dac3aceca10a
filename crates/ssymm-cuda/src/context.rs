//! CUDA context and kernel management.

use crate::error::{CudaError, Result};
use cudarc::driver::{CudaDevice, CudaFunction};
use cudarc::nvrtc::{compile_ptx_with_opts, CompileOptions};
use ssymm::{DefaultGeometry, KernelVariant, TileGeometry};
use std::sync::Arc;

/// Kernel source code.
const KERNEL_SOURCE: &str = include_str!("../kernels/ssymm.cu");

/// Module name the kernels are loaded under.
const MODULE_NAME: &str = "ssymm";

/// Entry point names, in `KernelVariant::all()` order.
pub const ENTRY_POINTS: [&str; 32] = [
    "ssymm_main_hw_lo_right",
    "ssymm_main_hw_up_right",
    "ssymm_main_hw_lo_left",
    "ssymm_main_hw_up_left",
    "ssymm_main_sw_lo_right",
    "ssymm_main_sw_up_right",
    "ssymm_main_sw_lo_left",
    "ssymm_main_sw_up_left",
    "fast_ssymm_main_hw_lo_right",
    "fast_ssymm_main_hw_up_right",
    "fast_ssymm_main_hw_lo_left",
    "fast_ssymm_main_hw_up_left",
    "fast_ssymm_main_sw_lo_right",
    "fast_ssymm_main_sw_up_right",
    "fast_ssymm_main_sw_lo_left",
    "fast_ssymm_main_sw_up_left",
    "ssymm_main_hw_lo_right_fulltile",
    "ssymm_main_hw_up_right_fulltile",
    "ssymm_main_hw_lo_left_fulltile",
    "ssymm_main_hw_up_left_fulltile",
    "ssymm_main_sw_lo_right_fulltile",
    "ssymm_main_sw_up_right_fulltile",
    "ssymm_main_sw_lo_left_fulltile",
    "ssymm_main_sw_up_left_fulltile",
    "fast_ssymm_main_hw_lo_right_fulltile",
    "fast_ssymm_main_hw_up_right_fulltile",
    "fast_ssymm_main_hw_lo_left_fulltile",
    "fast_ssymm_main_hw_up_left_fulltile",
    "fast_ssymm_main_sw_lo_right_fulltile",
    "fast_ssymm_main_sw_up_right_fulltile",
    "fast_ssymm_main_sw_lo_left_fulltile",
    "fast_ssymm_main_sw_up_left_fulltile",
];

/// NVRTC options that inject the tile geometry into the kernel source.
fn geometry_defines<G: TileGeometry>() -> Vec<String> {
    vec![
        format!("-DTHREAD_COUNT={}", G::THREAD_COUNT),
        format!("-DGRID_W={}", G::GRID_W),
        format!("-DGRID_H={}", G::GRID_H),
    ]
}

/// CUDA context for SSYMM operations.
///
/// Compiles the kernel source once on creation and looks up the 32 loaded
/// entry points by name.
pub struct CudaContext {
    device: Arc<CudaDevice>,
}

impl CudaContext {
    /// Create a new CUDA context on the default device.
    pub fn new() -> Result<Self> {
        Self::from_device(0)
    }

    /// Create a context on a specific device.
    pub fn from_device(ordinal: usize) -> Result<Self> {
        let device = CudaDevice::new(ordinal)?;

        let options = CompileOptions {
            options: geometry_defines::<DefaultGeometry>(),
            ..Default::default()
        };
        let ptx = compile_ptx_with_opts(KERNEL_SOURCE, options)?;
        device.load_ptx(ptx, MODULE_NAME, &ENTRY_POINTS)?;

        tracing::info!(
            ordinal,
            kernels = ENTRY_POINTS.len(),
            threads = DefaultGeometry::THREAD_COUNT,
            "compiled ssymm kernels"
        );

        Ok(Self { device })
    }

    /// Get the underlying CUDA device.
    pub fn device(&self) -> &Arc<CudaDevice> {
        &self.device
    }

    /// Get a compiled entry point by name.
    pub fn get_kernel(&self, name: &str) -> Result<CudaFunction> {
        self.device
            .get_func(MODULE_NAME, name)
            .ok_or_else(|| CudaError::KernelNotFound(name.to_string()))
    }

    /// Get the entry point implementing `variant`.
    pub fn kernel_for(&self, variant: &KernelVariant) -> Result<CudaFunction> {
        self.get_kernel(&variant.name())
    }

    /// Block dimensions shared by every entry point.
    pub fn block_dims() -> (u32, u32, u32) {
        (DefaultGeometry::THREAD_COUNT as u32, 1, 1)
    }
}

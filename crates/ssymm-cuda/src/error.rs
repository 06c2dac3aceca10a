//! Error types for CUDA operations.

use thiserror::Error;

/// Errors that can occur during CUDA operations.
#[derive(Debug, Error)]
pub enum CudaError {
    /// CUDA driver error.
    #[error("CUDA driver error: {0}")]
    Driver(#[from] cudarc::driver::DriverError),

    /// NVRTC compilation error.
    #[error("NVRTC compilation error: {0}")]
    Compile(#[from] cudarc::nvrtc::CompileError),

    /// Kernel function not found.
    #[error("Kernel not found: {0}")]
    KernelNotFound(String),

    /// Dimension mismatch.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Parameter or variant rejected before launch.
    #[error(transparent)]
    Ssymm(#[from] ssymm::SsymmError),
}

/// Result type for CUDA operations.
pub type Result<T> = std::result::Result<T, CudaError>;

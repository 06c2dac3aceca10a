//! Tiled single-precision symmetric matrix multiply (SSYMM).
//!
//! Computes `C = alpha * A * B + beta * C` ([`Side::Left`]) or
//! `C = alpha * B * A + beta * C` ([`Side::Right`]) where A is symmetric and
//! only one triangle of it is stored. All matrices are column-major with an
//! explicit leading dimension, as in BLAS.
//!
//! # Quick Start
//!
//! ```
//! use ssymm::{ssymm, Side, Uplo};
//!
//! // A = [[4, 1], [1, 2]], upper triangle stored; the (1, 0) slot is ignored
//! let a = vec![4.0f32, f32::NAN, 1.0, 2.0];
//! let b = vec![1.0f32, 1.0, 0.0, 1.0];
//! let mut c = vec![0.0f32; 4];
//!
//! let ran = ssymm(Side::Left, Uplo::Upper, 2, 2, 1.0, &a, 2, &b, 2, 0.0, &mut c, 2).unwrap();
//! assert!(ran.is_some());
//! assert_eq!(c, vec![5.0, 3.0, 1.0, 2.0]);
//! ```
//!
//! # Kernel Variants
//!
//! Every call resolves to one of 32 entry points, named like
//! `fast_ssymm_main_sw_up_left_fulltile`. [`select_variant`] picks one from
//! the problem shape and [`SsymmOptions`]; [`launch_variant`] runs an
//! explicit choice after checking it is eligible.
//!
//! ```
//! use ssymm::{launch_variant, DefaultGeometry, KernelVariant, MatMut, MatRef, SsymmParams};
//!
//! let v = KernelVariant::all()
//!     .find(|v| v.name() == "ssymm_main_sw_lo_right")
//!     .unwrap();
//! let params = SsymmParams::new(v.side, v.uplo, 3, 2);
//! let a = vec![1.0f32; 4];
//! let b = vec![1.0f32; 6];
//! let mut c = vec![0.0f32; 6];
//! launch_variant::<DefaultGeometry>(
//!     v,
//!     &params,
//!     MatRef::new(&a, 2, 2, 2),
//!     MatRef::new(&b, 3, 2, 3),
//!     &mut MatMut::new(&mut c, 3, 2, 3),
//! )
//! .unwrap();
//! assert_eq!(c, vec![2.0; 6]);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): run scheduling units concurrently on rayon.

pub mod api;
pub mod core;
mod error;
pub mod reference;
pub mod types;

pub use api::{select_variant, ssymm, symm_matmul, validate, Ssymm, SsymmOptions, MAX_GRID_DIM};
pub use crate::core::{launch_variant, DefaultGeometry, LaunchGrid, TileGeometry, TILE_DIM};
pub use error::{Result, SsymmError};
pub use types::{
    required_len, Alignment, IndexMath, KernelVariant, MatMut, MatRef, Schedule, Side,
    SsymmParams, Uplo,
};

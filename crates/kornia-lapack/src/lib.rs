#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The kernels of `kornia-lapack-kernels` only understand densely packed column-major
//! storage. This crate lets callers hand them row-major or strided views instead. Every
//! operation inspects the strides of its operands, picks the cheapest way to reach column-major
//! storage and writes the results back in the caller's own layout. Symmetric and triangular
//! operands only get their triangle flag flipped, the SVD runs on the transpose, and the rest
//! is staged through the workspace.
//!
//! Scratch memory is always supplied by the caller as a single `&mut [f64]`, sized with the
//! `*_workspace` function matching the operation. Nothing allocates and no state is shared
//! between calls, so independent calls may run concurrently on independent buffers.
//!
//! # Example
//!
//! ```rust
//! use kornia_lapack::{
//!     symmetric_eigen, symmetric_eigen_workspace, EigenvectorJob, MatrixViewMut, Uplo,
//!     VectorViewMut,
//! };
//!
//! # fn main() -> Result<(), kornia_lapack::LapackError> {
//! // row-major, only the upper triangle is read
//! let mut a = [2.0, 1.0, f64::NAN, 2.0];
//! let mut w = [0.0; 2];
//! let mut workspace = vec![0.0; symmetric_eigen_workspace(EigenvectorJob::Compute, 2)?];
//!
//! symmetric_eigen(
//!     EigenvectorJob::Compute,
//!     Uplo::Upper,
//!     &mut MatrixViewMut::from_row_major(&mut a, 2, 2)?,
//!     &mut VectorViewMut::contiguous(&mut w),
//!     &mut workspace,
//! )?;
//!
//! assert!((w[0] - 1.0).abs() < 1e-12 && (w[1] - 3.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

mod cholesky;
mod eigen;
mod error;
mod flags;
mod gsvd;
mod layout;
mod schur;
mod svd;
mod symmetric_eigen;
mod triangular;
mod view;
mod workspace;

pub use cholesky::cholesky;
pub use eigen::general_eigen;
pub use error::{ConvergedRange, Convergence, LapackError, Operation};
pub use flags::{
    Diag, EigenvectorJob, FlagError, GsvdFactor, GsvdFactorJob, SchurJob, SchurVectors,
    SingularVectorJob, Uplo,
};
pub use gsvd::{gsvd, GsvdRank};
pub use layout::{classify, Layout};
pub use schur::hessenberg_schur;
pub use svd::svd;
pub use symmetric_eigen::symmetric_eigen;
pub use triangular::triangular_inverse;
pub use view::{MatrixView, MatrixViewMut, VectorView, VectorViewMut, ViewError};
pub use workspace::{
    general_eigen_workspace, gsvd_workspace, hessenberg_schur_workspace,
    symmetric_eigen_workspace, svd_workspace, GsvdWorkspace, Order,
};

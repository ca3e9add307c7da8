#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Every routine reads and writes column-major storage with an explicit leading dimension and
//! reports its status the LAPACK way: `0` for success, `-i` when argument `i` (1-based, in the
//! order of the LAPACK routine of the same name) is invalid, and a positive routine specific
//! value otherwise. Nothing here allocates; scratch memory is always supplied by the caller.

mod cholesky;
mod eigen;
mod gsvd;
mod hessenberg;
mod jacobi;
mod svd;
mod symmetric;
mod triangular;
mod util;

pub use cholesky::dpotf2;
pub use eigen::{dgeev, dgeev_work_len, dtrevc};
pub use gsvd::{dggsvd, dggsvd_work_len};
pub use hessenberg::{dgehd2, dhseqr, dhseqr_work_len, dlahqr, dlanv2, Standardized2x2};
pub use svd::{dgesvd, dgesvd_work_len};
pub use symmetric::{dsyev, dsyev_work_len};
pub use triangular::{dtrti2, dtrtri};

/// Value of `lwork` that turns a call into a workspace size query.
///
/// The routine validates its flags and dimensions, writes the required `work` length to
/// `work[0]` and returns without looking at any other buffer, so empty slices may be passed for
/// the matrices and vectors.
pub const WORKSPACE_QUERY: isize = -1;

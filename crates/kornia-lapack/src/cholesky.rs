use kornia_lapack_kernels as kernels;

use crate::error::{check_status, ensure, ArgumentMap, Failure, LapackError, Operation};
use crate::flags::Uplo;
use crate::layout::{operand_layout, Layout};
use crate::view::MatrixViewMut;

// dpotf2(uplo, n, a, lda)
const ARGS: ArgumentMap = &[(1, 1, "uplo"), (2, 2, "a"), (3, 2, "a"), (4, 2, "a")];

/// Cholesky factorization of a symmetric positive definite matrix, in place.
///
/// Computes `A = U^T * U` when `uplo` is [`Uplo::Upper`] or `A = L * L^T` when it is
/// [`Uplo::Lower`], reading and overwriting only that triangle of `a`. The other triangle is
/// never touched.
///
/// Both row-major and column-major views are factored without any copy: the upper triangle of
/// a row-major matrix is the lower triangle of the column-major kernel's view of it, so the
/// triangle is flipped instead.
///
/// # Arguments
///
/// * `uplo` - The triangle holding the matrix (position 1).
/// * `a` - The `n x n` matrix (position 2).
///
/// # Errors
///
/// * [`LapackError::InvalidArgument`] when `a` is not square or its strides overlap.
/// * [`LapackError::NotPositiveDefinite`] with the order of the first leading minor that is not
///   positive definite. The factorization is left incomplete.
///
/// # Examples
///
/// ```rust
/// use kornia_lapack::{cholesky, LapackError, MatrixViewMut, Uplo};
///
/// let mut data = [4.0, 2.0, 2.0, 5.0];
/// let mut a = MatrixViewMut::from_row_major(&mut data, 2, 2)?;
/// cholesky(Uplo::Upper, &mut a)?;
/// assert_eq!(data, [2.0, 1.0, 2.0, 2.0]);
/// # Ok::<(), LapackError>(())
/// ```
pub fn cholesky(uplo: Uplo, a: &mut MatrixViewMut<'_>) -> Result<(), LapackError> {
    ensure(a.is_square(), 2, "a")?;
    let n = a.rows();
    let (kernel_uplo, ld) = match operand_layout(a.layout(), 2, "a")? {
        Layout::RowMajor { ld } => {
            log::debug!("cholesky: row-major input, flipping {uplo:?}");
            (uplo.flipped(), ld)
        }
        Layout::ColumnMajor { ld } => (uplo, ld),
        Layout::Invalid => return Err(LapackError::invalid_argument(2, "a")),
    };
    let info = kernels::dpotf2(kernel_uplo.as_flag(), n, a.data_mut(), ld);
    check_status(
        info,
        Operation::Cholesky,
        ARGS,
        Failure::NotPositiveDefinite,
    )
}

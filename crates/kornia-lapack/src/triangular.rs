use kornia_lapack_kernels as kernels;

use crate::error::{check_status, ensure, ArgumentMap, Failure, LapackError, Operation};
use crate::flags::{Diag, Uplo};
use crate::layout::{operand_layout, Layout};
use crate::view::MatrixViewMut;

// dtrtri(uplo, diag, n, a, lda)
const ARGS: ArgumentMap = &[
    (1, 1, "uplo"),
    (2, 2, "diag"),
    (3, 3, "a"),
    (4, 3, "a"),
    (5, 3, "a"),
];

/// Inverse of a triangular matrix, in place.
///
/// Only the `uplo` triangle of `a` is read and overwritten with the inverse. With
/// [`Diag::Unit`] the diagonal is taken to be all ones and is not referenced. A row-major
/// view is inverted without a copy by flipping `uplo`, since `(A^T)^-1 = (A^-1)^T`.
///
/// # Errors
///
/// * [`LapackError::InvalidArgument`] at position 3 when `a` is not square or its strides
///   overlap.
/// * [`LapackError::Singular`] with the index of the first exact zero on the diagonal. `a` is
///   left unchanged.
pub fn triangular_inverse(
    uplo: Uplo,
    diag: Diag,
    a: &mut MatrixViewMut<'_>,
) -> Result<(), LapackError> {
    ensure(a.is_square(), 3, "a")?;
    let n = a.rows();
    let (kernel_uplo, ld) = match operand_layout(a.layout(), 3, "a")? {
        Layout::ColumnMajor { ld } => (uplo, ld),
        Layout::RowMajor { ld } => (uplo.flipped(), ld),
        Layout::Invalid => return Err(LapackError::invalid_argument(3, "a")),
    };
    let info = kernels::dtrtri(kernel_uplo.as_flag(), diag.as_flag(), n, a.data_mut(), ld);
    check_status(info, Operation::TriangularInverse, ARGS, Failure::Singular)
}

use kornia_lapack_kernels as kernels;

use crate::error::{check_status, ensure, ArgumentMap, Failure, LapackError, Operation};
use crate::flags::{EigenvectorJob, Uplo};
use crate::layout::{
    finish_vector, operand_layout, transpose_square_in_place, vector_staging_len, vector_window,
    Layout,
};
use crate::view::{MatrixViewMut, VectorViewMut};
use crate::workspace::reserve;

// dsyev(jobz, uplo, n, a, lda, w, work, lwork)
const ARGS: ArgumentMap = &[
    (1, 1, "jobz"),
    (2, 2, "uplo"),
    (3, 3, "a"),
    (4, 3, "a"),
    (5, 3, "a"),
    (6, 4, "w"),
    (7, 5, "workspace"),
    (8, 5, "workspace"),
];

/// Eigenvalues and, optionally, eigenvectors of a real symmetric matrix.
///
/// Only the `uplo` triangle of `a` is read. The `n` eigenvalues are written to `w` in
/// ascending order. With [`EigenvectorJob::Compute`] the orthonormal eigenvectors overwrite `a`,
/// column `j` belonging to `w[j]`, in the orientation of the view.
///
/// A row-major `a` is handed to the kernel as is with the triangle flipped; the eigenvectors
/// the kernel writes are then the rows of the view and are transposed in place. No copy of `a`
/// is made. A strided `w` is staged in the workspace.
///
/// The workspace must hold at least [`symmetric_eigen_workspace`] elements.
///
/// [`symmetric_eigen_workspace`]: crate::symmetric_eigen_workspace
///
/// # Errors
///
/// * [`LapackError::InvalidArgument`] for a non-square or overlapping `a` (3), a `w` whose
///   length is not `n` (4) or a short workspace (5).
/// * [`LapackError::NotConverged`] with [`Convergence::OffDiagonals`] when the iteration did
///   not converge; no eigenvalue is reliable then.
///
/// [`Convergence::OffDiagonals`]: crate::Convergence::OffDiagonals
pub fn symmetric_eigen(
    jobz: EigenvectorJob,
    uplo: Uplo,
    a: &mut MatrixViewMut<'_>,
    w: &mut VectorViewMut<'_>,
    workspace: &mut [f64],
) -> Result<(), LapackError> {
    ensure(a.is_square(), 3, "a")?;
    let n = a.rows();
    let layout = operand_layout(a.layout(), 3, "a")?;
    ensure(w.len() == n, 4, "w")?;

    let w_staging = vector_staging_len(n, w.stride());
    let mut arena = reserve(workspace, w_staging, 5, Operation::SymmetricEigen)?;
    let w_scratch = arena.take(w_staging);
    let work = arena.rest();
    let lwork = work.len() as isize;

    let (kernel_uplo, ld, transposed) = match layout {
        Layout::ColumnMajor { ld } => (uplo, ld, false),
        Layout::RowMajor { ld } => (uplo.flipped(), ld, true),
        Layout::Invalid => return Err(LapackError::invalid_argument(3, "a")),
    };
    log::debug!("symmetric eigen: n={n}, transposed={transposed}, staged w={}", w_staging > 0);

    let info = kernels::dsyev(
        jobz.as_flag(),
        kernel_uplo.as_flag(),
        n,
        a.data_mut(),
        ld,
        vector_window(w, w_scratch),
        work,
        lwork,
    );
    if info >= 0 {
        if transposed && jobz.computes() {
            transpose_square_in_place(a.data_mut(), n, ld);
        }
        finish_vector(w, w_scratch);
    }
    check_status(
        info,
        Operation::SymmetricEigen,
        ARGS,
        Failure::OffDiagonals,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetric_eigen_workspace;
    use approx::assert_relative_eq;

    #[rustfmt::skip]
    const A: [f64; 16] = [
        4.0, 1.0, -2.0, 2.0,
        1.0, 2.0, 0.0, 1.0,
        -2.0, 0.0, 3.0, -2.0,
        2.0, 1.0, -2.0, -1.0,
    ];

    #[test]
    fn test_row_major_eigenvectors() -> Result<(), LapackError> {
        let n = 4;
        let mut data = A;
        // only the upper triangle is referenced
        for i in 1..n {
            for j in 0..i {
                data[i * n + j] = f64::NAN;
            }
        }
        let mut w = [0.0; 4];
        let mut workspace = vec![0.0; symmetric_eigen_workspace(EigenvectorJob::Compute, n)?];
        let mut a = MatrixViewMut::from_row_major(&mut data, n, n)?;
        symmetric_eigen(
            EigenvectorJob::Compute,
            Uplo::Upper,
            &mut a,
            &mut VectorViewMut::contiguous(&mut w),
            &mut workspace,
        )?;
        assert!(w.windows(2).all(|p| p[0] <= p[1]));
        // A v_k = w_k v_k with v_k the k-th column of the row-major result
        for k in 0..n {
            for i in 0..n {
                let av: f64 = (0..n).map(|j| A[i * n + j] * data[j * n + k]).sum();
                assert_relative_eq!(av, w[k] * data[i * n + k], epsilon = 1e-10);
            }
        }
        Ok(())
    }

    #[test]
    fn test_strided_eigenvalues() -> Result<(), LapackError> {
        let n = 4;
        let mut col = A;
        let mut w_dense = [0.0; 4];
        let mut workspace = vec![0.0; symmetric_eigen_workspace(EigenvectorJob::Skip, n)?];
        symmetric_eigen(
            EigenvectorJob::Skip,
            Uplo::Lower,
            &mut MatrixViewMut::from_col_major(&mut col, n, n)?,
            &mut VectorViewMut::contiguous(&mut w_dense),
            &mut workspace,
        )?;
        // eigenvalues only leaves the input untouched
        assert_eq!(col, A);

        let mut row = A;
        let mut w_strided = [-7.0; 8];
        symmetric_eigen(
            EigenvectorJob::Skip,
            Uplo::Lower,
            &mut MatrixViewMut::from_row_major(&mut row, n, n)?,
            &mut VectorViewMut::new(&mut w_strided, n, 2)?,
            &mut workspace,
        )?;
        for k in 0..n {
            assert_relative_eq!(w_strided[2 * k], w_dense[k], epsilon = 1e-12);
            assert_eq!(w_strided[2 * k + 1], -7.0);
        }
        Ok(())
    }

    #[test]
    fn test_argument_errors() -> Result<(), LapackError> {
        let mut data = A;
        let mut w = [0.0; 4];
        let mut short = [0.0; 3];
        let res = symmetric_eigen(
            EigenvectorJob::Compute,
            Uplo::Upper,
            &mut MatrixViewMut::from_row_major(&mut data, 4, 4)?,
            &mut VectorViewMut::contiguous(&mut w),
            &mut short,
        );
        assert_eq!(res, Err(LapackError::invalid_argument(5, "workspace")));
        assert_eq!(data, A);

        let mut workspace = [0.0; 32];
        let res = symmetric_eigen(
            EigenvectorJob::Compute,
            Uplo::Upper,
            &mut MatrixViewMut::from_row_major(&mut data, 4, 4)?,
            &mut VectorViewMut::contiguous(&mut w[..3]),
            &mut workspace,
        );
        assert_eq!(res, Err(LapackError::invalid_argument(4, "w")));
        Ok(())
    }
}

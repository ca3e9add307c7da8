use kornia_lapack_kernels as kernels;

use crate::error::{check_status, ensure, ArgumentMap, Failure, LapackError, Operation};
use crate::flags::EigenvectorJob;
use crate::layout::{
    column_major_window, finish, finish_vector, operand_layout, optional_window, staging_len,
    vector_staging_len, vector_window,
};
use crate::view::{MatrixViewMut, VectorViewMut};
use crate::workspace::reserve;

// dgeev(jobvl, jobvr, n, a, lda, wr, wi, vl, ldvl, vr, ldvr, work, lwork)
const ARGS: ArgumentMap = &[
    (1, 1, "jobvl"),
    (2, 2, "jobvr"),
    (3, 3, "a"),
    (4, 3, "a"),
    (5, 3, "a"),
    (6, 4, "wr"),
    (7, 5, "wi"),
    (8, 6, "vl"),
    (9, 6, "vl"),
    (10, 7, "vr"),
    (11, 7, "vr"),
    (12, 8, "workspace"),
    (13, 8, "workspace"),
];

/// Checks an optional eigenvector output and drops it when it is not requested.
fn eigenvector_output<'v, 'a>(
    job: EigenvectorJob,
    view: Option<&'v mut MatrixViewMut<'a>>,
    n: usize,
    position: usize,
    name: &'static str,
) -> Result<Option<&'v mut MatrixViewMut<'a>>, LapackError> {
    if !job.computes() {
        return Ok(None);
    }
    let view = view.ok_or(LapackError::invalid_argument(position, name))?;
    ensure(view.rows() == n && view.cols() == n, position, name)?;
    operand_layout(view.layout(), position, name)?;
    Ok(Some(view))
}

/// Eigenvalues and, optionally, left and right eigenvectors of a general square matrix.
///
/// The eigenvalues are written as `wr[j] + i * wi[j]`. Complex conjugate pairs are stored in
/// consecutive slots, the one with positive imaginary part first.
///
/// Right eigenvectors satisfy `A v_j = lambda_j v_j` and left eigenvectors
/// `u_j^H A = lambda_j u_j^H`. They are stored in the columns of `vr` and `vl`, in the
/// orientation of each view: a real eigenvalue owns column `j`, and a complex pair owns columns
/// `j` and `j + 1` as `v_j = vr[:, j] + i * vr[:, j + 1]` and
/// `v_{j+1} = vr[:, j] - i * vr[:, j + 1]`. Every vector has unit Euclidean norm and its
/// largest component real.
///
/// `vl` and `vr` must be present and `n x n` when the matching job computes them and are
/// ignored otherwise. Any operand that is not column-major is staged through the workspace,
/// which must hold at least [`general_eigen_workspace`] elements. The contents of `a` are
/// destroyed.
///
/// [`general_eigen_workspace`]: crate::general_eigen_workspace
///
/// # Errors
///
/// * [`LapackError::InvalidArgument`] with the position of the malformed argument.
/// * [`LapackError::NotConverged`] when the QR iteration failed. Its [`ConvergedRange`] lists
///   the eigenvalue slots that are still valid; no eigenvectors are computed.
///
/// [`ConvergedRange`]: crate::ConvergedRange
#[allow(clippy::too_many_arguments)]
pub fn general_eigen(
    jobvl: EigenvectorJob,
    jobvr: EigenvectorJob,
    a: &mut MatrixViewMut<'_>,
    wr: &mut VectorViewMut<'_>,
    wi: &mut VectorViewMut<'_>,
    vl: Option<&mut MatrixViewMut<'_>>,
    vr: Option<&mut MatrixViewMut<'_>>,
    workspace: &mut [f64],
) -> Result<(), LapackError> {
    ensure(a.is_square(), 3, "a")?;
    let n = a.rows();
    operand_layout(a.layout(), 3, "a")?;
    ensure(wr.len() == n, 4, "wr")?;
    ensure(wi.len() == n, 5, "wi")?;
    let mut vl = eigenvector_output(jobvl, vl, n, 6, "vl")?;
    let mut vr = eigenvector_output(jobvr, vr, n, 7, "vr")?;

    let a_need = staging_len(&a.as_view());
    let vl_need = vl.as_ref().map_or(0, |v| staging_len(&v.as_view()));
    let vr_need = vr.as_ref().map_or(0, |v| staging_len(&v.as_view()));
    let wr_need = vector_staging_len(n, wr.stride());
    let wi_need = vector_staging_len(n, wi.stride());
    let staging = a_need + vl_need + vr_need + wr_need + wi_need;
    let mut arena = reserve(workspace, staging, 8, Operation::GeneralEigen)?;
    let a_scratch = arena.take(a_need);
    let vl_scratch = arena.take(vl_need);
    let vr_scratch = arena.take(vr_need);
    let wr_scratch = arena.take(wr_need);
    let wi_scratch = arena.take(wi_need);
    let work = arena.rest();
    let lwork = work.len() as isize;

    let info = {
        let a_win = column_major_window(a, a_scratch, true);
        let vl_win = optional_window(vl.as_deref_mut(), vl_scratch, false);
        let vr_win = optional_window(vr.as_deref_mut(), vr_scratch, false);
        kernels::dgeev(
            jobvl.as_flag(),
            jobvr.as_flag(),
            n,
            a_win.data,
            a_win.ld,
            vector_window(wr, wr_scratch),
            vector_window(wi, wi_scratch),
            vl_win.data,
            vl_win.ld,
            vr_win.data,
            vr_win.ld,
            work,
            lwork,
        )
    };
    if info >= 0 {
        if let Some(vl) = vl.as_deref_mut() {
            finish(vl, vl_scratch);
        }
        if let Some(vr) = vr.as_deref_mut() {
            finish(vr, vr_scratch);
        }
        finish_vector(wr, wr_scratch);
        finish_vector(wi, wi_scratch);
    }
    check_status(
        info,
        Operation::GeneralEigen,
        ARGS,
        Failure::TrailingEigenvalues { n },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Order;
    use crate::general_eigen_workspace;
    use approx::assert_relative_eq;

    /// Checks `A v = lambda v` for every right eigenvector, `a` and `v` given by accessors.
    fn check_right(
        n: usize,
        a: impl Fn(usize, usize) -> f64,
        v: impl Fn(usize, usize) -> f64,
        wr: &[f64],
        wi: &[f64],
    ) {
        let mut j = 0;
        while j < n {
            if wi[j] == 0.0 {
                for i in 0..n {
                    let av: f64 = (0..n).map(|k| a(i, k) * v(k, j)).sum();
                    assert_relative_eq!(av, wr[j] * v(i, j), epsilon = 1e-10);
                }
                j += 1;
            } else {
                // (A (x + iy)) = (wr + i wi)(x + iy)
                for i in 0..n {
                    let ax: f64 = (0..n).map(|k| a(i, k) * v(k, j)).sum();
                    let ay: f64 = (0..n).map(|k| a(i, k) * v(k, j + 1)).sum();
                    assert_relative_eq!(ax, wr[j] * v(i, j) - wi[j] * v(i, j + 1), epsilon = 1e-10);
                    assert_relative_eq!(ay, wr[j] * v(i, j + 1) + wi[j] * v(i, j), epsilon = 1e-10);
                }
                j += 2;
            }
        }
    }

    #[rustfmt::skip]
    const A: [f64; 9] = [
        1.0, -2.0, 0.5,
        3.0, 1.0, -1.0,
        0.0, 0.5, 2.0,
    ];

    #[test]
    fn test_row_major_right_vectors() -> Result<(), LapackError> {
        let n = 3;
        let mut a = A;
        let (mut wr, mut wi) = ([0.0; 3], [0.0; 3]);
        let mut vr = [0.0; 9];
        let size = general_eigen_workspace(
            EigenvectorJob::Skip,
            EigenvectorJob::Compute,
            n,
            Order::RowMajor,
        )?;
        let mut workspace = vec![0.0; size];
        general_eigen(
            EigenvectorJob::Skip,
            EigenvectorJob::Compute,
            &mut MatrixViewMut::from_row_major(&mut a, n, n)?,
            &mut VectorViewMut::contiguous(&mut wr),
            &mut VectorViewMut::contiguous(&mut wi),
            None,
            Some(&mut MatrixViewMut::from_row_major(&mut vr, n, n)?),
            &mut workspace,
        )?;
        // one real eigenvalue and a conjugate pair
        assert_eq!(wi.iter().filter(|x| **x == 0.0).count(), 1);
        check_right(n, |i, j| A[i * n + j], |i, j| vr[i * n + j], &wr, &wi);
        Ok(())
    }

    #[test]
    fn test_layouts_agree() -> Result<(), LapackError> {
        let n = 3;
        let mut col = [0.0; 9];
        for i in 0..n {
            for j in 0..n {
                col[i + j * n] = A[i * n + j];
            }
        }
        let mut row = A;
        let mut out = [[0.0; 6]; 2];
        let mut workspace = vec![0.0; 256];
        for (k, (data, row_major)) in [(&mut row, true), (&mut col, false)].into_iter().enumerate()
        {
            let mut view = if row_major {
                MatrixViewMut::from_row_major(data, n, n)?
            } else {
                MatrixViewMut::from_col_major(data, n, n)?
            };
            let (wr, wi) = out[k].split_at_mut(3);
            general_eigen(
                EigenvectorJob::Skip,
                EigenvectorJob::Skip,
                &mut view,
                &mut VectorViewMut::contiguous(wr),
                &mut VectorViewMut::contiguous(wi),
                None,
                None,
                &mut workspace,
            )?;
        }
        for (x, y) in out[0].iter().zip(out[1].iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_missing_vector_view() -> Result<(), LapackError> {
        let mut a = A;
        let (mut wr, mut wi) = ([0.0; 3], [0.0; 3]);
        let mut workspace = vec![0.0; 64];
        let res = general_eigen(
            EigenvectorJob::Compute,
            EigenvectorJob::Skip,
            &mut MatrixViewMut::from_row_major(&mut a, 3, 3)?,
            &mut VectorViewMut::contiguous(&mut wr),
            &mut VectorViewMut::contiguous(&mut wi),
            None,
            None,
            &mut workspace,
        );
        assert_eq!(res, Err(LapackError::invalid_argument(6, "vl")));
        assert_eq!(a, A);
        Ok(())
    }

    #[test]
    fn test_workspace_too_short_for_kernel() -> Result<(), LapackError> {
        let mut a = A;
        let (mut wr, mut wi) = ([0.0; 3], [0.0; 3]);
        // enough for staging the row-major input but not for the kernel
        let mut workspace = vec![0.0; 10];
        let res = general_eigen(
            EigenvectorJob::Skip,
            EigenvectorJob::Skip,
            &mut MatrixViewMut::from_row_major(&mut a, 3, 3)?,
            &mut VectorViewMut::contiguous(&mut wr),
            &mut VectorViewMut::contiguous(&mut wi),
            None,
            None,
            &mut workspace,
        );
        assert_eq!(res, Err(LapackError::invalid_argument(8, "workspace")));
        assert_eq!(wr, [0.0; 3]);
        Ok(())
    }
}

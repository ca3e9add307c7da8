use kornia_lapack_kernels as kernels;

use crate::error::{check_status, ensure, ArgumentMap, Failure, LapackError, Operation};
use crate::flags::SingularVectorJob;
use crate::layout::{
    finish_vector, operand_layout, scatter_back, scatter_transposed, transpose_square_in_place,
    vector_staging_len, vector_window, Layout, Window,
};
use crate::view::{MatrixViewMut, VectorViewMut};
use crate::workspace::reserve;

// dgesvd(jobu, jobvt, m, n, a, lda, s, u, ldu, vt, ldvt, work, lwork)
const ARGS: ArgumentMap = &[
    (1, 1, "jobu"),
    (2, 2, "jobvt"),
    (3, 3, "a"),
    (4, 3, "a"),
    (5, 3, "a"),
    (6, 3, "a"),
    (7, 4, "s"),
    (8, 5, "u"),
    (9, 5, "u"),
    (10, 6, "vt"),
    (11, 6, "vt"),
    (12, 7, "workspace"),
    (13, 7, "workspace"),
];

/// How a factor computed by the kernel reaches the caller's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    Unused,
    /// The kernel writes straight into the view's storage.
    Direct { ld: usize },
    /// The kernel writes the transpose into the view's storage; fixed up in place afterwards.
    TransposeAfter { ld: usize },
    /// The kernel writes into a staging window that is copied back afterwards.
    Staged { ld: usize },
}

impl Route {
    /// `transposed` tells whether the kernel produces the transpose of the view's matrix.
    fn plan(
        view: Option<&MatrixViewMut<'_>>,
        transposed: bool,
        position: usize,
        name: &'static str,
    ) -> Result<Self, LapackError> {
        let Some(view) = view else {
            return Ok(Route::Unused);
        };
        let (ld, column_major) = match operand_layout(view.layout(), position, name)? {
            Layout::ColumnMajor { ld } => (ld, true),
            Layout::RowMajor { ld } => (ld, false),
            Layout::Invalid => return Err(LapackError::invalid_argument(position, name)),
        };
        Ok(if column_major != transposed {
            Route::Direct { ld }
        } else if view.is_square() {
            Route::TransposeAfter { ld }
        } else if transposed {
            Route::Staged {
                ld: view.cols().max(1),
            }
        } else {
            Route::Staged {
                ld: view.rows().max(1),
            }
        })
    }

    fn staging(&self, view: Option<&MatrixViewMut<'_>>) -> usize {
        match (self, view) {
            (Route::Staged { .. }, Some(view)) => view.rows() * view.cols(),
            _ => 0,
        }
    }

    fn window<'a>(
        &self,
        view: Option<&'a mut MatrixViewMut<'_>>,
        scratch: &'a mut [f64],
    ) -> Window<'a> {
        match (*self, view) {
            (Route::Direct { ld } | Route::TransposeAfter { ld }, Some(view)) => Window {
                data: view.data_mut(),
                ld,
            },
            (Route::Staged { ld }, _) => Window { data: scratch, ld },
            _ => Window::unused(),
        }
    }

    fn deliver(&self, view: Option<&mut MatrixViewMut<'_>>, scratch: &[f64], transposed: bool) {
        let Some(view) = view else {
            return;
        };
        match *self {
            Route::TransposeAfter { ld } => {
                let n = view.rows();
                transpose_square_in_place(view.data_mut(), n, ld);
            }
            Route::Staged { ld } if transposed => scatter_transposed(scratch, ld, view),
            Route::Staged { ld } => scatter_back(scratch, ld, view),
            Route::Direct { .. } | Route::Unused => {}
        }
    }
}

/// Checks the shape of an optional singular vector output and drops it when not requested.
fn factor_output<'v, 'a>(
    job: SingularVectorJob,
    view: Option<&'v mut MatrixViewMut<'a>>,
    shape: (usize, usize),
    position: usize,
    name: &'static str,
) -> Result<Option<&'v mut MatrixViewMut<'a>>, LapackError> {
    if !job.computes() {
        return Ok(None);
    }
    let view = view.ok_or(LapackError::invalid_argument(position, name))?;
    ensure((view.rows(), view.cols()) == shape, position, name)?;
    Ok(Some(view))
}

/// Singular value decomposition `A = U * diag(s) * V^T` of an `m x n` matrix with `m >= n`.
///
/// The `n` singular values are written to `s` in descending order. `jobu` selects `U`:
/// [`SingularVectorJob::All`] writes the `m x m` orthogonal factor and
/// [`SingularVectorJob::Leading`] its first `n` columns as an `m x n` view. `jobvt` selects
/// `V^T`, which is `n x n` either way. The contents of `a` are destroyed.
///
/// Row-major operands are not copied. A row-major `a` is the column-major storage of `A^T`,
/// whose decomposition `V * diag(s) * U^T` is computed instead: `U` and `V^T` swap roles and
/// land directly in row-major outputs. Square factors in the other orientation are transposed in
/// place and only a thin `U` whose orientation differs from `a` is staged through the
/// workspace, which must hold at least [`svd_workspace`] elements.
///
/// [`svd_workspace`]: crate::svd_workspace
///
/// # Errors
///
/// * [`LapackError::InvalidArgument`] for a malformed argument, including `m < n` (3).
/// * [`LapackError::NotConverged`] with [`Convergence::Superdiagonals`] when the iteration did
///   not converge.
///
/// [`Convergence::Superdiagonals`]: crate::Convergence::Superdiagonals
///
/// # Examples
///
/// ```rust
/// use kornia_lapack::{svd, svd_workspace, LapackError, MatrixViewMut, SingularVectorJob, VectorViewMut};
///
/// let mut data = [3.0, 0.0, 0.0, -4.0, 0.0, 0.0];
/// let mut s = [0.0; 2];
/// let job = SingularVectorJob::Skip;
/// let mut workspace = vec![0.0; svd_workspace(job, job, 3, 2)?];
/// svd(
///     job,
///     job,
///     &mut MatrixViewMut::from_row_major(&mut data, 3, 2)?,
///     &mut VectorViewMut::contiguous(&mut s),
///     None,
///     None,
///     &mut workspace,
/// )?;
/// assert!((s[0] - 4.0).abs() < 1e-12 && (s[1] - 3.0).abs() < 1e-12);
/// # Ok::<(), LapackError>(())
/// ```
pub fn svd(
    jobu: SingularVectorJob,
    jobvt: SingularVectorJob,
    a: &mut MatrixViewMut<'_>,
    s: &mut VectorViewMut<'_>,
    u: Option<&mut MatrixViewMut<'_>>,
    vt: Option<&mut MatrixViewMut<'_>>,
    workspace: &mut [f64],
) -> Result<(), LapackError> {
    let (m, n) = (a.rows(), a.cols());
    ensure(m >= n, 3, "a")?;
    let (lda, transposed) = match operand_layout(a.layout(), 3, "a")? {
        Layout::ColumnMajor { ld } => (ld, false),
        Layout::RowMajor { ld } => (ld, true),
        Layout::Invalid => return Err(LapackError::invalid_argument(3, "a")),
    };
    ensure(s.len() == n, 4, "s")?;
    let ucols = if jobu == SingularVectorJob::All { m } else { n };
    let mut u = factor_output(jobu, u, (m, ucols), 5, "u")?;
    let mut vt = factor_output(jobvt, vt, (n, n), 6, "vt")?;
    let u_route = Route::plan(u.as_deref(), transposed, 5, "u")?;
    let vt_route = Route::plan(vt.as_deref(), transposed, 6, "vt")?;

    let u_need = u_route.staging(u.as_deref());
    let s_need = vector_staging_len(n, s.stride());
    let mut arena = reserve(workspace, u_need + s_need, 7, Operation::Svd)?;
    let u_scratch = arena.take(u_need);
    let s_scratch = arena.take(s_need);
    let work = arena.rest();
    let lwork = work.len() as isize;
    log::debug!("svd: {m}x{n}, transposed={transposed}, u {u_route:?}, vt {vt_route:?}");

    let info = {
        let u_win = u_route.window(u.as_deref_mut(), u_scratch);
        let vt_win = vt_route.window(vt.as_deref_mut(), &mut []);
        // the kernel's left factor is V when it runs on A^T
        let (km, kn, kjobu, kjobvt, left, right) = if transposed {
            (n, m, jobvt, jobu, vt_win, u_win)
        } else {
            (m, n, jobu, jobvt, u_win, vt_win)
        };
        kernels::dgesvd(
            kjobu.as_flag(),
            kjobvt.as_flag(),
            km,
            kn,
            a.data_mut(),
            lda,
            vector_window(s, s_scratch),
            left.data,
            left.ld,
            right.data,
            right.ld,
            work,
            lwork,
        )
    };
    if info >= 0 {
        u_route.deliver(u.as_deref_mut(), u_scratch, transposed);
        vt_route.deliver(vt.as_deref_mut(), &[], transposed);
        finish_vector(s, s_scratch);
    }
    check_status(info, Operation::Svd, ARGS, Failure::Superdiagonals)
}

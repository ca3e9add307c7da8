use kornia_lapack_kernels as kernels;

use crate::error::{check_status, ensure, ArgumentMap, Failure, LapackError, Operation};
use crate::flags::{GsvdFactor, GsvdFactorJob};
use crate::layout::{
    column_major_window, finish, finish_vector, operand_layout, optional_window, staging_len,
    vector_staging_len, vector_window,
};
use crate::view::{MatrixViewMut, VectorViewMut};
use crate::workspace::reserve;

// dggsvd(jobu, jobv, jobq, m, n, p, k, l, a, lda, b, ldb, alpha, beta,
//        u, ldu, v, ldv, q, ldq, work, iwork)
const ARGS: ArgumentMap = &[
    (1, 1, "jobu"),
    (2, 2, "jobv"),
    (3, 3, "jobq"),
    (4, 4, "a"),
    (5, 4, "a"),
    (6, 5, "b"),
    (9, 4, "a"),
    (10, 4, "a"),
    (11, 5, "b"),
    (12, 5, "b"),
    (13, 6, "alpha"),
    (14, 7, "beta"),
    (15, 8, "u"),
    (16, 8, "u"),
    (17, 9, "v"),
    (18, 9, "v"),
    (19, 10, "q"),
    (20, 10, "q"),
    (21, 11, "workspace"),
    (22, 12, "iwork"),
];

/// Effective rank split of a generalized SVD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GsvdRank {
    /// Number of pairs with `alpha = 1`, `beta = 0`.
    pub k: usize,
    /// Number of pairs in the mixed range, `K + L` being the rank of `[A; B]`.
    pub l: usize,
}

fn factor_output<'v, 'a>(
    job: GsvdFactorJob,
    view: Option<&'v mut MatrixViewMut<'a>>,
    order: usize,
    position: usize,
    name: &'static str,
) -> Result<Option<&'v mut MatrixViewMut<'a>>, LapackError> {
    if !job.computes() {
        return Ok(None);
    }
    let view = view.ok_or(LapackError::invalid_argument(position, name))?;
    ensure(view.rows() == order && view.cols() == order, position, name)?;
    operand_layout(view.layout(), position, name)?;
    Ok(Some(view))
}

/// Generalized singular value decomposition of the pair `A` (`m x n`) and `B` (`p x n`):
///
/// ```text
/// U^T A Q = D1 (0 R),   V^T B Q = D2 (0 R)
/// ```
///
/// with orthogonal `U` (`m x m`), `V` (`p x p`) and `Q` (`n x n`), and `R` upper triangular of
/// order `K + L`, the effective rank of `[A; B]`. The returned [`GsvdRank`] holds `K` and `L`.
/// `alpha` and `beta`, both of length `n`, receive the pairs:
///
/// * `alpha[0..K] = 1` and `beta[0..K] = 0`;
/// * in the mixed range `K..K+L`, `alpha^2 + beta^2 = 1` with `alpha` descending; when
///   `m < K + L` the entries from `m` on are `0` and `1`;
/// * zero from `K + L` on.
///
/// On return `R` is stored in `a(0..min(m, K+L), n-K-L..n)` and, when `m < K + L`, its remaining
/// rows in `b(m-K..L, n+m-K-L..n)`. Each requested factor must be present and square.
///
/// The kernel sorts the mixed range through the integer workspace `iwork`, at least `n`
/// elements long. That permutation is applied here to `alpha`, `beta`, the matching columns of
/// the requested factors and the rows and columns of `R`, so the two identities above still
/// hold; `R` is then triangular up to that symmetric permutation. Operands that are not
/// column-major are staged through `workspace`, sized by [`gsvd_workspace`].
///
/// [`gsvd_workspace`]: crate::gsvd_workspace
///
/// # Errors
///
/// * [`LapackError::InvalidArgument`] with the position of the malformed argument.
/// * [`LapackError::RankDeficient`] when the joint diagonalization did not converge. No part
///   of the output is usable.
#[allow(clippy::too_many_arguments)]
pub fn gsvd(
    jobu: GsvdFactorJob,
    jobv: GsvdFactorJob,
    jobq: GsvdFactorJob,
    a: &mut MatrixViewMut<'_>,
    b: &mut MatrixViewMut<'_>,
    alpha: &mut VectorViewMut<'_>,
    beta: &mut VectorViewMut<'_>,
    u: Option<&mut MatrixViewMut<'_>>,
    v: Option<&mut MatrixViewMut<'_>>,
    q: Option<&mut MatrixViewMut<'_>>,
    workspace: &mut [f64],
    iwork: &mut [i32],
) -> Result<GsvdRank, LapackError> {
    let (m, n, p) = (a.rows(), a.cols(), b.rows());
    operand_layout(a.layout(), 4, "a")?;
    ensure(b.cols() == n, 5, "b")?;
    operand_layout(b.layout(), 5, "b")?;
    ensure(alpha.len() == n, 6, "alpha")?;
    ensure(beta.len() == n, 7, "beta")?;
    let mut u = factor_output(jobu, u, m, 8, "u")?;
    let mut v = factor_output(jobv, v, p, 9, "v")?;
    let mut q = factor_output(jobq, q, n, 10, "q")?;
    ensure(iwork.len() >= n, 12, "iwork")?;

    let a_need = staging_len(&a.as_view());
    let b_need = staging_len(&b.as_view());
    let u_need = u.as_ref().map_or(0, |x| staging_len(&x.as_view()));
    let v_need = v.as_ref().map_or(0, |x| staging_len(&x.as_view()));
    let q_need = q.as_ref().map_or(0, |x| staging_len(&x.as_view()));
    let alpha_need = vector_staging_len(n, alpha.stride());
    let beta_need = vector_staging_len(n, beta.stride());
    let staging = a_need + b_need + u_need + v_need + q_need + alpha_need + beta_need;
    let mut arena = reserve(workspace, staging, 11, Operation::Gsvd)?;
    let a_scratch = arena.take(a_need);
    let b_scratch = arena.take(b_need);
    let u_scratch = arena.take(u_need);
    let v_scratch = arena.take(v_need);
    let q_scratch = arena.take(q_need);
    let alpha_scratch = arena.take(alpha_need);
    let beta_scratch = arena.take(beta_need);
    let work = arena.rest();

    let (mut k, mut l) = (0, 0);
    let info = {
        let a_win = column_major_window(a, a_scratch, true);
        let b_win = column_major_window(b, b_scratch, true);
        let u_win = optional_window(u.as_deref_mut(), u_scratch, false);
        let v_win = optional_window(v.as_deref_mut(), v_scratch, false);
        let q_win = optional_window(q.as_deref_mut(), q_scratch, false);
        kernels::dggsvd(
            jobu.as_flag(GsvdFactor::U),
            jobv.as_flag(GsvdFactor::V),
            jobq.as_flag(GsvdFactor::Q),
            m,
            n,
            p,
            &mut k,
            &mut l,
            a_win.data,
            a_win.ld,
            b_win.data,
            b_win.ld,
            vector_window(alpha, alpha_scratch),
            vector_window(beta, beta_scratch),
            u_win.data,
            u_win.ld,
            v_win.data,
            v_win.ld,
            q_win.data,
            q_win.ld,
            work,
            iwork,
        )
    };
    if info >= 0 {
        finish(a, a_scratch);
        finish(b, b_scratch);
        if let Some(u) = u.as_deref_mut() {
            finish(u, u_scratch);
        }
        if let Some(v) = v.as_deref_mut() {
            finish(v, v_scratch);
        }
        if let Some(q) = q.as_deref_mut() {
            finish(q, q_scratch);
        }
        finish_vector(alpha, alpha_scratch);
        finish_vector(beta, beta_scratch);
    }
    check_status(info, Operation::Gsvd, ARGS, Failure::RankDeficient)?;

    let rank = GsvdRank { k, l };
    let factors = Factors {
        u: u.as_deref_mut(),
        v: v.as_deref_mut(),
        q: q.as_deref_mut(),
    };
    let swaps = reorder(rank, iwork, a, alpha, beta, factors);
    log::debug!("gsvd: K={k}, L={l}, {swaps} reordering swaps");
    Ok(rank)
}

/// The requested orthogonal factors.
struct Factors<'v, 'a, 'b, 'c> {
    u: Option<&'v mut MatrixViewMut<'a>>,
    v: Option<&'v mut MatrixViewMut<'b>>,
    q: Option<&'v mut MatrixViewMut<'c>>,
}

/// Applies the kernel's sorting swaps to the pairs, the factor columns and `R`.
///
/// Returns the number of swaps performed.
fn reorder(
    rank: GsvdRank,
    iwork: &[i32],
    a: &mut MatrixViewMut<'_>,
    alpha: &mut VectorViewMut<'_>,
    beta: &mut VectorViewMut<'_>,
    mut factors: Factors<'_, '_, '_, '_>,
) -> usize {
    let (m, n) = (a.rows(), a.cols());
    let GsvdRank { k, l } = rank;
    let r = k + l;
    let mixed = k..m.min(r);
    let mut swaps = 0;
    for i in mixed.clone() {
        let Some(j) = iwork
            .get(i)
            .and_then(|&x| usize::try_from(x - 1).ok())
            .filter(|j| mixed.contains(j) && *j != i)
        else {
            continue;
        };
        swaps += 1;
        alpha.swap(i, j);
        beta.swap(i, j);
        if let Some(u) = factors.u.as_deref_mut() {
            u.swap_columns(i, j);
        }
        if let Some(v) = factors.v.as_deref_mut() {
            v.swap_columns(i - k, j - k);
        }
        if let Some(q) = factors.q.as_deref_mut() {
            q.swap_columns(n - r + i, n - r + j);
        }
        // rows i and j of R, then its columns i and j; rows of R past m hold zeros there
        for c in n - r..n {
            a.swap_entries((i, c), (j, c));
        }
        for t in 0..m.min(r) {
            a.swap_entries((t, n - r + i), (t, n - r + j));
        }
    }
    swaps
}

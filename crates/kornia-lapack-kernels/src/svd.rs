use crate::jacobi::{orthogonalize_columns, sort_by_column_norm};
use crate::util::{at, complete_orthonormal, flag, required_len, EPS, SAFE_MIN};
use crate::WORKSPACE_QUERY;

/// Which part of a singular vector matrix `dgesvd` computes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Job {
    All,
    Thin,
    Overwrite,
    None,
}

impl Job {
    fn parse(c: u8) -> Option<Self> {
        match flag(c) {
            b'A' => Some(Self::All),
            b'S' => Some(Self::Thin),
            b'O' => Some(Self::Overwrite),
            b'N' => Some(Self::None),
            _ => None,
        }
    }
}

/// Minimum (and optimal) `lwork` of [`dgesvd`] for an `m x n` matrix.
pub fn dgesvd_work_len(m: usize, n: usize) -> usize {
    let (mn, mx) = (m.min(n), m.max(n));
    (mx * mn + mn * mn + mx).max(1)
}

/// Singular value decomposition `A = U * diag(s) * V^T` of a general `m x n` matrix.
///
/// `jobu` selects the left vectors: `b'A'` all `m` columns into `u`, `b'S'` the leading
/// `min(m, n)` columns into `u`, `b'O'` the leading `min(m, n)` columns over `A`, `b'N'` none.
/// `jobvt` selects the rows of `V^T` the same way, written into `vt`. `jobu` and `jobvt` cannot
/// both be `b'O'`. Unless one of them is `b'O'`, the contents of `A` are destroyed.
///
/// Singular values are returned in descending order. The decomposition is computed with
/// one-sided Jacobi rotations on a copy held in `work`; basis vectors for zero singular values
/// and the full `b'A'` bases are completed to orthonormal sets.
///
/// # Returns
///
/// * `0` on success.
/// * `-i` if the `i`-th argument is invalid.
/// * `k > 0` if `k` superdiagonals of the implicit bidiagonal form did not converge.
#[allow(clippy::too_many_arguments)]
pub fn dgesvd(
    jobu: u8,
    jobvt: u8,
    m: usize,
    n: usize,
    a: &mut [f64],
    lda: usize,
    s: &mut [f64],
    u: &mut [f64],
    ldu: usize,
    vt: &mut [f64],
    ldvt: usize,
    work: &mut [f64],
    lwork: isize,
) -> i32 {
    let Some(ju) = Job::parse(jobu) else {
        return -1;
    };
    let Some(jv) = Job::parse(jobvt) else {
        return -2;
    };
    if ju == Job::Overwrite && jv == Job::Overwrite {
        return -2;
    }
    let (mn, mx) = (m.min(n), m.max(n));
    let ucols = match ju {
        Job::All => m,
        Job::Thin => mn,
        _ => 0,
    };
    let vtrows = match jv {
        Job::All => n,
        Job::Thin => mn,
        _ => 0,
    };
    if lda < m.max(1) {
        return -6;
    }
    if ldu < 1 || (ucols > 0 && ldu < m) {
        return -9;
    }
    if ldvt < 1 || (vtrows > 0 && ldvt < vtrows) {
        return -11;
    }
    if work.is_empty() {
        return -12;
    }
    let minwork = dgesvd_work_len(m, n);
    if lwork == WORKSPACE_QUERY {
        work[0] = minwork as f64;
        return 0;
    }
    if lwork < minwork as isize || work.len() < minwork {
        return -13;
    }
    if a.len() < required_len(m, n, lda) {
        return -5;
    }
    if s.len() < mn {
        return -7;
    }
    if u.len() < required_len(m, ucols, ldu) {
        return -8;
    }
    if vt.len() < required_len(vtrows, n, ldvt) {
        return -10;
    }
    if mn == 0 {
        return 0;
    }

    // g holds the tall orientation: A itself, or A^T when m < n
    let tall = m >= n;
    let (g, rest) = work.split_at_mut(mx * mn);
    let (v, rest) = rest.split_at_mut(mn * mn);
    let tmp = &mut rest[..mx];
    for j in 0..n {
        for i in 0..m {
            let x = a[at(i, j, lda)];
            if tall {
                g[at(i, j, mx)] = x;
            } else {
                g[at(j, i, mx)] = x;
            }
        }
    }

    let pending = orthogonalize_columns(mx, mx, mn, g, mx, v, mn);
    sort_by_column_norm(mx, mx, mn, g, mx, v, mn, mn, s);

    // normalized columns of g; zero for null directions, completed below
    let valid = |sigma: f64| sigma > SAFE_MIN / EPS;
    for (j, &sigma) in s.iter().enumerate().take(mn) {
        let scale = if valid(sigma) { 1.0 / sigma } else { 0.0 };
        for i in 0..mx {
            g[at(i, j, mx)] *= scale;
        }
    }

    if tall {
        // A = g * diag(s) * v^T
        match ju {
            Job::All | Job::Thin => write_basis(g, mx, m, mn, u, ldu, ucols, tmp),
            Job::Overwrite => write_basis(g, mx, m, mn, a, lda, mn, tmp),
            Job::None => {}
        }
        let target = match jv {
            Job::All | Job::Thin => Some((&mut *vt, ldvt)),
            Job::Overwrite => Some((&mut *a, lda)),
            Job::None => None,
        };
        if let Some((dst, ld)) = target {
            for j in 0..n {
                for i in 0..n {
                    dst[at(i, j, ld)] = v[at(j, i, mn)];
                }
            }
        }
    } else {
        // A^T = g * diag(s) * v^T, so U = v and V = g
        let target = match ju {
            Job::All | Job::Thin => Some((&mut *u, ldu)),
            Job::Overwrite => Some((&mut *a, lda)),
            Job::None => None,
        };
        if let Some((dst, ld)) = target {
            for j in 0..m {
                for i in 0..m {
                    dst[at(i, j, ld)] = v[at(i, j, mn)];
                }
            }
        }
        let rows = match jv {
            Job::Overwrite => mn,
            _ => vtrows,
        };
        let target = match jv {
            Job::All | Job::Thin => Some((&mut *vt, ldvt)),
            Job::Overwrite => Some((&mut *a, lda)),
            Job::None => None,
        };
        if let Some((dst, ld)) = target {
            for r in 0..rows {
                for i in 0..n {
                    dst[at(r, i, ld)] = if r < mn { g[at(i, r, mx)] } else { 0.0 };
                }
            }
            complete_orthonormal(dst, ld, 1, n, rows, tmp);
        }
    }

    if pending > 0 {
        return pending.min(mn.saturating_sub(1)).max(1) as i32;
    }
    0
}

/// Copies the first `min(ncols, avail)` columns of `g` into `dst`, zero-fills the remaining
/// `ncols` columns and completes the result to an orthonormal `dim x ncols` set.
#[allow(clippy::too_many_arguments)]
fn write_basis(
    g: &[f64],
    ldg: usize,
    dim: usize,
    avail: usize,
    dst: &mut [f64],
    ld: usize,
    ncols: usize,
    tmp: &mut [f64],
) {
    for j in 0..ncols {
        for i in 0..dim {
            dst[at(i, j, ld)] = if j < avail { g[at(i, j, ldg)] } else { 0.0 };
        }
    }
    complete_orthonormal(dst, 1, ld, dim, ncols, tmp);
}

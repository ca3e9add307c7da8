use crate::jacobi::{jacobi_rotation, swap_columns};
use crate::util::{at, flag, required_len, set_identity, EPS, MAX_SWEEPS, SAFE_MIN};
use crate::WORKSPACE_QUERY;

/// Minimum (and optimal) `lwork` of [`dsyev`] for order `n`.
pub fn dsyev_work_len(n: usize) -> usize {
    (n * n).max(1)
}

/// Eigenvalues and, optionally, eigenvectors of a real symmetric matrix.
///
/// Only the `uplo` triangle of `A` is read. With `jobz = b'V'` the orthonormal eigenvectors
/// overwrite `A` column by column, matching the ascending eigenvalues stored in `w`. With
/// `jobz = b'N'`, `A` is left untouched.
///
/// The eigenvalues come from cyclic Jacobi sweeps on a copy held in `work`. Passing
/// `lwork = WORKSPACE_QUERY` stores the required length in `work[0]` and returns.
///
/// # Returns
///
/// * `0` on success.
/// * `-i` if the `i`-th argument is invalid.
/// * `k > 0` if `k` off-diagonal elements did not converge to zero.
#[allow(clippy::too_many_arguments)]
pub fn dsyev(
    jobz: u8,
    uplo: u8,
    n: usize,
    a: &mut [f64],
    lda: usize,
    w: &mut [f64],
    work: &mut [f64],
    lwork: isize,
) -> i32 {
    let wantz = match flag(jobz) {
        b'V' => true,
        b'N' => false,
        _ => return -1,
    };
    let upper = match flag(uplo) {
        b'U' => true,
        b'L' => false,
        _ => return -2,
    };
    if lda < n.max(1) {
        return -5;
    }
    if work.is_empty() {
        return -7;
    }
    let minwork = dsyev_work_len(n);
    if lwork == WORKSPACE_QUERY {
        work[0] = minwork as f64;
        return 0;
    }
    if lwork < minwork as isize || work.len() < minwork {
        return -8;
    }
    if a.len() < required_len(n, n, lda) {
        return -4;
    }
    if w.len() < n {
        return -6;
    }
    if n == 0 {
        return 0;
    }

    // full symmetric copy of the referenced triangle
    let s = &mut work[..n * n];
    for j in 0..n {
        for i in 0..n {
            let (r, c) = if upper {
                (i.min(j), i.max(j))
            } else {
                (i.max(j), i.min(j))
            };
            s[at(i, j, n)] = a[at(r, c, lda)];
        }
    }
    if wantz {
        set_identity(a, n, lda);
    }

    let mut converged = false;
    for _ in 0..MAX_SWEEPS {
        let mut rotations = 0;
        for p in 0..n.saturating_sub(1) {
            for q in p + 1..n {
                let (app, aqq, apq) = (s[at(p, p, n)], s[at(q, q, n)], s[at(p, q, n)]);
                if is_negligible(app, aqq, apq) {
                    continue;
                }
                rotations += 1;
                let (c, sn) = jacobi_rotation(app, aqq, apq);
                let t = sn / c;
                s[at(p, p, n)] = app - t * apq;
                s[at(q, q, n)] = aqq + t * apq;
                s[at(p, q, n)] = 0.0;
                s[at(q, p, n)] = 0.0;
                for k in (0..n).filter(|&k| k != p && k != q) {
                    let (skp, skq) = (s[at(k, p, n)], s[at(k, q, n)]);
                    let (kp, kq) = (c * skp - sn * skq, sn * skp + c * skq);
                    s[at(k, p, n)] = kp;
                    s[at(p, k, n)] = kp;
                    s[at(k, q, n)] = kq;
                    s[at(q, k, n)] = kq;
                }
                if wantz {
                    crate::jacobi::rotate_columns(a, lda, n, p, q, c, sn);
                }
            }
        }
        if rotations == 0 {
            converged = true;
            break;
        }
    }

    for (i, wi) in w.iter_mut().enumerate().take(n) {
        *wi = s[at(i, i, n)];
    }

    // ascending selection sort carrying the eigenvectors along
    for i in 0..n {
        let mut k = i;
        for j in i + 1..n {
            if w[j] < w[k] {
                k = j;
            }
        }
        if k != i {
            w.swap(i, k);
            if wantz {
                swap_columns(a, lda, n, i, k);
            }
        }
    }

    if converged {
        return 0;
    }
    let mut pending = 0;
    for p in 0..n - 1 {
        for q in p + 1..n {
            if !is_negligible(s[at(p, p, n)], s[at(q, q, n)], s[at(p, q, n)]) {
                pending += 1;
            }
        }
    }
    pending.max(1)
}

#[inline]
fn is_negligible(app: f64, aqq: f64, apq: f64) -> bool {
    apq.abs() <= (EPS * (app.abs() * aqq.abs()).sqrt()).max(SAFE_MIN)
}

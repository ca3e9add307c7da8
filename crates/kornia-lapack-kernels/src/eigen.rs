//! Eigenvectors of quasi-triangular matrices and the general eigen driver.

use crate::hessenberg::{dgehd2, dlahqr};
use crate::util::{
    at, flag, lartg, nrm2, required_len, rot_in_place, set_identity, Complex, EPS, SAFE_MIN,
};
use crate::WORKSPACE_QUERY;

/// Right and/or left eigenvectors of an upper quasi-triangular matrix `T` in Schur canonical
/// form, back-transformed by the Schur vectors.
///
/// `side` is `b'R'`, `b'L'` or `b'B'`. On entry `vr` (and `vl`) hold the `n x n` Schur vectors
/// `Z` of `A = Z T Z^T`; on exit they hold the eigenvectors of `A`. A complex pair at `j, j+1`
/// is stored as real part in column `j` and imaginary part in column `j + 1`, for the
/// eigenvalue with positive imaginary part. Vectors are not normalized. `work` needs `4 n`
/// entries.
#[allow(clippy::too_many_arguments)]
pub fn dtrevc(
    side: u8,
    n: usize,
    t: &[f64],
    ldt: usize,
    vl: &mut [f64],
    ldvl: usize,
    vr: &mut [f64],
    ldvr: usize,
    work: &mut [f64],
) -> i32 {
    let (left, right) = match flag(side) {
        b'R' => (false, true),
        b'L' => (true, false),
        b'B' => (true, true),
        _ => return -1,
    };
    if ldt < n.max(1) {
        return -4;
    }
    if ldvl < 1 || (left && ldvl < n) {
        return -6;
    }
    if ldvr < 1 || (right && ldvr < n) {
        return -8;
    }
    if t.len() < required_len(n, n, ldt) {
        return -3;
    }
    if left && vl.len() < required_len(n, n, ldvl) {
        return -5;
    }
    if right && vr.len() < required_len(n, n, ldvr) {
        return -7;
    }
    if work.len() < 4 * n {
        return -9;
    }
    if right {
        right_vectors(n, t, ldt, vr, ldvr, work);
    }
    if left {
        left_vectors(n, t, ldt, vl, ldvl, work);
    }
    0
}

/// Imaginary part of the eigenvalue of the standardized 2x2 block at `k`.
#[inline]
fn block_imag(t: &[f64], ldt: usize, k: usize) -> f64 {
    t[at(k, k + 1, ldt)].abs().sqrt() * t[at(k + 1, k, ldt)].abs().sqrt()
}

/// Solves `[[a11, a12], [a21, a22]] x = rhs` by Cramer's rule, perturbing a tiny determinant.
#[inline]
fn solve_2x2(
    a11: Complex,
    a12: Complex,
    a21: Complex,
    a22: Complex,
    rhs: (Complex, Complex),
    smin: f64,
) -> (Complex, Complex) {
    let mut det = a11 * a22 - a12 * a21;
    if det.abs1() < smin {
        det = Complex::new(smin, 0.0);
    }
    (
        (rhs.0 * a22 - a12 * rhs.1) / det,
        (a11 * rhs.1 - a21 * rhs.0) / det,
    )
}

fn right_vectors(n: usize, t: &[f64], ldt: usize, vr: &mut [f64], ldvr: usize, work: &mut [f64]) {
    let (xr, rest) = work.split_at_mut(n);
    let (xi, rest) = rest.split_at_mut(n);
    let (yr, rest) = rest.split_at_mut(n);
    let yi = &mut rest[..n];
    let smlnum = SAFE_MIN * (n as f64 / EPS);
    let x_at = |xr: &[f64], xi: &[f64], c: usize| Complex::new(xr[c], xi[c]);

    let mut ki = n;
    while ki > 0 {
        let pair = ki >= 2 && t[at(ki - 1, ki - 2, ldt)] != 0.0;
        let k0 = if pair { ki - 2 } else { ki - 1 };
        let kend = ki - 1;
        let wr = t[at(k0, k0, ldt)];
        let wi = if pair { block_imag(t, ldt, k0) } else { 0.0 };
        let lambda = Complex::new(wr, wi);
        let smin = (EPS * (wr.abs() + wi.abs())).max(smlnum);

        xr.fill(0.0);
        xi.fill(0.0);
        if pair {
            let (b, c) = (t[at(k0, k0 + 1, ldt)], t[at(k0 + 1, k0, ldt)]);
            if b.abs() >= c.abs() {
                xr[k0] = 1.0;
                xi[k0 + 1] = wi / b;
            } else {
                xi[k0] = wi / c;
                xr[k0 + 1] = 1.0;
            }
        } else {
            xr[k0] = 1.0;
        }

        // back substitution through the blocks above the eigenvalue
        let mut j = k0;
        while j > 0 {
            let block2 = j >= 2 && t[at(j - 1, j - 2, ldt)] != 0.0;
            let row_sum = |xr: &[f64], xi: &[f64], r: usize| {
                (j..=kend).fold(Complex::ZERO, |acc, c| {
                    acc + x_at(xr, xi, c).scale(t[at(r, c, ldt)])
                })
            };
            if !block2 {
                let r = j - 1;
                let rhs = row_sum(&*xr, &*xi, r);
                let mut d = Complex::new(t[at(r, r, ldt)], 0.0) - lambda;
                if d.abs1() < smin {
                    d = Complex::new(smin, 0.0);
                }
                let x = -rhs / d;
                (xr[r], xi[r]) = (x.re, x.im);
                j -= 1;
            } else {
                let (r1, r2) = (j - 2, j - 1);
                let rhs = (-row_sum(&*xr, &*xi, r1), -row_sum(&*xr, &*xi, r2));
                let (x1, x2) = solve_2x2(
                    Complex::new(t[at(r1, r1, ldt)], 0.0) - lambda,
                    Complex::new(t[at(r1, r2, ldt)], 0.0),
                    Complex::new(t[at(r2, r1, ldt)], 0.0),
                    Complex::new(t[at(r2, r2, ldt)], 0.0) - lambda,
                    rhs,
                    smin,
                );
                (xr[r1], xi[r1]) = (x1.re, x1.im);
                (xr[r2], xi[r2]) = (x2.re, x2.im);
                j -= 2;
            }
        }

        // back-transform with the leading kend+1 Schur vectors
        for row in 0..n {
            yr[row] = (0..=kend).map(|c| vr[at(row, c, ldvr)] * xr[c]).sum();
            yi[row] = (0..=kend).map(|c| vr[at(row, c, ldvr)] * xi[c]).sum();
        }
        for row in 0..n {
            vr[at(row, k0, ldvr)] = yr[row];
            if pair {
                vr[at(row, k0 + 1, ldvr)] = yi[row];
            }
        }
        ki = k0;
    }
}

fn left_vectors(n: usize, t: &[f64], ldt: usize, vl: &mut [f64], ldvl: usize, work: &mut [f64]) {
    let (yr, rest) = work.split_at_mut(n);
    let (yi, rest) = rest.split_at_mut(n);
    let (ur, rest) = rest.split_at_mut(n);
    let ui = &mut rest[..n];
    let smlnum = SAFE_MIN * (n as f64 / EPS);
    let y_at = |yr: &[f64], yi: &[f64], c: usize| Complex::new(yr[c], yi[c]);

    let mut ki = 0;
    while ki < n {
        let pair = ki + 1 < n && t[at(ki + 1, ki, ldt)] != 0.0;
        let k0 = ki;
        let kend = if pair { ki + 1 } else { ki };
        let wr = t[at(k0, k0, ldt)];
        let wi = if pair { block_imag(t, ldt, k0) } else { 0.0 };
        // T^T y = conj(lambda) y
        let mu = Complex::new(wr, -wi);
        let smin = (EPS * (wr.abs() + wi.abs())).max(smlnum);

        yr.fill(0.0);
        yi.fill(0.0);
        if pair {
            let (b, c) = (t[at(k0, k0 + 1, ldt)], t[at(k0 + 1, k0, ldt)]);
            if b.abs() >= c.abs() {
                yi[k0] = -wi / b;
                yr[k0 + 1] = 1.0;
            } else {
                yr[k0] = 1.0;
                yi[k0 + 1] = -wi / c;
            }
        } else {
            yr[k0] = 1.0;
        }

        // forward substitution through the blocks below the eigenvalue
        let mut j = kend + 1;
        while j < n {
            let block2 = j + 1 < n && t[at(j + 1, j, ldt)] != 0.0;
            let col_sum = |yr: &[f64], yi: &[f64], c: usize| {
                (k0..j).fold(Complex::ZERO, |acc, r| {
                    acc + y_at(yr, yi, r).scale(t[at(r, c, ldt)])
                })
            };
            if !block2 {
                let rhs = col_sum(&*yr, &*yi, j);
                let mut d = Complex::new(t[at(j, j, ldt)], 0.0) - mu;
                if d.abs1() < smin {
                    d = Complex::new(smin, 0.0);
                }
                let y = -rhs / d;
                (yr[j], yi[j]) = (y.re, y.im);
                j += 1;
            } else {
                let rhs = (-col_sum(&*yr, &*yi, j), -col_sum(&*yr, &*yi, j + 1));
                let (y1, y2) = solve_2x2(
                    Complex::new(t[at(j, j, ldt)], 0.0) - mu,
                    Complex::new(t[at(j + 1, j, ldt)], 0.0),
                    Complex::new(t[at(j, j + 1, ldt)], 0.0),
                    Complex::new(t[at(j + 1, j + 1, ldt)], 0.0) - mu,
                    rhs,
                    smin,
                );
                (yr[j], yi[j]) = (y1.re, y1.im);
                (yr[j + 1], yi[j + 1]) = (y2.re, y2.im);
                j += 2;
            }
        }

        // back-transform with the trailing Schur vectors
        for row in 0..n {
            ur[row] = (k0..n).map(|c| vl[at(row, c, ldvl)] * yr[c]).sum();
            ui[row] = (k0..n).map(|c| vl[at(row, c, ldvl)] * yi[c]).sum();
        }
        for row in 0..n {
            vl[at(row, k0, ldvl)] = ur[row];
            if pair {
                vl[at(row, k0 + 1, ldvl)] = ui[row];
            }
        }
        ki = kend + 1;
    }
}

/// Scales each eigenvector to unit Euclidean norm; complex pairs are also rotated so that
/// their largest component is real.
fn normalize_vectors(n: usize, wi: &[f64], v: &mut [f64], ldv: usize) {
    let mut j = 0;
    while j < n {
        if wi[j] == 0.0 {
            let norm = nrm2(&v[at(0, j, ldv)..at(n, j, ldv)]);
            if norm > 0.0 {
                v[at(0, j, ldv)..at(n, j, ldv)]
                    .iter_mut()
                    .for_each(|x| *x /= norm);
            }
            j += 1;
        } else {
            let norm = nrm2(&v[at(0, j, ldv)..at(n, j, ldv)])
                .hypot(nrm2(&v[at(0, j + 1, ldv)..at(n, j + 1, ldv)]));
            if norm > 0.0 {
                v[at(0, j, ldv)..at(n, j + 1, ldv)]
                    .iter_mut()
                    .for_each(|x| *x /= norm);
            }
            let k = (0..n)
                .max_by(|&a, &b| {
                    let ma = v[at(a, j, ldv)].powi(2) + v[at(a, j + 1, ldv)].powi(2);
                    let mb = v[at(b, j, ldv)].powi(2) + v[at(b, j + 1, ldv)].powi(2);
                    ma.total_cmp(&mb)
                })
                .unwrap_or(0);
            let rot = lartg(v[at(k, j, ldv)], v[at(k, j + 1, ldv)]);
            rot_in_place(
                v,
                n,
                |r| at(r, j, ldv),
                |r| at(r, j + 1, ldv),
                rot.cs,
                rot.sn,
            );
            v[at(k, j + 1, ldv)] = 0.0;
            j += 2;
        }
    }
}

/// Minimum (and optimal) `lwork` of [`dgeev`] for order `n`.
pub fn dgeev_work_len(n: usize, want_vectors: bool) -> usize {
    if want_vectors {
        (4 * n).max(1)
    } else {
        (3 * n).max(1)
    }
}

/// Eigenvalues and, optionally, left and/or right eigenvectors of a general `n x n` matrix.
///
/// Eigenvalues are returned as `wr + i * wi`; complex conjugate pairs appear consecutively with
/// the positive imaginary part first. A right eigenvector `v(j)` satisfies
/// `A v(j) = lambda(j) v(j)` and a left eigenvector `u(j)^H A = lambda(j) u(j)^H`. Real
/// eigenvectors occupy one column; a complex pair uses columns `j` (real part) and `j + 1`
/// (imaginary part). Every vector has unit norm and largest component real. `A` is
/// overwritten.
///
/// # Returns
///
/// * `0` on success.
/// * `-i` if the `i`-th argument is invalid.
/// * `i > 0` if the QR algorithm failed; elements `i+1..n` (1-based) of `wr`/`wi` hold
///   converged eigenvalues and no eigenvectors were computed.
#[allow(clippy::too_many_arguments)]
pub fn dgeev(
    jobvl: u8,
    jobvr: u8,
    n: usize,
    a: &mut [f64],
    lda: usize,
    wr: &mut [f64],
    wi: &mut [f64],
    vl: &mut [f64],
    ldvl: usize,
    vr: &mut [f64],
    ldvr: usize,
    work: &mut [f64],
    lwork: isize,
) -> i32 {
    let wantvl = match flag(jobvl) {
        b'V' => true,
        b'N' => false,
        _ => return -1,
    };
    let wantvr = match flag(jobvr) {
        b'V' => true,
        b'N' => false,
        _ => return -2,
    };
    if lda < n.max(1) {
        return -5;
    }
    if ldvl < 1 || (wantvl && ldvl < n) {
        return -9;
    }
    if ldvr < 1 || (wantvr && ldvr < n) {
        return -11;
    }
    if work.is_empty() {
        return -12;
    }
    let minwork = dgeev_work_len(n, wantvl || wantvr);
    if lwork == WORKSPACE_QUERY {
        work[0] = minwork as f64;
        return 0;
    }
    if lwork < minwork as isize || work.len() < minwork {
        return -13;
    }
    if a.len() < required_len(n, n, lda) {
        return -4;
    }
    if wr.len() < n {
        return -6;
    }
    if wi.len() < n {
        return -7;
    }
    if wantvl && vl.len() < required_len(n, n, ldvl) {
        return -8;
    }
    if wantvr && vr.len() < required_len(n, n, ldvr) {
        return -10;
    }
    if n == 0 {
        return 0;
    }

    let last = n - 1;
    if wantvl {
        set_identity(vl, n, ldvl);
        dgehd2(n, a, lda, Some((&mut *vl, ldvl)), work);
        let info = dlahqr(true, true, n, 0, last, a, lda, wr, wi, 0, last, vl, ldvl);
        if info > 0 {
            return info;
        }
        if wantvr {
            for j in 0..n {
                for i in 0..n {
                    vr[at(i, j, ldvr)] = vl[at(i, j, ldvl)];
                }
            }
            right_vectors(n, a, lda, vr, ldvr, work);
            normalize_vectors(n, wi, vr, ldvr);
        }
        left_vectors(n, a, lda, vl, ldvl, work);
        normalize_vectors(n, wi, vl, ldvl);
    } else if wantvr {
        set_identity(vr, n, ldvr);
        dgehd2(n, a, lda, Some((&mut *vr, ldvr)), work);
        let info = dlahqr(true, true, n, 0, last, a, lda, wr, wi, 0, last, vr, ldvr);
        if info > 0 {
            return info;
        }
        right_vectors(n, a, lda, vr, ldvr, work);
        normalize_vectors(n, wi, vr, ldvr);
    } else {
        dgehd2(n, a, lda, None, work);
        return dlahqr(false, false, n, 0, last, a, lda, wr, wi, 0, last, &mut [], 1);
    }
    0
}

//! One-sided (Hestenes) Jacobi orthogonalization.

use crate::util::{at, nrm2, EPS, MAX_SWEEPS};

/// Rotation angle of a Jacobi step that diagonalizes `[[app, apq], [apq, aqq]]`.
///
/// Returns `(c, s)` so that replacing column `p` by `c*p - s*q` and column `q` by `s*p + c*q`
/// annihilates the off-diagonal entry.
#[inline]
pub(crate) fn jacobi_rotation(app: f64, aqq: f64, apq: f64) -> (f64, f64) {
    let theta = (aqq - app) / (2.0 * apq);
    let t = if theta.abs() > 1e150 {
        0.5 / theta
    } else {
        let t = 1.0 / (theta.abs() + (theta * theta + 1.0).sqrt());
        if theta < 0.0 {
            -t
        } else {
            t
        }
    };
    let c = 1.0 / (t * t + 1.0).sqrt();
    (c, t * c)
}

/// Rotates the columns of `g` (`rows x cols`, leading dimension `ldg`) until every pair of
/// columns is orthogonal when measured on the first `measured` rows.
///
/// All `rows` rows receive each rotation, which lets a caller orthogonalize one block of a
/// stacked matrix while carrying the other block along. The rotations are accumulated into
/// `v` (`cols x cols`, leading dimension `ldv`), which is overwritten with the identity first.
///
/// A pair counts as orthogonal once its cosine drops below `measured * EPS`. Columns whose
/// norm falls below `2 (measured + cols) EPS ||G||_F` are treated as zero.
///
/// Returns the number of column pairs that were still not orthogonal after the sweep limit.
pub(crate) fn orthogonalize_columns(
    rows: usize,
    measured: usize,
    cols: usize,
    g: &mut [f64],
    ldg: usize,
    v: &mut [f64],
    ldv: usize,
) -> usize {
    crate::util::set_identity(v, cols, ldv);
    if cols < 2 {
        return 0;
    }
    let tol = Tolerance::new(g, ldg, measured, cols);

    for _ in 0..MAX_SWEEPS {
        let mut rotations = 0;
        for p in 0..cols - 1 {
            for q in p + 1..cols {
                let (alpha, beta, gamma) = gram(g, ldg, measured, p, q);
                if !tol.needs_rotation(alpha, beta, gamma) {
                    continue;
                }
                rotations += 1;
                let (c, s) = jacobi_rotation(alpha, beta, gamma);
                rotate_columns(g, ldg, rows, p, q, c, s);
                rotate_columns(v, ldv, cols, p, q, c, s);
            }
        }
        if rotations == 0 {
            return 0;
        }
    }

    let mut pending = 0;
    for p in 0..cols - 1 {
        for q in p + 1..cols {
            let (alpha, beta, gamma) = gram(g, ldg, measured, p, q);
            if tol.needs_rotation(alpha, beta, gamma) {
                pending += 1;
            }
        }
    }
    pending
}

/// Convergence thresholds of one orthogonalization.
struct Tolerance {
    cosine: f64,
    floor: f64,
}

impl Tolerance {
    fn new(g: &[f64], ldg: usize, measured: usize, cols: usize) -> Self {
        let frob: f64 = (0..cols)
            .map(|j| g[at(0, j, ldg)..at(measured, j, ldg)].iter().map(|x| x * x).sum::<f64>())
            .sum();
        let noise = 2.0 * ((measured + cols) as f64) * EPS;
        Self {
            cosine: (measured.max(1) as f64) * EPS,
            floor: noise * noise * frob,
        }
    }

    #[inline]
    fn needs_rotation(&self, alpha: f64, beta: f64, gamma: f64) -> bool {
        alpha > self.floor
            && beta > self.floor
            && gamma.abs() > self.cosine * (alpha * beta).sqrt()
    }
}

/// Entries of the 2x2 Gram matrix of columns `p` and `q` over the first `rows` rows.
#[inline]
fn gram(g: &[f64], ldg: usize, rows: usize, p: usize, q: usize) -> (f64, f64, f64) {
    let cp = &g[at(0, p, ldg)..at(rows, p, ldg)];
    let cq = &g[at(0, q, ldg)..at(rows, q, ldg)];
    let (mut alpha, mut beta, mut gamma) = (0.0, 0.0, 0.0);
    for (&x, &y) in cp.iter().zip(cq) {
        alpha += x * x;
        beta += y * y;
        gamma += x * y;
    }
    (alpha, beta, gamma)
}

#[inline]
pub(crate) fn rotate_columns(
    a: &mut [f64],
    lda: usize,
    rows: usize,
    p: usize,
    q: usize,
    c: f64,
    s: f64,
) {
    for i in 0..rows {
        let (x, y) = (a[at(i, p, lda)], a[at(i, q, lda)]);
        a[at(i, p, lda)] = c * x - s * y;
        a[at(i, q, lda)] = s * x + c * y;
    }
}

#[inline]
pub(crate) fn swap_columns(a: &mut [f64], lda: usize, rows: usize, p: usize, q: usize) {
    if p == q {
        return;
    }
    for i in 0..rows {
        a.swap(at(i, p, lda), at(i, q, lda));
    }
}

/// Computes the column norms of `g` over its first `measured` rows into `norms` and sorts them
/// in descending order, applying the same column permutation to all `rows` rows of `g` and to
/// the `v_rows x cols` matrix `v`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn sort_by_column_norm(
    measured: usize,
    rows: usize,
    cols: usize,
    g: &mut [f64],
    ldg: usize,
    v: &mut [f64],
    ldv: usize,
    v_rows: usize,
    norms: &mut [f64],
) {
    for (j, nj) in norms.iter_mut().enumerate().take(cols) {
        *nj = nrm2(&g[at(0, j, ldg)..at(measured, j, ldg)]);
    }
    for i in 0..cols {
        let mut k = i;
        for j in i + 1..cols {
            if norms[j] > norms[k] {
                k = j;
            }
        }
        if k != i {
            norms.swap(i, k);
            swap_columns(g, ldg, rows, i, k);
            swap_columns(v, ldv, v_rows, i, k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orthogonalize_columns() {
        // 3x2 column-major
        let mut g = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut v = [0.0; 4];
        let pending = orthogonalize_columns(3, 3, 2, &mut g, 3, &mut v, 2);
        assert_eq!(pending, 0);
        let dot: f64 = (0..3).map(|i| g[i] * g[3 + i]).sum();
        assert_relative_eq!(dot, 0.0, epsilon = 1e-12);
        // v stays orthogonal
        let vdot = v[0] * v[2] + v[1] * v[3];
        assert_relative_eq!(vdot, 0.0, epsilon = 1e-14);
        assert_relative_eq!(v[0] * v[0] + v[1] * v[1], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_measured_rows_only() {
        // top row decides the rotation, bottom row is carried along
        let mut g = [1.0, 7.0, 1.0, -3.0];
        let mut v = [0.0; 4];
        orthogonalize_columns(2, 1, 2, &mut g, 2, &mut v, 2);
        assert_relative_eq!(g[0] * g[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_more_columns_than_rows_converges() {
        // three columns in two measured rows: one direction must collapse to zero
        let mut g = [1.0, 2.0, -1.0, 0.5, 3.0, 1.0];
        let mut v = [0.0; 9];
        let pending = orthogonalize_columns(2, 2, 3, &mut g, 2, &mut v, 3);
        assert_eq!(pending, 0);
        let mut norms = [0.0; 3];
        sort_by_column_norm(2, 2, 3, &mut g, 2, &mut v, 3, 3, &mut norms);
        assert!(norms[2] < 1e-12);
        let dot = g[0] * g[2] + g[1] * g[3];
        assert_relative_eq!(dot, 0.0, epsilon = 1e-12);
        // frobenius norm is preserved by the rotations
        let total: f64 = norms.iter().map(|x| x * x).sum();
        assert_relative_eq!(total, 1.0 + 4.0 + 1.0 + 0.25 + 9.0 + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sort_by_column_norm() {
        let mut g = [1.0, 0.0, 0.0, 3.0];
        let mut v = [1.0, 0.0, 0.0, 1.0];
        let mut norms = [0.0; 2];
        sort_by_column_norm(2, 2, 2, &mut g, 2, &mut v, 2, 2, &mut norms);
        assert_eq!(norms, [3.0, 1.0]);
        assert_eq!(g, [0.0, 3.0, 1.0, 0.0]);
        assert_eq!(v, [0.0, 1.0, 1.0, 0.0]);
    }
}

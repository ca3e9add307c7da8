use crate::jacobi::{orthogonalize_columns, sort_by_column_norm};
use crate::util::{
    at, col_nrm2, complete_orthonormal, flag, larfg, required_len, set_identity, EPS,
};

/// Length of `work` required by [`dggsvd`] for an `m x n` matrix `A` and a `p x n` matrix `B`.
pub fn dggsvd_work_len(m: usize, n: usize, p: usize) -> usize {
    ((m + p) * n + 3 * n * n + m.max(p).max(n) + 2 * n).max(1)
}

/// Generalized singular value decomposition of the pair `(A, B)`:
///
/// ```text
/// U^T A Q = D1 (0 R),   V^T B Q = D2 (0 R)
/// ```
///
/// with orthogonal `U` (`m x m`), `V` (`p x p`), `Q` (`n x n`) and a nonsingular upper
/// triangular `R` of order `K + L`, where `K + L` is the effective rank of `[A; B]`.
/// `alpha` and `beta` receive the generalized singular value pairs:
///
/// * `alpha[0..K] = 1`, `beta[0..K] = 0`;
/// * `alpha[K..K+L]`, `beta[K..K+L]` with `alpha^2 + beta^2 = 1`; when `m < K + L` the entries
///   from `m` on are `0` and `1`;
/// * zero from `K + L` on.
///
/// On exit `A(0..min(m, K+L), n-K-L..n)` holds `R` (its first `m` rows when `m < K + L`); the
/// remaining rows of `R` are stored in `B(m-K..L, n+m-K-L..n)`. `iwork` receives the sorting
/// information: for `i` in `K..min(m, K+L)`, swapping `alpha[i]` with
/// `alpha[iwork[i] - 1]` in increasing order of `i` yields a descending sequence.
///
/// The pair is first reduced with a rank revealing Jacobi SVD of the stacked matrix, then the
/// cosine-sine split is computed with a second Jacobi pass and `R` comes from an RQ
/// factorization. Whenever a pass has more columns than measured rows, an LQ step packs the
/// block into a square one first. `K` counts the pairs whose `beta` is rounding noise, and
/// never falls below `K + L - p`.
///
/// # Returns
///
/// * `0` on success.
/// * `-i` if the `i`-th argument is invalid.
/// * `1` if a Jacobi pass did not converge.
#[allow(clippy::too_many_arguments)]
pub fn dggsvd(
    jobu: u8,
    jobv: u8,
    jobq: u8,
    m: usize,
    n: usize,
    p: usize,
    k: &mut usize,
    l: &mut usize,
    a: &mut [f64],
    lda: usize,
    b: &mut [f64],
    ldb: usize,
    alpha: &mut [f64],
    beta: &mut [f64],
    u: &mut [f64],
    ldu: usize,
    v: &mut [f64],
    ldv: usize,
    q: &mut [f64],
    ldq: usize,
    work: &mut [f64],
    iwork: &mut [i32],
) -> i32 {
    let wantu = match flag(jobu) {
        b'U' => true,
        b'N' => false,
        _ => return -1,
    };
    let wantv = match flag(jobv) {
        b'V' => true,
        b'N' => false,
        _ => return -2,
    };
    let wantq = match flag(jobq) {
        b'Q' => true,
        b'N' => false,
        _ => return -3,
    };
    if lda < m.max(1) {
        return -10;
    }
    if ldb < p.max(1) {
        return -12;
    }
    if ldu < 1 || (wantu && ldu < m) {
        return -16;
    }
    if ldv < 1 || (wantv && ldv < p) {
        return -18;
    }
    if ldq < 1 || (wantq && ldq < n) {
        return -20;
    }
    if a.len() < required_len(m, n, lda) {
        return -9;
    }
    if b.len() < required_len(p, n, ldb) {
        return -11;
    }
    if alpha.len() < n {
        return -13;
    }
    if beta.len() < n {
        return -14;
    }
    if wantu && u.len() < required_len(m, m, ldu) {
        return -15;
    }
    if wantv && v.len() < required_len(p, p, ldv) {
        return -17;
    }
    if wantq && q.len() < required_len(n, n, ldq) {
        return -19;
    }
    if work.len() < dggsvd_work_len(m, n, p) {
        return -21;
    }
    if iwork.len() < n {
        return -22;
    }

    *k = 0;
    *l = 0;
    if n == 0 {
        if wantu {
            set_identity(u, m, ldu);
        }
        if wantv {
            set_identity(v, p, ldv);
        }
        return 0;
    }

    let mp = m + p;
    if mp == 0 {
        // no rows at all: the pair has rank zero
        alpha[..n].fill(0.0);
        beta[..n].fill(0.0);
        if wantq {
            set_identity(q, n, ldq);
        }
        for (i, iw) in iwork.iter_mut().enumerate().take(n) {
            *iw = (i + 1) as i32;
        }
        return 0;
    }

    let ldg = mp;
    let (g, rest) = work.split_at_mut(mp * n);
    let (z, rest) = rest.split_at_mut(n * n);
    let (w, rest) = rest.split_at_mut(n * n);
    let (qp, rest) = rest.split_at_mut(n * n);
    let (sigma, rest) = rest.split_at_mut(n);
    let (refl, rest) = rest.split_at_mut(n);
    let tmp = &mut rest[..m.max(p).max(n)];

    // stacked [A; B] and its rank revealing right singular vectors
    for j in 0..n {
        for i in 0..m {
            g[at(i, j, ldg)] = a[at(i, j, lda)];
        }
        for i in 0..p {
            g[at(m + i, j, ldg)] = b[at(i, j, ldb)];
        }
    }
    if orthogonalize_block(mp, mp, n, g, ldg, z, n, qp, refl, tmp) > 0 {
        return 1;
    }
    sort_by_column_norm(mp, mp, n, g, ldg, z, n, n, sigma);
    let frob = sigma.iter().map(|s| s * s).sum::<f64>().sqrt();
    let tol = 2.0 * ((mp + n) as f64) * EPS * frob;
    let r = sigma.iter().take_while(|&&s| s > tol).count();

    // [Q1; Q2] = [A; B] Z_r diag(sigma)^-1 has orthonormal columns
    for (j, &s) in sigma.iter().enumerate().take(r) {
        for i in 0..mp {
            g[at(i, j, ldg)] /= s;
        }
    }

    // cosine-sine split: orthogonalize the Q1 block, carrying Q2 along
    if orthogonalize_block(mp, m, r, g, ldg, w, n, qp, refl, tmp) > 0 {
        return 1;
    }
    sort_by_column_norm(m, mp, r, g, ldg, w, n, r, alpha);
    for j in 0..r {
        beta[j] = col_nrm2(g, ldg, j, m..mp);
        let h = alpha[j].hypot(beta[j]);
        if h > 0.0 {
            alpha[j] /= h;
            beta[j] /= h;
        }
    }

    // rounding in the normalized columns grows with the conditioning of the stacked pair;
    // at most p directions can have a nonzero B part
    let tol_s = if r > 0 {
        (mp.max(n) as f64) * EPS * sigma[0] / sigma[r - 1]
    } else {
        0.0
    };
    let kk = (0..r)
        .take_while(|&j| beta[j] <= tol_s)
        .count()
        .max(r.saturating_sub(p))
        .min(m);
    let ll = r - kk;

    if wantu {
        let tol_c = 2.0 * ((m + r) as f64) * EPS * (r as f64).sqrt();
        for j in 0..m {
            let c = if j < r { col_nrm2(g, ldg, j, 0..m) } else { 0.0 };
            let scale = if c > tol_c { 1.0 / c } else { 0.0 };
            for i in 0..m {
                u[at(i, j, ldu)] = if scale > 0.0 {
                    g[at(i, j, ldg)] * scale
                } else {
                    0.0
                };
            }
        }
        complete_orthonormal(u, 1, ldu, m, m, tmp);
    }
    if wantv {
        for i in 0..p {
            let j = kk + i;
            let s = if i < ll { col_nrm2(g, ldg, j, m..mp) } else { 0.0 };
            let scale = if s > tol_s { 1.0 / s } else { 0.0 };
            for row in 0..p {
                v[at(row, i, ldv)] = if scale > 0.0 {
                    g[at(m + row, j, ldg)] * scale
                } else {
                    0.0
                };
            }
        }
        reorthonormalize(v, ldv, p, ll);
        complete_orthonormal(v, 1, ldv, p, p, tmp);
    }

    for j in 0..kk {
        alpha[j] = 1.0;
        beta[j] = 0.0;
    }
    for j in kk.max(m)..r {
        alpha[j] = 0.0;
        beta[j] = 1.0;
    }
    for j in r..n {
        alpha[j] = 0.0;
        beta[j] = 0.0;
    }

    // RQ factorization of W^T diag(sigma), built in place of W, reflectors applied from the
    // right
    for j in 0..r {
        for i in 0..j {
            w.swap(at(i, j, n), at(j, i, n));
        }
    }
    for (j, &s) in sigma.iter().enumerate().take(r) {
        for i in 0..r {
            w[at(i, j, n)] *= s;
        }
    }
    set_identity(qp, r, n);
    for i in (0..r).rev() {
        let x = &mut refl[..=i];
        for (c, xc) in x.iter_mut().enumerate() {
            *xc = w[at(i, c, n)];
        }
        let (head, last) = x.split_at_mut(i);
        let tau = larfg(&mut last[0], head);
        w[at(i, i, n)] = last[0];
        for c in 0..i {
            w[at(i, c, n)] = 0.0;
        }
        if tau == 0.0 {
            continue;
        }
        x[i] = 1.0;
        apply_reflector_right(w, n, i, x, tau);
        apply_reflector_right(qp, n, r, x, tau);
    }

    if wantq {
        for j in 0..n - r {
            for i in 0..n {
                q[at(i, j, ldq)] = z[at(i, r + j, n)];
            }
        }
        for j in 0..r {
            for i in 0..n {
                q[at(i, n - r + j, ldq)] = (0..r).map(|c| z[at(i, c, n)] * qp[at(c, j, n)]).sum();
            }
        }
    }

    for i in 0..r {
        for j in 0..r {
            let val = if j >= i { w[at(i, j, n)] } else { 0.0 };
            if i < m {
                a[at(i, n - r + j, lda)] = val;
            } else if j >= m {
                b[at(i - kk, n - r + j, ldb)] = val;
            }
        }
    }

    // sorting information for the mixed range, alpha copied into the spent sigma buffer
    for (i, iw) in iwork.iter_mut().enumerate().take(n) {
        *iw = (i + 1) as i32;
    }
    sigma.copy_from_slice(&alpha[..n]);
    let ibnd = ll.min(m.saturating_sub(kk));
    for i in 0..ibnd {
        let mut isub = i;
        let mut smax = sigma[kk + i];
        for j in i + 1..ibnd {
            if sigma[kk + j] > smax {
                isub = j;
                smax = sigma[kk + j];
            }
        }
        if isub != i {
            sigma[kk + isub] = sigma[kk + i];
            sigma[kk + i] = smax;
        }
        iwork[kk + i] = (kk + isub + 1) as i32;
    }

    *k = kk;
    *l = ll;
    0
}

/// Orthogonalizes the `cols` columns of `g` over its first `measured` rows and accumulates the
/// column transformation into `v` (`cols x cols`).
///
/// With more columns than measured rows, an LQ reduction first packs the measured block into
/// its leading `measured` columns and leaves exact zeros in the others, so the Jacobi pass
/// runs on a square block. `scratch` needs `min(cols, measured)^2` entries, `refl` and `row`
/// need `cols`.
#[allow(clippy::too_many_arguments)]
fn orthogonalize_block(
    rows: usize,
    measured: usize,
    cols: usize,
    g: &mut [f64],
    ldg: usize,
    v: &mut [f64],
    ldv: usize,
    scratch: &mut [f64],
    refl: &mut [f64],
    row: &mut [f64],
) -> usize {
    set_identity(v, cols, ldv);
    if cols > measured {
        for i in 0..measured {
            let x = &mut refl[..cols - i];
            for (c, xc) in x.iter_mut().enumerate() {
                *xc = g[at(i, i + c, ldg)];
            }
            let (head, tail) = x.split_at_mut(1);
            let tau = larfg(&mut head[0], tail);
            let diag = head[0];
            if tau != 0.0 {
                x[0] = 1.0;
                apply_reflector_right(&mut g[at(0, i, ldg)..], ldg, rows, x, tau);
                apply_reflector_right(&mut v[at(0, i, ldv)..], ldv, cols, x, tau);
            }
            g[at(i, i, ldg)] = diag;
            for c in i + 1..cols {
                g[at(i, c, ldg)] = 0.0;
            }
        }
    }

    let square = cols.min(measured);
    let lds = square.max(1);
    let pending = orthogonalize_columns(rows, measured, square, g, ldg, scratch, lds);
    for i in 0..cols {
        for (c, rc) in row.iter_mut().enumerate().take(square) {
            *rc = (0..square)
                .map(|t| v[at(i, t, ldv)] * scratch[at(t, c, lds)])
                .sum();
        }
        for (c, &rc) in row.iter().enumerate().take(square) {
            v[at(i, c, ldv)] = rc;
        }
    }
    pending
}

/// Modified Gram-Schmidt over the first `cols` columns of a `dim x cols` matrix, from the last
/// column to the first. All-zero columns stay zero.
fn reorthonormalize(mat: &mut [f64], ld: usize, dim: usize, cols: usize) {
    for i in (0..cols).rev() {
        for j in i + 1..cols {
            let d: f64 = (0..dim).map(|r| mat[at(r, i, ld)] * mat[at(r, j, ld)]).sum();
            for r in 0..dim {
                mat[at(r, i, ld)] -= d * mat[at(r, j, ld)];
            }
        }
        let norm = col_nrm2(mat, ld, i, 0..dim);
        if norm > 0.0 {
            for r in 0..dim {
                mat[at(r, i, ld)] /= norm;
            }
        }
    }
}

/// `M(0..rows, 0..x.len()) -= tau * (M x) x^T` for a column-major matrix with leading
/// dimension `ld`.
fn apply_reflector_right(m: &mut [f64], ld: usize, rows: usize, x: &[f64], tau: f64) {
    for row in 0..rows {
        let d: f64 = x.iter().enumerate().map(|(c, xc)| m[at(row, c, ld)] * xc).sum();
        let d = d * tau;
        for (c, xc) in x.iter().enumerate() {
            m[at(row, c, ld)] -= d * xc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mat(rows: usize, cols: usize, seed: u64) -> Vec<f64> {
        // small deterministic generator, entries in [-1, 1)
        let mut state = seed;
        (0..rows * cols)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
            })
            .collect()
    }

    /// `X^T * Y * Z` for column-major operands.
    fn xt_y_z(x: &[f64], xr: usize, xc: usize, y: &[f64], yc: usize, z: &[f64], zc: usize) -> Vec<f64> {
        let mut yz = vec![0.0; xr * zc];
        for j in 0..zc {
            for i in 0..xr {
                yz[i + j * xr] = (0..yc).map(|c| y[i + c * xr] * z[c + j * yc]).sum();
            }
        }
        let mut out = vec![0.0; xc * zc];
        for j in 0..zc {
            for i in 0..xc {
                out[i + j * xc] = (0..xr).map(|c| x[c + i * xr] * yz[c + j * xr]).sum();
            }
        }
        out
    }

    fn assert_orthogonal(q: &[f64], n: usize) {
        for i in 0..n {
            for j in 0..n {
                let d: f64 = (0..n).map(|c| q[c + i * n] * q[c + j * n]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(d, expected, epsilon = 1e-10);
            }
        }
    }

    /// Runs the decomposition on a random pair and checks both defining identities, with the
    /// rows of `R` beyond `m` read back from `B`.
    fn decompose_and_check(
        m: usize,
        n: usize,
        p: usize,
        seed: u64,
    ) -> (usize, usize, Vec<i32>) {
        let a0 = mat(m, n, seed);
        let b0 = mat(p, n, seed + 101);
        let (mut a, mut b) = (a0.clone(), b0.clone());
        let (mut k, mut l) = (0, 0);
        let (mut alpha, mut beta) = (vec![0.0; n], vec![0.0; n]);
        let mut u = vec![0.0; m * m];
        let mut v = vec![0.0; p * p];
        let mut q = vec![0.0; n * n];
        let mut work = vec![0.0; dggsvd_work_len(m, n, p)];
        let mut iwork = vec![0; n];
        let info = dggsvd(
            b'U', b'V', b'Q', m, n, p, &mut k, &mut l, &mut a, m, &mut b, p, &mut alpha,
            &mut beta, &mut u, m, &mut v, p, &mut q, n, &mut work, &mut iwork,
        );
        assert_eq!(info, 0);
        let r = k + l;
        assert!(l <= p && k <= m);
        for j in k..r {
            assert_relative_eq!(alpha[j].powi(2) + beta[j].powi(2), 1.0, epsilon = 1e-12);
        }
        assert_orthogonal(&u, m);
        assert_orthogonal(&v, p);
        assert_orthogonal(&q, n);

        let mut rmat = vec![0.0; r * r];
        for j in 0..r {
            for i in 0..=j {
                rmat[i + j * r] = if i < m {
                    a[i + (n - r + j) * m]
                } else {
                    b[(i - k) + (n - r + j) * p]
                };
            }
        }
        // U^T A Q = D1 (0 R)
        let uaq = xt_y_z(&u, m, m, &a0, n, &q, n);
        for i in 0..m {
            for j in 0..n {
                let expected = if i < r && j >= n - r {
                    alpha[i] * rmat[i + (j - (n - r)) * r]
                } else {
                    0.0
                };
                assert_relative_eq!(uaq[i + j * m], expected, epsilon = 1e-9);
            }
        }
        // V^T B Q = D2 (0 R)
        let vbq = xt_y_z(&v, p, p, &b0, n, &q, n);
        for i in 0..p {
            for j in 0..n {
                let expected = if i < l && j >= n - r {
                    beta[k + i] * rmat[(k + i) + (j - (n - r)) * r]
                } else {
                    0.0
                };
                assert_relative_eq!(vbq[i + j * p], expected, epsilon = 1e-9);
            }
        }
        (k, l, iwork)
    }

    fn rank(m: usize, n: usize, p: usize, seed: u64) -> (usize, usize) {
        let (k, l, _) = decompose_and_check(m, n, p, seed);
        (k, l)
    }

    #[test]
    fn test_dggsvd_full_rank() {
        let (k, l, iwork) = decompose_and_check(4, 3, 3, 7);
        assert_eq!(k + l, 3);
        assert_eq!(iwork, vec![1, 2, 3]);
    }

    #[test]
    fn test_dggsvd_tall_a() {
        // B has a one dimensional null space inside the row space of A
        for seed in 1..5 {
            assert_eq!(rank(4, 3, 2, seed), (1, 2));
            assert_eq!(rank(6, 3, 2, seed), (1, 2));
        }
    }

    #[test]
    fn test_dggsvd_rank_exceeds_rows_of_a() {
        // K + L > m: the trailing rows of R live in B
        for seed in 1..5 {
            assert_eq!(rank(2, 3, 2, seed), (1, 2));
            assert_eq!(rank(2, 3, 3, seed), (0, 3));
            assert_eq!(rank(2, 4, 3, seed), (1, 3));
            assert_eq!(rank(3, 5, 4, seed), (1, 4));
            assert_eq!(rank(1, 3, 3, seed), (0, 3));
        }
    }

    #[test]
    fn test_dggsvd_wide_pair() {
        // n > m + p: the stacked matrix has a null space of its own and the row spaces of A
        // and B meet only in zero
        for seed in 1..4 {
            assert_eq!(rank(2, 5, 2, seed), (2, 2));
        }
    }

    #[test]
    fn test_dggsvd_rank_deficient_pair() {
        // B = 0 makes every generalized singular value infinite: K = rank(A), L = 0
        let (m, n, p) = (3, 2, 2);
        let mut a = mat(m, n, 3);
        let mut b = vec![0.0; p * n];
        let (mut k, mut l) = (0, 0);
        let (mut alpha, mut beta) = (vec![0.0; n], vec![0.0; n]);
        let mut work = vec![0.0; dggsvd_work_len(m, n, p)];
        let mut iwork = vec![0; n];
        let info = dggsvd(
            b'N', b'N', b'N', m, n, p, &mut k, &mut l, &mut a, m, &mut b, p, &mut alpha,
            &mut beta, &mut [], 1, &mut [], 1, &mut [], 1, &mut work, &mut iwork,
        );
        assert_eq!(info, 0);
        assert_eq!((k, l), (2, 0));
        assert_eq!(alpha, vec![1.0, 1.0]);
        assert_eq!(beta, vec![0.0, 0.0]);
    }

    #[test]
    fn test_dggsvd_arguments() {
        let (mut k, mut l) = (0, 0);
        let mut a = [0.0; 4];
        let mut b = [0.0; 4];
        let (mut alpha, mut beta) = ([0.0; 2], [0.0; 2]);
        let mut iwork = [0; 2];
        let mut work = [0.0; 2];
        let info = dggsvd(
            b'N', b'N', b'N', 2, 2, 2, &mut k, &mut l, &mut a, 2, &mut b, 2, &mut alpha,
            &mut beta, &mut [], 1, &mut [], 1, &mut [], 1, &mut work, &mut iwork,
        );
        assert_eq!(info, -21);
        let info = dggsvd(
            b'X', b'N', b'N', 2, 2, 2, &mut k, &mut l, &mut a, 2, &mut b, 2, &mut alpha,
            &mut beta, &mut [], 1, &mut [], 1, &mut [], 1, &mut work, &mut iwork,
        );
        assert_eq!(info, -1);
    }
}

//! Hessenberg reduction and the Francis double-shift QR iteration.

use crate::util::{at, flag, larfg, required_len, rot_in_place, set_identity, sign, EPS, SAFE_MIN};
use crate::WORKSPACE_QUERY;

/// Reduces the `n x n` matrix `A` to upper Hessenberg form `H = Q^T * A * Q` with Householder
/// reflectors.
///
/// The subdiagonal part below the first subdiagonal is zeroed explicitly. When `z` is given,
/// its first `n` columns are multiplied from the right by `Q`. `work` needs `n` entries.
pub fn dgehd2(
    n: usize,
    a: &mut [f64],
    lda: usize,
    mut z: Option<(&mut [f64], usize)>,
    work: &mut [f64],
) {
    for k in 0..n.saturating_sub(2) {
        let len = n - k - 1;
        let v = &mut work[..len];
        for (i, vi) in v.iter_mut().enumerate() {
            *vi = a[at(k + 1 + i, k, lda)];
        }
        let (head, tail) = v.split_at_mut(1);
        let tau = larfg(&mut head[0], tail);
        a[at(k + 1, k, lda)] = head[0];
        for i in k + 2..n {
            a[at(i, k, lda)] = 0.0;
        }
        if tau == 0.0 {
            continue;
        }
        v[0] = 1.0;

        // A(k+1.., k+1..) := H * A(k+1.., k+1..)
        for j in k + 1..n {
            let d: f64 = (0..len).map(|i| v[i] * a[at(k + 1 + i, j, lda)]).sum();
            let d = d * tau;
            for (i, vi) in v.iter().enumerate() {
                a[at(k + 1 + i, j, lda)] -= d * vi;
            }
        }
        // A(.., k+1..) := A(.., k+1..) * H
        apply_right(a, lda, n, k + 1, v, tau);
        if let Some((z, ldz)) = z.as_mut() {
            apply_right(z, *ldz, n, k + 1, v, tau);
        }
    }
}

/// `M(0..rows, c0..c0+len) -= tau * (M * v) * v^T`.
fn apply_right(m: &mut [f64], ld: usize, rows: usize, c0: usize, v: &[f64], tau: f64) {
    for i in 0..rows {
        let d: f64 = v
            .iter()
            .enumerate()
            .map(|(j, vj)| m[at(i, c0 + j, ld)] * vj)
            .sum();
        let d = d * tau;
        for (j, vj) in v.iter().enumerate() {
            m[at(i, c0 + j, ld)] -= d * vj;
        }
    }
}

/// Standardized 2x2 block returned by [`dlanv2`].
#[derive(Clone, Copy, Debug)]
pub struct Standardized2x2 {
    /// Upper-left entry of the standardized block `[[a, b], [c, d]]`.
    pub a: f64,
    /// Upper-right entry.
    pub b: f64,
    /// Lower-left entry, zero when the eigenvalues are real.
    pub c: f64,
    /// Lower-right entry.
    pub d: f64,
    /// First eigenvalue (real, imaginary).
    pub rt1: (f64, f64),
    /// Second eigenvalue (real, imaginary).
    pub rt2: (f64, f64),
    /// Cosine of the rotation `G = [cs -sn; sn cs]` with `new = G^T * old * G`.
    pub cs: f64,
    /// Sine of the rotation.
    pub sn: f64,
}

/// Schur factorization of a real 2x2 nonsymmetric matrix in standardized form.
///
/// On return either `c == 0` (two real eigenvalues) or `a == d` and `b * c < 0` (a complex
/// pair `a +- sqrt(|b|) * sqrt(|c|) * i`).
pub fn dlanv2(a: f64, b: f64, c: f64, d: f64) -> Standardized2x2 {
    let (mut a, mut b, mut c, mut d) = (a, b, c, d);
    let (mut cs, mut sn);
    if c == 0.0 {
        cs = 1.0;
        sn = 0.0;
    } else if b == 0.0 {
        // swap rows and columns
        cs = 0.0;
        sn = 1.0;
        std::mem::swap(&mut a, &mut d);
        b = -c;
        c = 0.0;
    } else if (a - d) == 0.0 && b.signum() != c.signum() {
        cs = 1.0;
        sn = 0.0;
    } else {
        let temp = a - d;
        let p = 0.5 * temp;
        let bcmax = b.abs().max(c.abs());
        let bcmis = b.abs().min(c.abs()) * sign(1.0, b) * sign(1.0, c);
        let scale = p.abs().max(bcmax);
        let mut z = (p / scale) * p + (bcmax / scale) * bcmis;

        if z >= 4.0 * EPS {
            // real eigenvalues
            z = p + sign(scale.sqrt() * z.sqrt(), p);
            a = d + z;
            d -= (bcmax / z) * bcmis;
            let tau = c.hypot(z);
            cs = z / tau;
            sn = c / tau;
            b -= c;
            c = 0.0;
        } else {
            // complex or nearly equal real eigenvalues: make the diagonal equal
            let sigma = b + c;
            let tau = sigma.hypot(temp);
            cs = (0.5 * (1.0 + sigma.abs() / tau)).sqrt();
            sn = -(p / (tau * cs)) * sign(1.0, sigma);

            let aa = a * cs + b * sn;
            let bb = -a * sn + b * cs;
            let cc = c * cs + d * sn;
            let dd = -c * sn + d * cs;

            a = aa * cs + cc * sn;
            b = bb * cs + dd * sn;
            c = -aa * sn + cc * cs;
            d = -bb * sn + dd * cs;

            let temp = 0.5 * (a + d);
            a = temp;
            d = temp;

            if c != 0.0 {
                if b != 0.0 {
                    if b.signum() == c.signum() {
                        // real eigenvalues after all
                        let sab = b.abs().sqrt();
                        let sac = c.abs().sqrt();
                        let p = sign(sab * sac, c);
                        let tau = 1.0 / (b + c).abs().sqrt();
                        a = temp + p;
                        d = temp - p;
                        b -= c;
                        c = 0.0;
                        let cs1 = sab * tau;
                        let sn1 = sac * tau;
                        let temp = cs * cs1 - sn * sn1;
                        sn = cs * sn1 + sn * cs1;
                        cs = temp;
                    }
                } else {
                    b = -c;
                    c = 0.0;
                    let temp = cs;
                    cs = -sn;
                    sn = temp;
                }
            }
        }
    }

    let rt1r = a;
    let rt2r = d;
    let (rt1i, rt2i) = if c == 0.0 {
        (0.0, 0.0)
    } else {
        let im = b.abs().sqrt() * c.abs().sqrt();
        (im, -im)
    };
    Standardized2x2 {
        a,
        b,
        c,
        d,
        rt1: (rt1r, rt1i),
        rt2: (rt2r, rt2i),
        cs,
        sn,
    }
}

/// Double-shift QR on the active block `ilo..=ihi` (0-based) of an upper Hessenberg matrix.
///
/// With `wantt` the full Schur form is computed, otherwise only the eigenvalues. With `wantz`
/// the transformations are applied to rows `iloz..=ihiz` of `z`. The iteration budget is
/// `30 * (ihi - ilo + 1)` steps in total.
///
/// Returns `0` on success or `i + 1` when the eigenvalue at 0-based index `i` failed to
/// converge; entries `i + 1..=ihi` of `wr`/`wi` are then valid.
#[allow(clippy::too_many_arguments)]
pub fn dlahqr(
    wantt: bool,
    wantz: bool,
    n: usize,
    ilo: usize,
    ihi: usize,
    h: &mut [f64],
    ldh: usize,
    wr: &mut [f64],
    wi: &mut [f64],
    iloz: usize,
    ihiz: usize,
    z: &mut [f64],
    ldz: usize,
) -> i32 {
    if n == 0 {
        return 0;
    }
    if ilo == ihi {
        wr[ilo] = h[at(ilo, ilo, ldh)];
        wi[ilo] = 0.0;
        return 0;
    }
    // clear out the trash below the subdiagonal
    for j in ilo..ihi.saturating_sub(2) {
        h[at(j + 2, j, ldh)] = 0.0;
        h[at(j + 3, j, ldh)] = 0.0;
    }
    if ilo + 2 <= ihi {
        h[at(ihi, ihi - 2, ldh)] = 0.0;
    }

    let nh = ihi - ilo + 1;
    let nz = ihiz + 1 - iloz;
    let ulp = EPS;
    let smlnum = SAFE_MIN * (nh as f64 / ulp);
    let (mut i1, mut i2) = (0, n - 1);
    let mut itn = 30 * nh;

    let mut i = ihi;
    loop {
        let mut l = ilo;
        let mut converged = false;
        let mut its = 0;
        while its <= itn {
            // look for a single small subdiagonal element
            let mut k = i;
            while k > l {
                let mut tst1 = h[at(k - 1, k - 1, ldh)].abs() + h[at(k, k, ldh)].abs();
                if tst1 == 0.0 {
                    tst1 = block_norm1(h, ldh, l, i);
                }
                if h[at(k, k - 1, ldh)].abs() <= (ulp * tst1).max(smlnum) {
                    break;
                }
                k -= 1;
            }
            l = k;
            if l > ilo {
                h[at(l, l - 1, ldh)] = 0.0;
            }
            if l + 1 >= i {
                converged = true;
                break;
            }
            if !wantt {
                i1 = l;
                i2 = i;
            }

            let (h44, h33, h43h34) = if its == 10 || its == 20 {
                // exceptional shift
                let s = h[at(i, i - 1, ldh)].abs() + h[at(i - 1, i - 2, ldh)].abs();
                let h44 = 0.75 * s + h[at(i, i, ldh)];
                (h44, h44, -0.4375 * s * s)
            } else {
                let mut h44 = h[at(i, i, ldh)];
                let mut h33 = h[at(i - 1, i - 1, ldh)];
                let mut h43h34 = h[at(i, i - 1, ldh)] * h[at(i - 1, i, ldh)];
                let disc = ((h33 - h44) * 0.5).powi(2) + h43h34;
                if disc > 0.0 {
                    // real roots: use the one closest to h44 as a double shift
                    let disc = disc.sqrt();
                    let ave = 0.5 * (h33 + h44);
                    if h33.abs() - h44.abs() > 0.0 {
                        h33 = h33 * h44 - h43h34;
                        h44 = h33 / (sign(disc, ave) + ave);
                    } else {
                        h44 = sign(disc, ave) + ave;
                    }
                    h33 = h44;
                    h43h34 = 0.0;
                }
                (h44, h33, h43h34)
            };

            // look for two consecutive small subdiagonal elements
            let mut m = i - 2;
            let mut v: [f64; 3];
            loop {
                let h11 = h[at(m, m, ldh)];
                let h22 = h[at(m + 1, m + 1, ldh)];
                let h21 = h[at(m + 1, m, ldh)];
                let h12 = h[at(m, m + 1, ldh)];
                let h44s = h44 - h11;
                let h33s = h33 - h11;
                let v1 = (h33s * h44s - h43h34) / h21 + h12;
                let v2 = h22 - h11 - h33s - h44s;
                let v3 = h[at(m + 2, m + 1, ldh)];
                let s = v1.abs() + v2.abs() + v3.abs();
                v = [v1 / s, v2 / s, v3 / s];
                if m == l {
                    break;
                }
                let h00 = h[at(m - 1, m - 1, ldh)];
                let h10 = h[at(m, m - 1, ldh)];
                let tst1 = v[0].abs() * (h00.abs() + h11.abs() + h22.abs());
                if h10.abs() * (v[1].abs() + v[2].abs()) <= ulp * tst1 {
                    break;
                }
                m -= 1;
            }

            // double-shift QR step
            for k in m..i {
                let nr = 3.min(i - k + 1);
                if k > m {
                    for (r, vr) in v.iter_mut().enumerate().take(nr) {
                        *vr = h[at(k + r, k - 1, ldh)];
                    }
                }
                let (head, tail) = v.split_at_mut(1);
                let t1 = larfg(&mut head[0], &mut tail[..nr - 1]);
                if k > m {
                    h[at(k, k - 1, ldh)] = v[0];
                    h[at(k + 1, k - 1, ldh)] = 0.0;
                    if k < i - 1 {
                        h[at(k + 2, k - 1, ldh)] = 0.0;
                    }
                } else if m > l {
                    h[at(k, k - 1, ldh)] = -h[at(k, k - 1, ldh)];
                }
                let v2 = v[1];
                let t2 = t1 * v2;
                if nr == 3 {
                    let v3 = v[2];
                    let t3 = t1 * v3;
                    for j in k..=i2 {
                        let sum = h[at(k, j, ldh)] + v2 * h[at(k + 1, j, ldh)] + v3 * h[at(k + 2, j, ldh)];
                        h[at(k, j, ldh)] -= sum * t1;
                        h[at(k + 1, j, ldh)] -= sum * t2;
                        h[at(k + 2, j, ldh)] -= sum * t3;
                    }
                    for j in i1..=(k + 3).min(i) {
                        let sum = h[at(j, k, ldh)] + v2 * h[at(j, k + 1, ldh)] + v3 * h[at(j, k + 2, ldh)];
                        h[at(j, k, ldh)] -= sum * t1;
                        h[at(j, k + 1, ldh)] -= sum * t2;
                        h[at(j, k + 2, ldh)] -= sum * t3;
                    }
                    if wantz {
                        for j in iloz..iloz + nz {
                            let sum = z[at(j, k, ldz)] + v2 * z[at(j, k + 1, ldz)] + v3 * z[at(j, k + 2, ldz)];
                            z[at(j, k, ldz)] -= sum * t1;
                            z[at(j, k + 1, ldz)] -= sum * t2;
                            z[at(j, k + 2, ldz)] -= sum * t3;
                        }
                    }
                } else if nr == 2 {
                    for j in k..=i2 {
                        let sum = h[at(k, j, ldh)] + v2 * h[at(k + 1, j, ldh)];
                        h[at(k, j, ldh)] -= sum * t1;
                        h[at(k + 1, j, ldh)] -= sum * t2;
                    }
                    for j in i1..=i {
                        let sum = h[at(j, k, ldh)] + v2 * h[at(j, k + 1, ldh)];
                        h[at(j, k, ldh)] -= sum * t1;
                        h[at(j, k + 1, ldh)] -= sum * t2;
                    }
                    if wantz {
                        for j in iloz..iloz + nz {
                            let sum = z[at(j, k, ldz)] + v2 * z[at(j, k + 1, ldz)];
                            z[at(j, k, ldz)] -= sum * t1;
                            z[at(j, k + 1, ldz)] -= sum * t2;
                        }
                    }
                }
            }
            its += 1;
        }

        if !converged {
            return (i + 1) as i32;
        }

        if l == i {
            // 1x1 block
            wr[i] = h[at(i, i, ldh)];
            wi[i] = 0.0;
        } else {
            // 2x2 block
            let r = dlanv2(
                h[at(i - 1, i - 1, ldh)],
                h[at(i - 1, i, ldh)],
                h[at(i, i - 1, ldh)],
                h[at(i, i, ldh)],
            );
            h[at(i - 1, i - 1, ldh)] = r.a;
            h[at(i - 1, i, ldh)] = r.b;
            h[at(i, i - 1, ldh)] = r.c;
            h[at(i, i, ldh)] = r.d;
            (wr[i - 1], wi[i - 1]) = r.rt1;
            (wr[i], wi[i]) = r.rt2;

            if wantt {
                // rest of H
                if i2 > i {
                    rot_in_place(
                        h,
                        i2 - i,
                        |t| at(i - 1, i + 1 + t, ldh),
                        |t| at(i, i + 1 + t, ldh),
                        r.cs,
                        r.sn,
                    );
                }
                rot_in_place(
                    h,
                    (i - 1).saturating_sub(i1),
                    |t| at(i1 + t, i - 1, ldh),
                    |t| at(i1 + t, i, ldh),
                    r.cs,
                    r.sn,
                );
            }
            if wantz {
                rot_in_place(
                    z,
                    nz,
                    |t| at(iloz + t, i - 1, ldz),
                    |t| at(iloz + t, i, ldz),
                    r.cs,
                    r.sn,
                );
            }
        }

        itn -= its;
        if l == ilo {
            return 0;
        }
        i = l - 1;
    }
}

/// One-norm of the square block `lo..=hi` of a Hessenberg matrix.
fn block_norm1(h: &[f64], ldh: usize, lo: usize, hi: usize) -> f64 {
    (lo..=hi)
        .map(|j| {
            (lo..=(j + 1).min(hi))
                .map(|i| h[at(i, j, ldh)].abs())
                .sum::<f64>()
        })
        .fold(0.0, f64::max)
}

/// Minimum (and optimal) `lwork` of [`dhseqr`] for order `n`.
pub fn dhseqr_work_len(n: usize) -> usize {
    n.max(1)
}

/// Eigenvalues of an upper Hessenberg matrix and, optionally, its Schur form `H = Z T Z^T`.
///
/// * `job = b'E'` computes eigenvalues only, `b'S'` also the Schur form `T` over `H`.
/// * `compz = b'N'` no Schur vectors, `b'I'` `Z` is initialized to the identity, `b'V'` the
///   caller's orthogonal `Z` is multiplied from the right.
/// * `ilo`, `ihi` (1-based) bound the active block; rows and columns outside it are already
///   triangular and their eigenvalues are read from the diagonal. For `n == 0` pass
///   `ilo = 1`, `ihi = 0`.
///
/// # Returns
///
/// * `0` on success.
/// * `-i` if the `i`-th argument is invalid.
/// * `i > 0` if the QR iteration failed; elements `1..ilo-1` and `i+1..n` of `wr`/`wi` hold
///   the eigenvalues that were found.
#[allow(clippy::too_many_arguments)]
pub fn dhseqr(
    job: u8,
    compz: u8,
    n: usize,
    ilo: usize,
    ihi: usize,
    h: &mut [f64],
    ldh: usize,
    wr: &mut [f64],
    wi: &mut [f64],
    z: &mut [f64],
    ldz: usize,
    work: &mut [f64],
    lwork: isize,
) -> i32 {
    let wantt = match flag(job) {
        b'E' => false,
        b'S' => true,
        _ => return -1,
    };
    let (wantz, initz) = match flag(compz) {
        b'N' => (false, false),
        b'I' => (true, true),
        b'V' => (true, false),
        _ => return -2,
    };
    if ilo < 1 || ilo > n.max(1) {
        return -4;
    }
    if ihi < ilo.min(n) || ihi > n {
        return -5;
    }
    if ldh < n.max(1) {
        return -7;
    }
    if ldz < 1 || (wantz && ldz < n.max(1)) {
        return -11;
    }
    if work.is_empty() {
        return -12;
    }
    let minwork = dhseqr_work_len(n);
    if lwork == WORKSPACE_QUERY {
        work[0] = minwork as f64;
        return 0;
    }
    if lwork < minwork as isize || work.len() < minwork {
        return -13;
    }
    if h.len() < required_len(n, n, ldh) {
        return -6;
    }
    if wr.len() < n {
        return -8;
    }
    if wi.len() < n {
        return -9;
    }
    if wantz && z.len() < required_len(n, n, ldz) {
        return -10;
    }
    if n == 0 {
        return 0;
    }

    for i in (0..ilo - 1).chain(ihi..n) {
        wr[i] = h[at(i, i, ldh)];
        wi[i] = 0.0;
    }
    if initz {
        set_identity(z, n, ldz);
    }
    let (lo, hi) = (ilo - 1, ihi - 1);
    if lo == hi {
        wr[lo] = h[at(lo, lo, ldh)];
        wi[lo] = 0.0;
        return 0;
    }
    let ldz = if wantz { ldz } else { 1 };
    dlahqr(wantt, wantz, n, lo, hi, h, ldh, wr, wi, lo, hi, z, ldz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matmul(n: usize, a: &[f64], b: &[f64]) -> Vec<f64> {
        let mut c = vec![0.0; n * n];
        for j in 0..n {
            for i in 0..n {
                c[i + j * n] = (0..n).map(|k| a[i + k * n] * b[k + j * n]).sum();
            }
        }
        c
    }

    fn transpose(n: usize, a: &[f64]) -> Vec<f64> {
        let mut t = vec![0.0; n * n];
        for j in 0..n {
            for i in 0..n {
                t[j + i * n] = a[i + j * n];
            }
        }
        t
    }

    #[test]
    fn test_dlanv2_complex_pair() {
        let r = dlanv2(1.0, 2.0, -3.0, 4.0);
        // trace 5, determinant 10
        assert_relative_eq!(r.rt1.0 + r.rt2.0, 5.0, epsilon = 1e-12);
        assert_relative_eq!(r.rt1.0 * r.rt2.0 + r.rt1.1 * r.rt1.1, 10.0, epsilon = 1e-12);
        assert_relative_eq!(r.a, r.d, epsilon = 1e-14);
        assert!(r.b * r.c < 0.0);
    }

    #[test]
    fn test_dlanv2_real_split() {
        let r = dlanv2(4.0, 1.0, 2.0, 3.0);
        assert_eq!(r.c, 0.0);
        let mut ev = [r.rt1.0, r.rt2.0];
        ev.sort_by(|a, b| a.total_cmp(b));
        assert_relative_eq!(ev[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(ev[1], 5.0, epsilon = 1e-12);
        // G^T * A * G reproduces the standardized block
        let (cs, sn) = (r.cs, r.sn);
        let g = [cs, sn, -sn, cs];
        let a = [4.0, 2.0, 1.0, 3.0];
        let t = matmul(2, &transpose(2, &g), &matmul(2, &a, &g));
        assert_relative_eq!(t[0], r.a, epsilon = 1e-12);
        assert_relative_eq!(t[1], r.c, epsilon = 1e-12);
        assert_relative_eq!(t[2], r.b, epsilon = 1e-12);
        assert_relative_eq!(t[3], r.d, epsilon = 1e-12);
    }

    #[test]
    fn test_dgehd2_similarity() {
        let n = 4;
        let orig: Vec<f64> = (0..16).map(|k| ((k * 7 + 3) % 11) as f64 - 5.0).collect();
        let mut a = orig.clone();
        let mut q = vec![0.0; 16];
        set_identity(&mut q, n, n);
        let mut work = [0.0; 4];
        dgehd2(n, &mut a, n, Some((&mut q, n)), &mut work);
        for j in 0..n {
            for i in j + 2..n {
                assert_eq!(a[i + j * n], 0.0);
            }
        }
        let back = matmul(n, &q, &matmul(n, &a, &transpose(n, &q)));
        for (x, y) in back.iter().zip(&orig) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dhseqr_schur_form() {
        let n = 4;
        #[rustfmt::skip]
        let orig = vec![
            1.0, 3.0, 0.0, 0.0,
            2.0, -1.0, 1.0, 0.0,
            -1.0, 4.0, 2.0, 5.0,
            3.0, 1.0, -2.0, 1.0,
        ];
        let mut h = orig.clone();
        let (mut wr, mut wi) = ([0.0; 4], [0.0; 4]);
        let mut z = vec![0.0; 16];
        let mut work = [0.0; 4];
        let info = dhseqr(
            b'S', b'I', n, 1, n, &mut h, n, &mut wr, &mut wi, &mut z, n, &mut work, 4,
        );
        assert_eq!(info, 0);
        // quasi-triangular
        for j in 0..n {
            for i in j + 2..n {
                assert_eq!(h[i + j * n], 0.0);
            }
        }
        let back = matmul(n, &z, &matmul(n, &h, &transpose(n, &z)));
        for (x, y) in back.iter().zip(&orig) {
            assert_relative_eq!(x, y, epsilon = 1e-10);
        }
        let trace: f64 = wr.iter().sum();
        assert_relative_eq!(trace, 1.0 - 1.0 + 2.0 + 1.0, epsilon = 1e-10);
        assert_relative_eq!(wi.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dhseqr_isolated_eigenvalues() {
        // already triangular outside the active block 2..=3 (1-based)
        let n = 3;
        #[rustfmt::skip]
        let mut h = vec![
            7.0, 0.0, 0.0,
            1.0, 0.0, 1.0,
            2.0, -1.0, 0.0,
        ];
        let (mut wr, mut wi) = ([0.0; 3], [0.0; 3]);
        let mut work = [0.0; 3];
        let info = dhseqr(
            b'E', b'N', n, 2, 3, &mut h, n, &mut wr, &mut wi, &mut [], 1, &mut work, 3,
        );
        assert_eq!(info, 0);
        assert_eq!(wr[0], 7.0);
        assert_relative_eq!(wi[1].abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(wi[1], -wi[2], epsilon = 1e-12);
    }

    #[test]
    fn test_dhseqr_arguments() {
        let mut work = [0.0];
        let mut h = [0.0; 4];
        let (mut wr, mut wi) = ([0.0; 2], [0.0; 2]);
        let info = dhseqr(
            b'E', b'N', 2, 1, 2, &mut h, 2, &mut wr, &mut wi, &mut [], 1, &mut work,
            WORKSPACE_QUERY,
        );
        assert_eq!(info, 0);
        assert_eq!(work[0], 2.0);
        let info = dhseqr(
            b'E', b'N', 2, 2, 1, &mut h, 2, &mut wr, &mut wi, &mut [], 1, &mut work, 2,
        );
        assert_eq!(info, -5);
        let info = dhseqr(
            b'E', b'X', 2, 1, 2, &mut h, 2, &mut wr, &mut wi, &mut [], 1, &mut work, 2,
        );
        assert_eq!(info, -2);
    }
}

//! Small numeric building blocks shared by the kernels.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// Relative machine precision, `dlamch('P')`.
pub(crate) const EPS: f64 = f64::EPSILON;

/// Safe minimum such that its reciprocal does not overflow, `dlamch('S')`.
pub(crate) const SAFE_MIN: f64 = f64::MIN_POSITIVE;

/// Upper bound on the number of Jacobi sweeps before a kernel gives up.
pub(crate) const MAX_SWEEPS: usize = 60;

/// Column-major linear index of element `(i, j)` with leading dimension `ld`.
#[inline(always)]
pub(crate) fn at(i: usize, j: usize, ld: usize) -> usize {
    i + j * ld
}

/// Case-insensitive character flag.
#[inline]
pub(crate) fn flag(c: u8) -> u8 {
    c.to_ascii_uppercase()
}

/// Minimum slice length holding a `rows x cols` column-major matrix with leading dimension `ld`.
#[inline]
pub(crate) fn required_len(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (cols - 1) * ld + rows
    }
}

/// Fortran `SIGN(a, b)`: magnitude of `a` with the sign of `b`.
#[inline]
pub(crate) fn sign(a: f64, b: f64) -> f64 {
    a.abs().copysign(b)
}

/// Euclidean norm of a contiguous vector, computed without intermediate overflow.
pub(crate) fn nrm2(x: &[f64]) -> f64 {
    let mut scale = 0.0f64;
    let mut ssq = 1.0f64;
    for &v in x {
        if v != 0.0 {
            let a = v.abs();
            if scale < a {
                ssq = 1.0 + ssq * (scale / a) * (scale / a);
                scale = a;
            } else {
                ssq += (a / scale) * (a / scale);
            }
        }
    }
    scale * ssq.sqrt()
}

/// Euclidean norm of column `j` restricted to rows `rows`.
pub(crate) fn col_nrm2(a: &[f64], lda: usize, j: usize, rows: std::ops::Range<usize>) -> f64 {
    nrm2(&a[at(rows.start, j, lda)..at(rows.end, j, lda)])
}

/// Generates an elementary reflector `H = I - tau * v * v^T` such that
/// `H * [alpha; x] = [beta; 0]`.
///
/// On return `alpha` holds `beta`, `x` holds the tail of `v` (its head is the implicit `1`) and
/// the function returns `tau`. A zero `tau` means `H` is the identity.
pub(crate) fn larfg(alpha: &mut f64, x: &mut [f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let xnorm = nrm2(x);
    if xnorm == 0.0 {
        return 0.0;
    }
    let beta = -sign(alpha.hypot(xnorm), *alpha);
    let tau = (beta - *alpha) / beta;
    let scale = 1.0 / (*alpha - beta);
    x.iter_mut().for_each(|v| *v *= scale);
    *alpha = beta;
    tau
}

/// Plane rotation parameters produced by [`lartg`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rotation {
    pub cs: f64,
    pub sn: f64,
}

/// Generates a plane rotation with `[cs sn; -sn cs] * [f; g] = [r; 0]`, where `r` takes the
/// sign of `f` when `|f| > |g|`.
pub(crate) fn lartg(f: f64, g: f64) -> Rotation {
    if g == 0.0 {
        return Rotation { cs: 1.0, sn: 0.0 };
    }
    if f == 0.0 {
        return Rotation { cs: 0.0, sn: 1.0 };
    }
    let r = f.hypot(g);
    let (cs, sn) = (f / r, g / r);
    if f.abs() > g.abs() && cs < 0.0 {
        return Rotation { cs: -cs, sn: -sn };
    }
    Rotation { cs, sn }
}

/// Applies the rotation `x' = c*x + s*y`, `y' = c*y - s*x` to two strided sequences inside
/// the same buffer. `x_at(k)` and `y_at(k)` give the linear indices of the `k`-th pair.
pub(crate) fn rot_in_place(
    buf: &mut [f64],
    len: usize,
    x_at: impl Fn(usize) -> usize,
    y_at: impl Fn(usize) -> usize,
    c: f64,
    s: f64,
) {
    for k in 0..len {
        let (ix, iy) = (x_at(k), y_at(k));
        let (x, y) = (buf[ix], buf[iy]);
        buf[ix] = c * x + s * y;
        buf[iy] = c * y - s * x;
    }
}

/// Writes the `n x n` identity into a column-major matrix.
pub(crate) fn set_identity(a: &mut [f64], n: usize, lda: usize) {
    for j in 0..n {
        for i in 0..n {
            a[at(i, j, lda)] = if i == j { 1.0 } else { 0.0 };
        }
    }
}

/// Fills every all-zero column of a `dim x ncols` matrix with a unit vector orthogonal to all
/// the non-zero columns.
///
/// Element `(i, j)` lives at `i * rs + j * cs`, so the same routine completes column bases
/// (`rs = 1`) and row bases (`cs = 1`). The non-zero columns must already be orthonormal and
/// `ncols <= dim`. `tmp` needs `dim` entries.
pub(crate) fn complete_orthonormal(
    mat: &mut [f64],
    rs: usize,
    cs: usize,
    dim: usize,
    ncols: usize,
    tmp: &mut [f64],
) {
    let tmp = &mut tmp[..dim];
    if (0..ncols).all(|j| !is_zero_column(mat, rs, cs, dim, j)) {
        return;
    }
    // a candidate exceeding this residual always exists among the unit vectors
    let threshold = 0.5 / (dim as f64).sqrt();
    let mut cursor = 0;

    for j in 0..ncols {
        if !is_zero_column(mat, rs, cs, dim, j) {
            continue;
        }
        let mut best_norm = -1.0;
        let mut best_e = 0;
        for attempt in 0..dim {
            let e = (cursor + attempt) % dim;
            let norm = project_out(mat, rs, cs, dim, ncols, e, tmp);
            if norm > best_norm {
                best_norm = norm;
                best_e = e;
            }
            if norm > threshold {
                break;
            }
        }
        let norm = project_out(mat, rs, cs, dim, ncols, best_e, tmp);
        for i in 0..dim {
            mat[i * rs + j * cs] = tmp[i] / norm;
        }
        cursor = (best_e + 1) % dim;
    }
}

#[inline]
fn is_zero_column(mat: &[f64], rs: usize, cs: usize, dim: usize, j: usize) -> bool {
    (0..dim).all(|i| mat[i * rs + j * cs] == 0.0)
}

/// Loads the unit vector `e` into `tmp`, removes its components along every non-zero column
/// twice and returns the residual norm.
fn project_out(
    mat: &[f64],
    rs: usize,
    cs: usize,
    dim: usize,
    ncols: usize,
    e: usize,
    tmp: &mut [f64],
) -> f64 {
    tmp.fill(0.0);
    tmp[e] = 1.0;
    for _ in 0..2 {
        for c in (0..ncols).filter(|&c| !is_zero_column(mat, rs, cs, dim, c)) {
            let d: f64 = (0..dim).map(|i| tmp[i] * mat[i * rs + c * cs]).sum();
            for (i, t) in tmp.iter_mut().enumerate() {
                *t -= d * mat[i * rs + c * cs];
            }
        }
    }
    nrm2(tmp)
}

/// Minimal complex number used by the eigenvector back-substitution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// `|re| + |im|`, the cheap magnitude LAPACK uses for pivot tests.
    #[inline]
    pub fn abs1(self) -> f64 {
        self.re.abs() + self.im.abs()
    }

    #[inline]
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.re * s, self.im * s)
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Complex;
    // Smith's algorithm
    fn div(self, rhs: Complex) -> Complex {
        if rhs.im.abs() <= rhs.re.abs() {
            let e = rhs.im / rhs.re;
            let f = rhs.re + rhs.im * e;
            Complex::new((self.re + self.im * e) / f, (self.im - self.re * e) / f)
        } else {
            let e = rhs.re / rhs.im;
            let f = rhs.im + rhs.re * e;
            Complex::new((self.re * e + self.im) / f, (self.im * e - self.re) / f)
        }
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_larfg_annihilates_tail() {
        let mut alpha = 3.0;
        let mut x = [4.0];
        let tau = larfg(&mut alpha, &mut x);
        // H * [3, 4] = [beta, 0] with |beta| = 5
        assert_relative_eq!(alpha, -5.0, epsilon = 1e-12);
        let v = [1.0, x[0]];
        let orig = [3.0, 4.0];
        let dot = v[0] * orig[0] + v[1] * orig[1];
        let h0 = orig[0] - tau * dot * v[0];
        let h1 = orig[1] - tau * dot * v[1];
        assert_relative_eq!(h0, -5.0, epsilon = 1e-12);
        assert_relative_eq!(h1, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_larfg_zero_tail_is_identity() {
        let mut alpha = 2.0;
        let mut x = [0.0, 0.0];
        assert_eq!(larfg(&mut alpha, &mut x), 0.0);
        assert_eq!(alpha, 2.0);
    }

    #[test]
    fn test_nrm2_no_overflow() {
        let x = [3e200, 4e200];
        assert_relative_eq!(nrm2(&x), 5e200, max_relative = 1e-14);
    }

    #[test]
    fn test_lartg_zeroes_second() {
        let r = lartg(-3.0, 1.0);
        assert_relative_eq!(r.cs * -3.0 + r.sn * 1.0, -(10f64.sqrt()), epsilon = 1e-12);
        assert_relative_eq!(-r.sn * -3.0 + r.cs * 1.0, 0.0, epsilon = 1e-12);
        assert!(r.cs > 0.0);
    }

    #[test]
    fn test_complete_orthonormal_columns() {
        // 3x3 with one known column, two to fill
        let s = 1.0 / 2f64.sqrt();
        let mut m = [s, s, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let mut tmp = [0.0; 3];
        complete_orthonormal(&mut m, 1, 3, 3, 3, &mut tmp);
        for a in 0..3 {
            for b in 0..3 {
                let d: f64 = (0..3).map(|i| m[i + a * 3] * m[i + b * 3]).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert_relative_eq!(d, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_complex_division() {
        let q = Complex::new(1.0, 2.0) / Complex::new(3.0, -4.0);
        let back = q * Complex::new(3.0, -4.0);
        assert_relative_eq!(back.re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(back.im, 2.0, epsilon = 1e-12);
    }
}

use crate::util::{at, flag, required_len};

/// Unblocked Cholesky factorization of a symmetric positive definite matrix.
///
/// Computes `A = U^T * U` (`uplo = b'U'`) or `A = L * L^T` (`uplo = b'L'`) in place, reading and
/// writing only the selected triangle.
///
/// # Returns
///
/// * `0` on success.
/// * `-i` if the `i`-th argument is invalid.
/// * `k > 0` if the leading minor of order `k` is not positive definite. The factorization is
///   left incomplete.
pub fn dpotf2(uplo: u8, n: usize, a: &mut [f64], lda: usize) -> i32 {
    let upper = match flag(uplo) {
        b'U' => true,
        b'L' => false,
        _ => return -1,
    };
    if lda < n.max(1) {
        return -4;
    }
    if a.len() < required_len(n, n, lda) {
        return -3;
    }

    for j in 0..n {
        // squared norm of the already factored part of row/column j
        let sq: f64 = if upper {
            (0..j).map(|k| a[at(k, j, lda)].powi(2)).sum()
        } else {
            (0..j).map(|k| a[at(j, k, lda)].powi(2)).sum()
        };
        let ajj = a[at(j, j, lda)] - sq;
        if ajj <= 0.0 || ajj.is_nan() {
            a[at(j, j, lda)] = ajj;
            return (j + 1) as i32;
        }
        let ajj = ajj.sqrt();
        a[at(j, j, lda)] = ajj;

        for i in j + 1..n {
            if upper {
                let dot: f64 = (0..j).map(|k| a[at(k, j, lda)] * a[at(k, i, lda)]).sum();
                a[at(j, i, lda)] = (a[at(j, i, lda)] - dot) / ajj;
            } else {
                let dot: f64 = (0..j).map(|k| a[at(i, k, lda)] * a[at(j, k, lda)]).sum();
                a[at(i, j, lda)] = (a[at(i, j, lda)] - dot) / ajj;
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dpotf2_lower() {
        let mut a = [4.0, 2.0, 2.0, 3.0];
        assert_eq!(dpotf2(b'L', 2, &mut a, 2), 0);
        assert_relative_eq!(a[0], 2.0);
        assert_relative_eq!(a[1], 1.0);
        assert_relative_eq!(a[3], 2f64.sqrt(), epsilon = 1e-15);
        // upper triangle untouched
        assert_eq!(a[2], 2.0);
    }

    #[test]
    fn test_dpotf2_upper() {
        let mut a = [4.0, -7.0, 2.0, 3.0];
        assert_eq!(dpotf2(b'u', 2, &mut a, 2), 0);
        assert_relative_eq!(a[0], 2.0);
        assert_relative_eq!(a[2], 1.0);
        assert_relative_eq!(a[3], 2f64.sqrt(), epsilon = 1e-15);
        assert_eq!(a[1], -7.0);
    }

    #[test]
    fn test_dpotf2_not_positive_definite() {
        let mut a = [1.0, 2.0, 2.0, 1.0];
        assert_eq!(dpotf2(b'L', 2, &mut a, 2), 2);
    }

    #[test]
    fn test_dpotf2_bad_arguments() {
        let mut a = [1.0; 4];
        assert_eq!(dpotf2(b'X', 2, &mut a, 2), -1);
        assert_eq!(dpotf2(b'L', 2, &mut a, 1), -4);
        assert_eq!(dpotf2(b'L', 3, &mut a, 3), -3);
        assert_eq!(dpotf2(b'L', 0, &mut [], 1), 0);
    }
}

use crate::util::{at, flag, required_len};

fn check_args(uplo: u8, diag: u8, n: usize, a: &[f64], lda: usize) -> Result<(bool, bool), i32> {
    let upper = match flag(uplo) {
        b'U' => true,
        b'L' => false,
        _ => return Err(-1),
    };
    let unit = match flag(diag) {
        b'U' => true,
        b'N' => false,
        _ => return Err(-2),
    };
    if lda < n.max(1) {
        return Err(-5);
    }
    if a.len() < required_len(n, n, lda) {
        return Err(-4);
    }
    Ok((upper, unit))
}

/// Unblocked inverse of a triangular matrix, in place.
///
/// `diag = b'U'` treats the diagonal as implicitly one and never reads it. No singularity check
/// is performed; see [`dtrtri`].
pub fn dtrti2(uplo: u8, diag: u8, n: usize, a: &mut [f64], lda: usize) -> i32 {
    let (upper, unit) = match check_args(uplo, diag, n, a, lda) {
        Ok(flags) => flags,
        Err(info) => return info,
    };
    if upper {
        for j in 0..n {
            let ajj = if unit {
                -1.0
            } else {
                a[at(j, j, lda)] = 1.0 / a[at(j, j, lda)];
                -a[at(j, j, lda)]
            };
            // x := T(0..j, 0..j) * x with x = A(0..j, j), T already inverted
            for jj in 0..j {
                let temp = a[at(jj, j, lda)];
                if temp != 0.0 {
                    for i in 0..jj {
                        a[at(i, j, lda)] += temp * a[at(i, jj, lda)];
                    }
                    if !unit {
                        a[at(jj, j, lda)] *= a[at(jj, jj, lda)];
                    }
                }
            }
            for i in 0..j {
                a[at(i, j, lda)] *= ajj;
            }
        }
    } else {
        for j in (0..n).rev() {
            let ajj = if unit {
                -1.0
            } else {
                a[at(j, j, lda)] = 1.0 / a[at(j, j, lda)];
                -a[at(j, j, lda)]
            };
            // x := T(j+1.., j+1..) * x with x = A(j+1.., j)
            for jj in (j + 1..n).rev() {
                let temp = a[at(jj, j, lda)];
                if temp != 0.0 {
                    for i in (jj + 1..n).rev() {
                        a[at(i, j, lda)] += temp * a[at(i, jj, lda)];
                    }
                    if !unit {
                        a[at(jj, j, lda)] *= a[at(jj, jj, lda)];
                    }
                }
            }
            for i in j + 1..n {
                a[at(i, j, lda)] *= ajj;
            }
        }
    }
    0
}

/// Inverse of a triangular matrix, in place.
///
/// # Returns
///
/// * `0` on success.
/// * `-i` if the `i`-th argument is invalid.
/// * `i > 0` if the diagonal element `i` is exactly zero. `A` is left unchanged.
pub fn dtrtri(uplo: u8, diag: u8, n: usize, a: &mut [f64], lda: usize) -> i32 {
    let unit = match check_args(uplo, diag, n, a, lda) {
        Ok((_, unit)) => unit,
        Err(info) => return info,
    };
    if !unit {
        if let Some(i) = (0..n).find(|&i| a[at(i, i, lda)] == 0.0) {
            return (i + 1) as i32;
        }
    }
    dtrti2(uplo, diag, n, a, lda)
}

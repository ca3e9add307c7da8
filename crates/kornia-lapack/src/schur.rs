use std::ops::Range;

use kornia_lapack_kernels as kernels;

use crate::error::{check_status, ensure, ArgumentMap, Failure, LapackError, Operation};
use crate::flags::{SchurJob, SchurVectors};
use crate::layout::{
    column_major_window, finish, finish_vector, operand_layout, optional_window, staging_len,
    vector_staging_len, vector_window,
};
use crate::view::{MatrixViewMut, VectorViewMut};
use crate::workspace::reserve;

// dhseqr(job, compz, n, ilo, ihi, h, ldh, wr, wi, z, ldz, work, lwork)
const ARGS: ArgumentMap = &[
    (1, 1, "job"),
    (2, 2, "compz"),
    (3, 4, "h"),
    (4, 3, "active"),
    (5, 3, "active"),
    (6, 4, "h"),
    (7, 4, "h"),
    (8, 5, "wr"),
    (9, 6, "wi"),
    (10, 7, "z"),
    (11, 7, "z"),
    (12, 8, "workspace"),
    (13, 8, "workspace"),
];

/// Eigenvalues of an upper Hessenberg matrix `H` and, optionally, its real Schur form
/// `H = Z T Z^T`.
///
/// `active` is the 0-based block of rows and columns the iteration works on. Outside of it `H`
/// must already be upper triangular, as left behind by a balancing step, and the eigenvalues
/// there are read from the diagonal. It must be non-empty for `n > 0` and `0..0` otherwise;
/// pass `0..n` when nothing is known.
///
/// * With [`SchurJob::SchurForm`], `h` is overwritten with `T`: upper quasi-triangular with
///   standardized 2x2 blocks for the complex pairs. With [`SchurJob::Eigenvalues`] its
///   contents are unspecified on return.
/// * With [`SchurVectors::Initialize`], `z` receives the Schur vectors of `H`. With
///   [`SchurVectors::Accumulate`], `z` must hold an orthogonal matrix `Q` on entry and
///   receives `Q Z`, the usual follow-up of a Hessenberg reduction `A = Q H Q^T`.
///   `z` must be present and `n x n` in both cases.
///
/// The eigenvalues are written as `wr[j] + i * wi[j]`, conjugate pairs consecutive with the
/// positive imaginary part first. Operands that are not column-major are staged through
/// `workspace`, sized by [`hessenberg_schur_workspace`].
///
/// [`hessenberg_schur_workspace`]: crate::hessenberg_schur_workspace
///
/// # Errors
///
/// * [`LapackError::InvalidArgument`] with the position of the malformed argument.
/// * [`LapackError::NotConverged`] when the QR iteration failed. The [`ConvergedRange`]
///   covers the slots before `active` and the trailing slots that converged. `h` and `z` are
///   written back in their partially reduced state.
///
/// [`ConvergedRange`]: crate::ConvergedRange
#[allow(clippy::too_many_arguments)]
pub fn hessenberg_schur(
    job: SchurJob,
    compz: SchurVectors,
    active: Range<usize>,
    h: &mut MatrixViewMut<'_>,
    wr: &mut VectorViewMut<'_>,
    wi: &mut VectorViewMut<'_>,
    z: Option<&mut MatrixViewMut<'_>>,
    workspace: &mut [f64],
) -> Result<(), LapackError> {
    ensure(h.is_square(), 4, "h")?;
    let n = h.rows();
    ensure(
        active.start <= active.end && active.end <= n && (n == 0 || !active.is_empty()),
        3,
        "active",
    )?;
    operand_layout(h.layout(), 4, "h")?;
    ensure(wr.len() == n, 5, "wr")?;
    ensure(wi.len() == n, 6, "wi")?;
    let mut z = match compz {
        SchurVectors::Skip => None,
        SchurVectors::Initialize | SchurVectors::Accumulate => {
            let z = z.ok_or(LapackError::invalid_argument(7, "z"))?;
            ensure(z.rows() == n && z.cols() == n, 7, "z")?;
            operand_layout(z.layout(), 7, "z")?;
            Some(z)
        }
    };

    let h_need = staging_len(&h.as_view());
    let z_need = z.as_ref().map_or(0, |z| staging_len(&z.as_view()));
    let wr_need = vector_staging_len(n, wr.stride());
    let wi_need = vector_staging_len(n, wi.stride());
    let staging = h_need + z_need + wr_need + wi_need;
    let mut arena = reserve(workspace, staging, 8, Operation::HessenbergSchur)?;
    let h_scratch = arena.take(h_need);
    let z_scratch = arena.take(z_need);
    let wr_scratch = arena.take(wr_need);
    let wi_scratch = arena.take(wi_need);
    let work = arena.rest();
    let lwork = work.len() as isize;

    let info = {
        let h_win = column_major_window(h, h_scratch, true);
        let z_win = optional_window(
            z.as_deref_mut(),
            z_scratch,
            compz == SchurVectors::Accumulate,
        );
        kernels::dhseqr(
            job.as_flag(),
            compz.as_flag(),
            n,
            active.start + 1,
            active.end,
            h_win.data,
            h_win.ld,
            vector_window(wr, wr_scratch),
            vector_window(wi, wi_scratch),
            z_win.data,
            z_win.ld,
            work,
            lwork,
        )
    };
    if info >= 0 {
        finish(h, h_scratch);
        if let Some(z) = z.as_deref_mut() {
            finish(z, z_scratch);
        }
        finish_vector(wr, wr_scratch);
        finish_vector(wi, wi_scratch);
    }
    check_status(
        info,
        Operation::HessenbergSchur,
        ARGS,
        Failure::ActiveRange {
            leading: active.start,
            n,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hessenberg_schur_workspace;
    use crate::workspace::Order;
    use approx::assert_relative_eq;

    #[rustfmt::skip]
    const H: [f64; 16] = [
        4.0, 1.0, 2.0, 3.0,
        1.0, 3.0, 1.0, 2.0,
        0.0, 2.0, 1.0, 1.0,
        0.0, 0.0, 1.5, 2.0,
    ];

    #[test]
    fn test_row_major_schur_form() -> Result<(), LapackError> {
        let n = 4;
        let mut t = H;
        let mut z = [0.0; 16];
        let (mut wr, mut wi) = ([0.0; 4], [0.0; 4]);
        let size = hessenberg_schur_workspace(
            SchurJob::SchurForm,
            SchurVectors::Initialize,
            n,
            Order::RowMajor,
        )?;
        let mut workspace = vec![0.0; size];
        hessenberg_schur(
            SchurJob::SchurForm,
            SchurVectors::Initialize,
            0..n,
            &mut MatrixViewMut::from_row_major(&mut t, n, n)?,
            &mut VectorViewMut::contiguous(&mut wr),
            &mut VectorViewMut::contiguous(&mut wi),
            Some(&mut MatrixViewMut::from_row_major(&mut z, n, n)?),
            &mut workspace,
        )?;

        // quasi-triangular: no two consecutive subdiagonal entries
        for i in 2..n {
            assert!(t[i * n + i - 1] == 0.0 || t[(i - 1) * n + i - 2] == 0.0);
        }
        for i in 0..n {
            for j in 0..i.saturating_sub(1) {
                assert_eq!(t[i * n + j], 0.0);
            }
        }
        // Z T Z^T = H
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0.0;
                for k in 0..n {
                    for l in 0..n {
                        acc += z[i * n + k] * t[k * n + l] * z[j * n + l];
                    }
                }
                assert_relative_eq!(acc, H[i * n + j], epsilon = 1e-10);
            }
        }
        let trace: f64 = (0..n).map(|i| H[i * n + i]).sum();
        assert_relative_eq!(wr.iter().sum::<f64>(), trace, epsilon = 1e-10);
        assert_relative_eq!(wi.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_accumulate_multiplies_existing_vectors() -> Result<(), LapackError> {
        let n = 4;
        let size = hessenberg_schur_workspace(
            SchurJob::SchurForm,
            SchurVectors::Accumulate,
            n,
            Order::ColumnMajor,
        )?;
        let mut workspace = vec![0.0; size];
        let mut run = |compz: SchurVectors, z: &mut [f64]| -> Result<[f64; 16], LapackError> {
            let mut t = H;
            let (mut wr, mut wi) = ([0.0; 4], [0.0; 4]);
            hessenberg_schur(
                SchurJob::SchurForm,
                compz,
                0..n,
                &mut MatrixViewMut::from_row_major(&mut t, n, n)?,
                &mut VectorViewMut::contiguous(&mut wr),
                &mut VectorViewMut::contiguous(&mut wi),
                Some(&mut MatrixViewMut::from_col_major(z, n, n)?),
                &mut workspace,
            )?;
            Ok(t)
        };

        let mut z0 = [0.0; 16];
        let t0 = run(SchurVectors::Initialize, &mut z0)?;

        // Q = I - 2 v v^T / (v^T v), column-major
        let v = [1.0, 2.0, -1.0, 1.0];
        let mut q = [0.0; 16];
        for j in 0..n {
            for i in 0..n {
                q[i + j * n] = if i == j { 1.0 } else { 0.0 } - 2.0 * v[i] * v[j] / 7.0;
            }
        }
        let mut z = q;
        let t = run(SchurVectors::Accumulate, &mut z)?;
        assert_eq!(t, t0);
        for i in 0..n {
            for j in 0..n {
                let expected: f64 = (0..n).map(|k| q[i + k * n] * z0[k + j * n]).sum();
                assert_relative_eq!(z[i + j * n], expected, epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_active_block() -> Result<(), LapackError> {
        #[rustfmt::skip]
        let mut h = [
            5.0, 1.0, 2.0, 0.5,
            0.0, 1.0, -2.0, 1.0,
            0.0, 3.0, 1.0, 2.0,
            0.0, 0.0, 0.0, 7.0,
        ];
        let (mut wr, mut wi) = ([0.0; 4], [0.0; 4]);
        let mut workspace = vec![0.0; 64];
        hessenberg_schur(
            SchurJob::Eigenvalues,
            SchurVectors::Skip,
            1..3,
            &mut MatrixViewMut::from_row_major(&mut h, 4, 4)?,
            &mut VectorViewMut::contiguous(&mut wr),
            &mut VectorViewMut::contiguous(&mut wi),
            None,
            &mut workspace,
        )?;
        assert_eq!((wr[0], wi[0]), (5.0, 0.0));
        assert_eq!((wr[3], wi[3]), (7.0, 0.0));
        assert_relative_eq!(wr[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(wr[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(wi[1], 6f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(wi[2], -(6f64.sqrt()), epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_rejected_arguments() -> Result<(), LapackError> {
        let mut h = H;
        let (mut wr, mut wi) = ([0.0; 4], [0.0; 4]);
        let mut workspace = vec![0.0; 64];
        let mut run = |active: Range<usize>,
                       compz: SchurVectors,
                       workspace: &mut [f64]|
         -> Result<(), LapackError> {
            let mut view = MatrixViewMut::from_row_major(&mut h, 4, 4)?;
            hessenberg_schur(
                SchurJob::SchurForm,
                compz,
                active,
                &mut view,
                &mut VectorViewMut::contiguous(&mut wr),
                &mut VectorViewMut::contiguous(&mut wi),
                None,
                workspace,
            )
        };
        assert_eq!(
            run(2..1, SchurVectors::Skip, &mut workspace),
            Err(LapackError::invalid_argument(3, "active"))
        );
        assert_eq!(
            run(2..2, SchurVectors::Skip, &mut workspace),
            Err(LapackError::invalid_argument(3, "active"))
        );
        assert_eq!(
            run(0..5, SchurVectors::Skip, &mut workspace),
            Err(LapackError::invalid_argument(3, "active"))
        );
        assert_eq!(
            run(0..4, SchurVectors::Initialize, &mut workspace),
            Err(LapackError::invalid_argument(7, "z"))
        );
        // staging for the row-major h fits, the kernel's own work does not
        assert_eq!(
            run(0..4, SchurVectors::Skip, &mut workspace[..16]),
            Err(LapackError::invalid_argument(8, "workspace"))
        );
        assert_eq!(h, H);
        Ok(())
    }

    #[test]
    fn test_empty_matrix() -> Result<(), LapackError> {
        let mut workspace = [0.0; 1];
        hessenberg_schur(
            SchurJob::SchurForm,
            SchurVectors::Skip,
            0..0,
            &mut MatrixViewMut::from_row_major(&mut [], 0, 0)?,
            &mut VectorViewMut::contiguous(&mut []),
            &mut VectorViewMut::contiguous(&mut []),
            None,
            &mut workspace,
        )
    }
}

//! Workspace sizing and carving.
//!
//! Every operation that needs scratch memory takes a caller owned `&mut [f64]`. The front of it
//! holds staging copies of the operands a kernel cannot read in place and the rest is handed to
//! the kernel. The `*_workspace` functions return a length that is always enough for both: they
//! ask the kernel for its own requirement through a workspace query and add the staging the
//! operation may need for the given [`Order`].

use kornia_lapack_kernels as kernels;

use crate::error::{argument_error, ArgumentMap, LapackError, Operation};
use crate::flags::{
    EigenvectorJob, GsvdFactorJob, SchurJob, SchurVectors, SingularVectorJob, Uplo,
};

/// Storage order of the matrix operands, used to size the staging area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Every matrix operand is column-major contiguous; only strided vectors are staged.
    ColumnMajor,
    /// Some matrix operands are row-major. Sizes for the worst case of every operand staged.
    RowMajor,
}

/// Splits staging buffers off the front of a workspace.
pub(crate) struct Arena<'a> {
    free: &'a mut [f64],
}

impl<'a> Arena<'a> {
    pub fn new(free: &'a mut [f64]) -> Self {
        Self { free }
    }

    /// Takes the next `len` elements. The caller has checked the total beforehand.
    pub fn take(&mut self, len: usize) -> &'a mut [f64] {
        let free = std::mem::take(&mut self.free);
        let (head, tail) = free.split_at_mut(len.min(free.len()));
        self.free = tail;
        head
    }

    /// What is left for the kernel.
    pub fn rest(self) -> &'a mut [f64] {
        self.free
    }
}

/// Checks that `workspace` can hold `staging` elements and returns the carving arena.
pub(crate) fn reserve<'a>(
    workspace: &'a mut [f64],
    staging: usize,
    position: usize,
    operation: Operation,
) -> Result<Arena<'a>, LapackError> {
    if workspace.len() < staging {
        log::debug!(
            "{operation}: workspace of {} elements cannot hold {staging} staging elements",
            workspace.len()
        );
        return Err(LapackError::invalid_argument(position, "workspace"));
    }
    log::debug!("{operation}: staging {staging} elements");
    Ok(Arena::new(workspace))
}

fn query(
    operation: Operation,
    arguments: ArgumentMap,
    run: impl FnOnce(&mut [f64]) -> i32,
) -> Result<usize, LapackError> {
    let mut work = [0.0f64; 1];
    let info = run(&mut work);
    if info < 0 {
        return Err(argument_error(-info, operation, arguments));
    }
    Ok(work[0] as usize)
}

/// Workspace length for [`symmetric_eigen`](crate::symmetric_eigen) of order `n`.
pub fn symmetric_eigen_workspace(jobz: EigenvectorJob, n: usize) -> Result<usize, LapackError> {
    const ARGS: ArgumentMap = &[(1, 1, "jobz"), (5, 2, "n")];
    let kernel = query(Operation::SymmetricEigen, ARGS, |work| {
        kernels::dsyev(
            jobz.as_flag(),
            Uplo::Lower.as_flag(),
            n,
            &mut [],
            n.max(1),
            &mut [],
            work,
            kernels::WORKSPACE_QUERY,
        )
    })?;
    Ok(kernel + n)
}

/// Workspace length for [`general_eigen`](crate::general_eigen) of order `n`.
pub fn general_eigen_workspace(
    jobvl: EigenvectorJob,
    jobvr: EigenvectorJob,
    n: usize,
    order: Order,
) -> Result<usize, LapackError> {
    const ARGS: ArgumentMap = &[
        (1, 1, "jobvl"),
        (2, 2, "jobvr"),
        (5, 3, "n"),
        (9, 3, "n"),
        (11, 3, "n"),
    ];
    let kernel = query(Operation::GeneralEigen, ARGS, |work| {
        kernels::dgeev(
            jobvl.as_flag(),
            jobvr.as_flag(),
            n,
            &mut [],
            n.max(1),
            &mut [],
            &mut [],
            &mut [],
            n.max(1),
            &mut [],
            n.max(1),
            work,
            kernels::WORKSPACE_QUERY,
        )
    })?;
    let mut staging = 2 * n;
    if order == Order::RowMajor {
        let matrices = 1 + jobvl.computes() as usize + jobvr.computes() as usize;
        staging += matrices * n * n;
    }
    Ok(kernel + staging)
}

/// Workspace length for [`svd`](crate::svd) of an `m x n` matrix, `m >= n`.
///
/// The staging part does not depend on the storage order: square factors in the wrong
/// orientation are transposed in place and only a thin `U` may need a staging copy.
pub fn svd_workspace(
    jobu: SingularVectorJob,
    jobvt: SingularVectorJob,
    m: usize,
    n: usize,
) -> Result<usize, LapackError> {
    const ARGS: ArgumentMap = &[
        (1, 1, "jobu"),
        (2, 2, "jobvt"),
        (6, 3, "m"),
        (9, 3, "m"),
        (11, 4, "n"),
    ];
    if m < n {
        return Err(LapackError::invalid_argument(3, "m"));
    }
    let kernel = query(Operation::Svd, ARGS, |work| {
        kernels::dgesvd(
            jobu.as_flag(),
            jobvt.as_flag(),
            m,
            n,
            &mut [],
            m.max(1),
            &mut [],
            &mut [],
            m.max(1),
            &mut [],
            n.max(1),
            work,
            kernels::WORKSPACE_QUERY,
        )
    })?;
    let mut staging = n;
    if jobu == SingularVectorJob::Leading && m > n {
        staging += m * n;
    }
    Ok(kernel + staging)
}

/// Workspace lengths for [`gsvd`](crate::gsvd).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GsvdWorkspace {
    /// Length of the `f64` workspace.
    pub work: usize,
    /// Length of the integer workspace, always `n`.
    pub iwork: usize,
}

/// Workspace lengths for [`gsvd`](crate::gsvd) of an `m x n` matrix `A` and a `p x n` matrix
/// `B`.
pub fn gsvd_workspace(
    jobu: GsvdFactorJob,
    jobv: GsvdFactorJob,
    jobq: GsvdFactorJob,
    m: usize,
    n: usize,
    p: usize,
    order: Order,
) -> GsvdWorkspace {
    let mut staging = 2 * n;
    if order == Order::RowMajor {
        staging += (m + p) * n;
        if jobu.computes() {
            staging += m * m;
        }
        if jobv.computes() {
            staging += p * p;
        }
        if jobq.computes() {
            staging += n * n;
        }
    }
    GsvdWorkspace {
        work: kernels::dggsvd_work_len(m, n, p) + staging,
        iwork: n,
    }
}

/// Workspace length for [`hessenberg_schur`](crate::hessenberg_schur) of order `n`.
pub fn hessenberg_schur_workspace(
    job: SchurJob,
    compz: SchurVectors,
    n: usize,
    order: Order,
) -> Result<usize, LapackError> {
    const ARGS: ArgumentMap = &[
        (1, 1, "job"),
        (2, 2, "compz"),
        (4, 3, "n"),
        (5, 3, "n"),
        (7, 3, "n"),
        (11, 3, "n"),
    ];
    let kernel = query(Operation::HessenbergSchur, ARGS, |work| {
        kernels::dhseqr(
            job.as_flag(),
            compz.as_flag(),
            n,
            1,
            n,
            &mut [],
            n.max(1),
            &mut [],
            &mut [],
            &mut [],
            n.max(1),
            work,
            kernels::WORKSPACE_QUERY,
        )
    })?;
    let mut staging = 2 * n;
    if order == Order::RowMajor {
        staging += n * n * (1 + compz.computes() as usize);
    }
    Ok(kernel + staging)
}

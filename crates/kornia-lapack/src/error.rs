use std::fmt;
use std::ops::Range;

use crate::view::ViewError;

/// The operations exposed by this crate, used to label failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Symmetric eigen decomposition.
    SymmetricEigen,
    /// General (nonsymmetric) eigen decomposition.
    GeneralEigen,
    /// Singular value decomposition.
    Svd,
    /// Generalized singular value decomposition.
    Gsvd,
    /// Schur factorization of an upper Hessenberg matrix.
    HessenbergSchur,
    /// Cholesky factorization.
    Cholesky,
    /// Inversion of a triangular matrix.
    TriangularInverse,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::SymmetricEigen => "symmetric eigen decomposition",
            Operation::GeneralEigen => "general eigen decomposition",
            Operation::Svd => "singular value decomposition",
            Operation::Gsvd => "generalized singular value decomposition",
            Operation::HessenbergSchur => "Hessenberg Schur factorization",
            Operation::Cholesky => "Cholesky factorization",
            Operation::TriangularInverse => "triangular inversion",
        };
        f.write_str(name)
    }
}

/// Eigenvalue slots that hold converged values after an iteration failure.
///
/// The valid slots are `0..leading` together with `trailing_from..len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergedRange {
    /// Number of valid slots at the start.
    pub leading: usize,
    /// First valid slot of the trailing run.
    pub trailing_from: usize,
    /// Total number of slots.
    pub len: usize,
}

impl ConvergedRange {
    /// The valid leading slots.
    pub fn leading(&self) -> Range<usize> {
        0..self.leading
    }

    /// The valid trailing slots.
    pub fn trailing(&self) -> Range<usize> {
        self.trailing_from..self.len
    }

    /// Whether slot `i` holds a converged value.
    pub fn contains(&self, i: usize) -> bool {
        self.leading().contains(&i) || self.trailing().contains(&i)
    }

    /// Iterates over the valid slots in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.leading().chain(self.trailing())
    }
}

impl fmt::Display for ConvergedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slots {:?} and {:?} of {}",
            self.leading(),
            self.trailing(),
            self.len
        )
    }
}

/// What is still usable after an iterative kernel gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convergence {
    /// Some eigenvalue slots converged; the rest and any requested vectors are undefined.
    Eigenvalues(ConvergedRange),
    /// The given number of off-diagonal elements did not vanish. No eigenvalue is guaranteed.
    OffDiagonals(usize),
    /// The given number of superdiagonals of the intermediate bidiagonal form did not converge.
    Superdiagonals(usize),
}

impl fmt::Display for Convergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convergence::Eigenvalues(range) => write!(f, "valid eigenvalues in {range}"),
            Convergence::OffDiagonals(k) => write!(f, "{k} off-diagonal elements remain"),
            Convergence::Superdiagonals(k) => write!(f, "{k} superdiagonals did not converge"),
        }
    }
}

/// An error type for the linear algebra operations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum LapackError {
    /// An argument is malformed.
    ///
    /// `position` is the 1-based position of the offending argument in the signature of the
    /// operation that failed. This covers shape mismatches, overlapping views, missing output
    /// views and a workspace that is too short. Nothing has been written when this is
    /// returned.
    ///
    /// # Recommended Actions
    ///
    /// - Compare the operand shapes with the operation documentation
    /// - Size the workspace with the matching `*_workspace` function
    #[error("Invalid argument {position} ({name})")]
    InvalidArgument {
        /// 1-based position of the argument.
        position: usize,
        /// Name of the argument.
        name: &'static str,
    },

    /// A view could not be built.
    #[error(transparent)]
    InvalidView(#[from] ViewError),

    /// An iterative kernel did not converge.
    ///
    /// The outputs are written, but only the parts described by `detail` are meaningful.
    #[error("The {operation} did not converge: {detail}")]
    NotConverged {
        /// The failing operation.
        operation: Operation,
        /// What is still valid.
        detail: Convergence,
    },

    /// The numerical rank of the input is too low for the decomposition.
    #[error("The {operation} failed because the input is rank deficient")]
    RankDeficient {
        /// The failing operation.
        operation: Operation,
    },

    /// The leading minor of the given order is not positive definite.
    ///
    /// The factor is incomplete; the matrix cannot be factored.
    #[error("The leading minor of order {order} is not positive definite")]
    NotPositiveDefinite {
        /// Order of the first failing leading minor, at least 1.
        order: usize,
    },

    /// The triangular matrix has an exact zero on its diagonal.
    #[error("The matrix is singular: diagonal element {index} is zero")]
    Singular {
        /// 0-based index of the zero diagonal element.
        index: usize,
    },
}

impl LapackError {
    /// Helper to build an [`LapackError::InvalidArgument`].
    pub fn invalid_argument(position: usize, name: &'static str) -> Self {
        LapackError::InvalidArgument { position, name }
    }

    /// Returns `true` when the error comes from the caller's arguments rather than the data.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            LapackError::InvalidArgument { .. } | LapackError::InvalidView(_)
        )
    }

    /// A short hint on how to recover.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            LapackError::InvalidArgument { name, .. } if *name == "workspace" => {
                Some("Size the workspace with the matching *_workspace function")
            }
            LapackError::InvalidArgument { .. } => {
                Some("Check the operand shapes, strides and job flags")
            }
            LapackError::InvalidView(_) => Some("Check the view shape against its storage"),
            LapackError::NotConverged { .. } => {
                Some("Rescale or balance the input, or use only the converged values")
            }
            LapackError::RankDeficient { .. } => Some("Remove the dependent columns"),
            LapackError::NotPositiveDefinite { .. } => {
                Some("Use an eigen decomposition or an LDL^T factorization instead")
            }
            LapackError::Singular { .. } => None,
        }
    }
}

/// Fails with [`LapackError::InvalidArgument`] unless `valid` holds.
pub(crate) fn ensure(valid: bool, position: usize, name: &'static str) -> Result<(), LapackError> {
    if valid {
        Ok(())
    } else {
        Err(LapackError::invalid_argument(position, name))
    }
}

/// Maps a kernel argument position to the argument of the public operation it came from.
pub(crate) type ArgumentMap = &'static [(i32, usize, &'static str)];

/// How a positive kernel status is reported.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Failure {
    /// `info` eigenvalue slots before the first valid trailing one failed.
    TrailingEigenvalues { n: usize },
    /// Like `TrailingEigenvalues`, with the slots before the active range valid as well.
    ActiveRange { leading: usize, n: usize },
    OffDiagonals,
    Superdiagonals,
    RankDeficient,
    NotPositiveDefinite,
    Singular,
}

/// The error for a kernel argument rejected at 1-based position `kernel_position`.
///
/// Every position a kernel can reject has an entry in `arguments`. A missing entry is a bug in
/// the table; release builds then report the kernel position itself.
pub(crate) fn argument_error(
    kernel_position: i32,
    operation: Operation,
    arguments: ArgumentMap,
) -> LapackError {
    let mapped = arguments
        .iter()
        .find(|(kernel, _, _)| *kernel == kernel_position)
        .map(|&(_, position, name)| (position, name));
    debug_assert!(
        mapped.is_some(),
        "{operation}: kernel argument {kernel_position} has no public counterpart"
    );
    let (position, name) = mapped.unwrap_or((kernel_position.unsigned_abs() as usize, "argument"));
    log::debug!("{operation}: kernel rejected argument {kernel_position} ({name})");
    LapackError::invalid_argument(position, name)
}

/// Turns a kernel status code into the operation's result.
pub(crate) fn check_status(
    info: i32,
    operation: Operation,
    arguments: ArgumentMap,
    failure: Failure,
) -> Result<(), LapackError> {
    if info == 0 {
        return Ok(());
    }
    if info < 0 {
        return Err(argument_error(-info, operation, arguments));
    }
    let k = info as usize;
    let err = match failure {
        Failure::TrailingEigenvalues { n } => LapackError::NotConverged {
            operation,
            detail: Convergence::Eigenvalues(ConvergedRange {
                leading: 0,
                trailing_from: k,
                len: n,
            }),
        },
        Failure::ActiveRange { leading, n } => LapackError::NotConverged {
            operation,
            detail: Convergence::Eigenvalues(ConvergedRange {
                leading,
                trailing_from: k,
                len: n,
            }),
        },
        Failure::OffDiagonals => LapackError::NotConverged {
            operation,
            detail: Convergence::OffDiagonals(k),
        },
        Failure::Superdiagonals => LapackError::NotConverged {
            operation,
            detail: Convergence::Superdiagonals(k),
        },
        Failure::RankDeficient => LapackError::RankDeficient { operation },
        Failure::NotPositiveDefinite => LapackError::NotPositiveDefinite { order: k },
        Failure::Singular => LapackError::Singular { index: k - 1 },
    };
    if let LapackError::NotConverged { detail, .. } = &err {
        log::warn!("{operation} did not converge: {detail}");
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARGS: ArgumentMap = &[(1, 1, "uplo"), (3, 2, "a"), (4, 2, "a")];

    #[test]
    fn test_negative_status_maps_position() {
        let err = check_status(-4, Operation::Cholesky, ARGS, Failure::NotPositiveDefinite);
        assert_eq!(err, Err(LapackError::invalid_argument(2, "a")));
        assert!(err.is_err_and(|e| e.is_programming_error()));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no public counterpart")]
    fn test_unmapped_argument_is_caught() {
        let _ = check_status(-9, Operation::Cholesky, ARGS, Failure::NotPositiveDefinite);
    }

    #[test]
    fn test_positive_status() {
        assert_eq!(
            check_status(3, Operation::Cholesky, ARGS, Failure::NotPositiveDefinite),
            Err(LapackError::NotPositiveDefinite { order: 3 })
        );
        assert_eq!(
            check_status(2, Operation::TriangularInverse, ARGS, Failure::Singular),
            Err(LapackError::Singular { index: 1 })
        );
        let err = check_status(
            3,
            Operation::HessenbergSchur,
            ARGS,
            Failure::ActiveRange { leading: 1, n: 5 },
        );
        let Err(LapackError::NotConverged {
            detail: Convergence::Eigenvalues(range),
            ..
        }) = err
        else {
            panic!("expected a convergence failure, got {err:?}");
        };
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![0, 3, 4]);
        assert!(!range.contains(1));
    }

    #[test]
    fn test_error_display() {
        let err = LapackError::NotConverged {
            operation: Operation::Svd,
            detail: Convergence::Superdiagonals(2),
        };
        assert_eq!(
            err.to_string(),
            "The singular value decomposition did not converge: 2 superdiagonals did not converge"
        );
        assert!(!err.is_programming_error());
    }
}

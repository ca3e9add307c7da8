//! Job and triangle selectors passed to the operations.
//!
//! Every selector maps to the single character the kernels understand. The characters are
//! accepted in either case when parsing.

/// Error returned when a character does not name a selector value.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagError {
    /// The character is not one of the accepted values.
    #[error("'{flag}' is not a valid {selector} flag")]
    Unknown {
        /// The rejected character.
        flag: char,
        /// Name of the selector being parsed.
        selector: &'static str,
    },

    /// The character names a kernel mode this crate does not expose.
    #[error("'{flag}' is a valid {selector} flag for the kernel but is not supported here")]
    Unsupported {
        /// The rejected character.
        flag: char,
        /// Name of the selector being parsed.
        selector: &'static str,
    },
}

macro_rules! char_flag {
    ($ty:ident, $selector:literal, { $($c:literal => $variant:ident),+ $(,)? }) => {
        impl $ty {
            pub(crate) fn as_flag(self) -> u8 {
                match self {
                    $($ty::$variant => $c as u8,)+
                }
            }
        }

        impl TryFrom<char> for $ty {
            type Error = FlagError;

            fn try_from(flag: char) -> Result<Self, Self::Error> {
                match flag.to_ascii_uppercase() {
                    $($c => Ok($ty::$variant),)+
                    _ => Err(FlagError::Unknown {
                        flag,
                        selector: $selector,
                    }),
                }
            }
        }
    };
}

/// Which triangle of a symmetric or triangular matrix holds the data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Uplo {
    /// The upper triangle, `'U'`.
    Upper,
    /// The lower triangle, `'L'`.
    Lower,
}

char_flag!(Uplo, "uplo", { 'U' => Upper, 'L' => Lower });

impl Uplo {
    /// The other triangle.
    ///
    /// The upper triangle of a row-major matrix is the lower triangle of its column-major
    /// storage, so row-major symmetric and triangular operands only need the flag flipped.
    pub fn flipped(self) -> Self {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
        }
    }
}

/// Whether a triangular matrix has an implicit unit diagonal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diag {
    /// The diagonal is stored, `'N'`.
    NonUnit,
    /// The diagonal is all ones and is not referenced, `'U'`.
    Unit,
}

char_flag!(Diag, "diag", { 'N' => NonUnit, 'U' => Unit });

/// Whether eigenvectors are computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EigenvectorJob {
    /// Eigenvalues only, `'N'`.
    Skip,
    /// Eigenvalues and eigenvectors, `'V'`.
    Compute,
}

char_flag!(EigenvectorJob, "eigenvector job", { 'N' => Skip, 'V' => Compute });

impl EigenvectorJob {
    /// Whether the vectors are requested.
    pub fn computes(self) -> bool {
        self == EigenvectorJob::Compute
    }
}

/// Which singular vectors are computed.
///
/// The kernel's `'O'` mode, which overwrites the input with the vectors, is rejected with
/// [`FlagError::Unsupported`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SingularVectorJob {
    /// The complete orthogonal factor, `'A'`.
    All,
    /// The leading `min(m, n)` vectors, `'S'`.
    Leading,
    /// No vectors, `'N'`.
    Skip,
}

impl SingularVectorJob {
    pub(crate) fn as_flag(self) -> u8 {
        match self {
            SingularVectorJob::All => b'A',
            SingularVectorJob::Leading => b'S',
            SingularVectorJob::Skip => b'N',
        }
    }

    /// Whether any vector is requested.
    pub fn computes(self) -> bool {
        self != SingularVectorJob::Skip
    }
}

impl TryFrom<char> for SingularVectorJob {
    type Error = FlagError;

    fn try_from(flag: char) -> Result<Self, Self::Error> {
        match flag.to_ascii_uppercase() {
            'A' => Ok(SingularVectorJob::All),
            'S' => Ok(SingularVectorJob::Leading),
            'N' => Ok(SingularVectorJob::Skip),
            'O' => Err(FlagError::Unsupported {
                flag,
                selector: "singular vector job",
            }),
            _ => Err(FlagError::Unknown {
                flag,
                selector: "singular vector job",
            }),
        }
    }
}

/// The orthogonal factors of a generalized SVD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GsvdFactor {
    /// `U`, paired with `A`.
    U,
    /// `V`, paired with `B`.
    V,
    /// `Q`, shared on the right.
    Q,
}

impl GsvdFactor {
    fn letter(self) -> char {
        match self {
            GsvdFactor::U => 'U',
            GsvdFactor::V => 'V',
            GsvdFactor::Q => 'Q',
        }
    }
}

/// Whether one orthogonal factor of a generalized SVD is computed.
///
/// The kernel spells "compute" with the factor's own letter, so parsing needs to know which
/// factor the flag belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GsvdFactorJob {
    /// Compute the factor.
    Compute,
    /// Skip it, `'N'`.
    Skip,
}

impl GsvdFactorJob {
    /// Parses the flag for `factor`: its own letter computes it, `'N'` skips it.
    ///
    /// ```rust
    /// use kornia_lapack::{GsvdFactor, GsvdFactorJob};
    ///
    /// assert_eq!(GsvdFactorJob::parse('q', GsvdFactor::Q), Ok(GsvdFactorJob::Compute));
    /// assert!(GsvdFactorJob::parse('U', GsvdFactor::V).is_err());
    /// ```
    pub fn parse(flag: char, factor: GsvdFactor) -> Result<Self, FlagError> {
        match flag.to_ascii_uppercase() {
            'N' => Ok(GsvdFactorJob::Skip),
            c if c == factor.letter() => Ok(GsvdFactorJob::Compute),
            _ => Err(FlagError::Unknown {
                flag,
                selector: "generalized SVD factor job",
            }),
        }
    }

    pub(crate) fn as_flag(self, factor: GsvdFactor) -> u8 {
        match self {
            GsvdFactorJob::Compute => factor.letter() as u8,
            GsvdFactorJob::Skip => b'N',
        }
    }

    /// Whether the factor is requested.
    pub fn computes(self) -> bool {
        self == GsvdFactorJob::Compute
    }
}

/// What the Hessenberg Schur operation leaves in `H`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchurJob {
    /// Eigenvalues only; the contents of `H` are unspecified on return, `'E'`.
    Eigenvalues,
    /// Eigenvalues and the Schur form `T` in `H`, `'S'`.
    SchurForm,
}

char_flag!(SchurJob, "Schur job", { 'E' => Eigenvalues, 'S' => SchurForm });

/// What the Hessenberg Schur operation does with `Z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchurVectors {
    /// `Z` is not referenced, `'N'`.
    Skip,
    /// `Z` is set to the Schur vectors of `H`, `'I'`.
    Initialize,
    /// `Z` is multiplied on the right by the Schur vectors of `H`, `'V'`.
    Accumulate,
}

char_flag!(SchurVectors, "Schur vectors", { 'N' => Skip, 'I' => Initialize, 'V' => Accumulate });

impl SchurVectors {
    /// Whether `Z` is referenced.
    pub fn computes(self) -> bool {
        self != SchurVectors::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(Uplo::try_from('u'), Ok(Uplo::Upper));
        assert_eq!(Uplo::Lower.as_flag(), b'L');
        assert_eq!(Uplo::Upper.flipped(), Uplo::Lower);
        assert_eq!(Diag::try_from('U'), Ok(Diag::Unit));
        assert_eq!(EigenvectorJob::try_from('v'), Ok(EigenvectorJob::Compute));
        assert_eq!(SchurVectors::try_from('I'), Ok(SchurVectors::Initialize));
        assert_eq!(SchurJob::SchurForm.as_flag(), b'S');
        assert_eq!(
            Uplo::try_from('X'),
            Err(FlagError::Unknown {
                flag: 'X',
                selector: "uplo"
            })
        );
    }

    #[test]
    fn test_overwrite_svd_job_is_unsupported() {
        assert_eq!(
            SingularVectorJob::try_from('O'),
            Err(FlagError::Unsupported {
                flag: 'O',
                selector: "singular vector job"
            })
        );
        assert_eq!(SingularVectorJob::try_from('s'), Ok(SingularVectorJob::Leading));
    }

    #[test]
    fn test_gsvd_flags() {
        assert_eq!(GsvdFactorJob::parse('U', GsvdFactor::U), Ok(GsvdFactorJob::Compute));
        assert_eq!(GsvdFactorJob::parse('n', GsvdFactor::V), Ok(GsvdFactorJob::Skip));
        assert!(GsvdFactorJob::parse('Q', GsvdFactor::U).is_err());
        assert_eq!(GsvdFactorJob::Compute.as_flag(GsvdFactor::V), b'V');
    }
}
